//! Tower middleware for the Ringside API.

pub mod tracing_layer;
