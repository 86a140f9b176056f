//! # Error Types
//!
//! Input validation errors shared by every Ringside crate. Lifecycle and
//! match errors live in `ringside-state`, next to the rules that raise them.

use thiserror::Error;

/// Validation failure for a primitive value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A display name was empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// A display name exceeded the maximum length.
    #[error("name must not exceed {max} characters (got {len})")]
    NameTooLong {
        /// Maximum permitted length.
        max: usize,
        /// Actual length.
        len: usize,
    },

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp {0}")]
    InvalidTimestamp(String),

    /// A roster kind string did not name a known kind.
    #[error("unknown roster kind: {0:?}")]
    UnknownKind(String),
}
