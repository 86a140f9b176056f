//! # API Route Modules
//!
//! - `roster`: registration, lookup, soft delete, intervals, transitions.
//! - `composites`: tag team and stable formation and membership.
//! - `titles`: championship listing and introduction.
//! - `matches`: match type catalog and match validation.

pub mod composites;
pub mod matches;
pub mod roster;
pub mod titles;
