//! # ringside-core: Foundational Types for Ringside
//!
//! The leaf crate of the workspace. Defines the primitives every other
//! crate shares: second-precision UTC timestamps, an injectable clock,
//! identifier newtypes, the roster kind enum, and validated display names.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `RosterId` and `IntervalId` are
//!    distinct types; an interval id cannot be passed where a roster entry
//!    is expected.
//!
//! 2. **No ambient clock.** Lifecycle code never calls `Utc::now()`. It
//!    receives a [`Clock`] and asks it for the current instant, so tests can
//!    pin "now" with [`FixedClock`].
//!
//! 3. **Single `RosterKind` enum.** Wrestlers, managers, referees, tag teams,
//!    stables and titles share one exhaustive enum; adding a kind forces every
//!    `match` to handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ringside-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

pub use domain::{RosterKind, RosterName};
pub use error::ValidationError;
pub use identity::{IntervalId, RosterId};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
