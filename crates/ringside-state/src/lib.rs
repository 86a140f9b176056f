//! # ringside-state: Roster Lifecycle Engine
//!
//! Employment, suspension, injury, retirement and activation lifecycles for
//! every roster kind, the cascade between composites and their members, and
//! match composition checks.
//!
//! ## Layers
//!
//! ```text
//! interval  ──▶ status ──▶ guard ──▶ engine ──▶ cascade
//!    │                                  │
//!    └──────── roster ◀── formation ────┘
//!                 ▲
//!               store (unit of work)
//! ```
//!
//! - [`interval`]: append-only ledger of lifecycle spans.
//! - [`status`]: pure derivation of a status from ledger facts.
//! - [`guard`]: transition preconditions and per-kind capability profiles.
//! - [`roster`]: entries, memberships, and fresh status evaluation.
//! - [`formation`]: tag team and stable membership rules.
//! - [`store`]: transactional access to a roster.
//! - [`engine`]: the operations callers use.
//! - [`cascade`]: propagation between composites and members.
//! - [`matches`]: match type catalog, composition and booking checks.
//!
//! ## Time
//!
//! Nothing in this crate reads the wall clock. The engine asks its injected
//! [`Clock`](ringside_core::Clock) for "now" once per operation and threads
//! that instant through guards, derivation and cascade.

pub mod cascade;
pub mod engine;
pub mod formation;
pub mod guard;
pub mod interval;
pub mod matches;
pub mod roster;
pub mod status;
pub mod store;

pub use engine::{EntrySnapshot, LifecycleEngine, LifecycleError, MatchCheckError, TransitionReport};
pub use formation::FormationError;
pub use guard::{LifecycleProfile, Transition};
pub use interval::{Interval, IntervalError, IntervalKind, IntervalLedger};
pub use matches::{BookingError, MatchError, MatchSide, MatchType, MatchTypeTemplate, ProposedMatch};
pub use roster::{Membership, Roster, RosterEntry};
pub use status::{LifecycleFacts, RosterStatus};
pub use store::{MemoryRosterStore, RosterStore};
