//! # Interval Ledger
//!
//! Append-only record of lifecycle spans. Every fact about a roster entry's
//! history (employed from X to Y, suspended from Z) is one [`Interval`].
//! Statuses are derived from the ledger; the ledger is never derived from
//! statuses.
//!
//! ## Invariants
//!
//! - At most one interval per `(owner, kind)` is open (`ended_at == None`).
//! - A closed interval is never modified again.
//! - The only in-place edit of an open interval is [`IntervalLedger::redate_future`],
//!   used when a pending employment is moved to a new start date.
//! - `ended_at >= started_at` for every closed interval.
//!
//! ## Vocabulary
//!
//! - **open**: `ended_at` is `None`.
//! - **current** (as of `t`): open and `started_at <= t`.
//! - **future** (as of `t`): open and `started_at > t`.
//! - **previous**: the closed interval with the latest `ended_at`.

use std::collections::HashMap;

use ringside_core::{IntervalId, RosterId, RosterKind, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Interval ────────────────────────────────────────────────────────

/// What an interval records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// Under contract with the promotion.
    Employment,
    /// Barred from competing while employed.
    Suspension,
    /// Unable to compete while employed.
    Injury,
    /// Retired from competition.
    Retirement,
    /// Active on the card (stables and titles).
    Activation,
}

impl IntervalKind {
    /// All kinds, in declaration order.
    pub const ALL: [IntervalKind; 5] = [
        Self::Employment,
        Self::Suspension,
        Self::Injury,
        Self::Retirement,
        Self::Activation,
    ];

    /// Return the snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employment => "employment",
            Self::Suspension => "suspension",
            Self::Injury => "injury",
            Self::Retirement => "retirement",
            Self::Activation => "activation",
        }
    }

    /// Parse the snake_case name produced by [`IntervalKind::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl std::fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle span belonging to a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Row identity.
    pub id: IntervalId,
    /// The roster entry this interval belongs to.
    pub owner: RosterId,
    /// Kind of the owning entry.
    pub owner_kind: RosterKind,
    /// What the interval records.
    pub kind: IntervalKind,
    /// Start of the span.
    pub started_at: Timestamp,
    /// End of the span; `None` while the span is open.
    pub ended_at: Option<Timestamp>,
}

impl Interval {
    /// Whether the interval has not been closed.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Whether the interval is open and has already started at `as_of`.
    pub fn is_current(&self, as_of: Timestamp) -> bool {
        self.is_open() && self.started_at <= as_of
    }

    /// Whether the interval is open and starts after `as_of`.
    pub fn is_future(&self, as_of: Timestamp) -> bool {
        self.is_open() && self.started_at > as_of
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Violations of the ledger invariants.
///
/// Under serialized access these indicate a caller bug: the lifecycle
/// guards are supposed to rule them out before the ledger is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// An interval of this kind is already open for the owner.
    #[error("{owner} already has an open {kind} interval (started {started_at})")]
    Conflict {
        /// Owning entry.
        owner: RosterId,
        /// Interval kind.
        kind: IntervalKind,
        /// Start of the interval that is already open.
        started_at: Timestamp,
    },

    /// No open interval of this kind exists for the owner.
    #[error("{owner} has no open {kind} interval")]
    NotFound {
        /// Owning entry.
        owner: RosterId,
        /// Interval kind.
        kind: IntervalKind,
    },

    /// Closing would end the interval before it started.
    #[error("{owner} {kind} interval started {started_at} cannot end at {ended_at}")]
    Inverted {
        /// Owning entry.
        owner: RosterId,
        /// Interval kind.
        kind: IntervalKind,
        /// Start of the open interval.
        started_at: Timestamp,
        /// Requested end.
        ended_at: Timestamp,
    },
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// All intervals, grouped by owner and kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct IntervalLedger {
    by_owner: HashMap<RosterId, Vec<Interval>>,
}

impl IntervalLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new interval starting at `started_at`.
    pub fn open(
        &mut self,
        owner_kind: RosterKind,
        owner: RosterId,
        kind: IntervalKind,
        started_at: Timestamp,
    ) -> Result<&Interval, IntervalError> {
        if let Some(existing) = self.open_interval(owner, kind) {
            return Err(IntervalError::Conflict {
                owner,
                kind,
                started_at: existing.started_at,
            });
        }
        let rows = self.by_owner.entry(owner).or_default();
        rows.push(Interval {
            id: IntervalId::new(),
            owner,
            owner_kind,
            kind,
            started_at,
            ended_at: None,
        });
        Ok(&rows[rows.len() - 1])
    }

    /// Close the open interval of `kind` at `ended_at`.
    pub fn close(
        &mut self,
        owner: RosterId,
        kind: IntervalKind,
        ended_at: Timestamp,
    ) -> Result<&Interval, IntervalError> {
        let interval = self
            .open_interval_mut(owner, kind)
            .ok_or(IntervalError::NotFound { owner, kind })?;
        if ended_at < interval.started_at {
            return Err(IntervalError::Inverted {
                owner,
                kind,
                started_at: interval.started_at,
                ended_at,
            });
        }
        interval.ended_at = Some(ended_at);
        Ok(interval)
    }

    /// Move the start of a future open interval to `started_at`.
    pub fn redate_future(
        &mut self,
        owner: RosterId,
        kind: IntervalKind,
        started_at: Timestamp,
        as_of: Timestamp,
    ) -> Result<&Interval, IntervalError> {
        let interval = self
            .open_interval_mut(owner, kind)
            .filter(|i| i.is_future(as_of))
            .ok_or(IntervalError::NotFound { owner, kind })?;
        interval.started_at = started_at;
        Ok(interval)
    }

    /// The open interval of `kind`, regardless of when it starts.
    pub fn open_interval(&self, owner: RosterId, kind: IntervalKind) -> Option<&Interval> {
        self.of_kind(owner, kind).find(|i| i.is_open())
    }

    /// The open interval of `kind` that has started by `as_of`.
    pub fn current(&self, owner: RosterId, kind: IntervalKind, as_of: Timestamp) -> Option<&Interval> {
        self.open_interval(owner, kind).filter(|i| i.is_current(as_of))
    }

    /// The open interval of `kind` that starts after `as_of`.
    pub fn future(&self, owner: RosterId, kind: IntervalKind, as_of: Timestamp) -> Option<&Interval> {
        self.open_interval(owner, kind).filter(|i| i.is_future(as_of))
    }

    /// Whether an open interval of `kind` starts after `as_of`.
    pub fn has_future_open(&self, owner: RosterId, kind: IntervalKind, as_of: Timestamp) -> bool {
        self.future(owner, kind, as_of).is_some()
    }

    /// The most recently ended interval of `kind`.
    pub fn previous(&self, owner: RosterId, kind: IntervalKind) -> Option<&Interval> {
        self.of_kind(owner, kind)
            .filter(|i| !i.is_open())
            .max_by_key(|i| (i.ended_at, i.started_at))
    }

    /// Every interval of `kind` for `owner`, in insertion order.
    pub fn of_kind(&self, owner: RosterId, kind: IntervalKind) -> impl Iterator<Item = &Interval> {
        self.by_owner
            .get(&owner)
            .into_iter()
            .flatten()
            .filter(move |i| i.kind == kind)
    }

    /// Every interval for `owner`, ordered by start.
    pub fn history(&self, owner: RosterId) -> Vec<&Interval> {
        let mut rows: Vec<&Interval> = self.by_owner.get(&owner).into_iter().flatten().collect();
        rows.sort_by_key(|i| (i.started_at, i.kind));
        rows
    }

    /// Every interval in the ledger.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.by_owner.values().flatten()
    }

    /// Insert a previously persisted interval, enforcing the one-open rule.
    pub fn restore(&mut self, interval: Interval) -> Result<(), IntervalError> {
        if interval.is_open() {
            if let Some(existing) = self.open_interval(interval.owner, interval.kind) {
                return Err(IntervalError::Conflict {
                    owner: interval.owner,
                    kind: interval.kind,
                    started_at: existing.started_at,
                });
            }
        }
        self.by_owner.entry(interval.owner).or_default().push(interval);
        Ok(())
    }

    fn open_interval_mut(&mut self, owner: RosterId, kind: IntervalKind) -> Option<&mut Interval> {
        self.by_owner
            .get_mut(&owner)?
            .iter_mut()
            .find(|i| i.kind == kind && i.is_open())
    }
}
