//! # Status Derivation
//!
//! A roster entry's status is a pure function of its intervals as of some
//! instant. [`LifecycleFacts`] snapshots the relevant intervals; [`derive`]
//! and [`derive_composite`] turn the snapshot into a [`RosterStatus`].
//!
//! ## Priority
//!
//! ```text
//! current retirement                 ──▶ Retired
//! engaged + injured                  ──▶ Injured
//! engaged + suspended                ──▶ Suspended
//! engaged                            ──▶ Available
//! future engagement                  ──▶ PendingEmployment
//! previous engagement                ──▶ Released
//! nothing                            ──▶ Unemployed
//! ```
//!
//! "Engaged" means a current interval of the entry's engagement kind:
//! `Employment` for participants and tag teams, `Activation` for stables and
//! titles.
//!
//! Suspensions and injuries count from the moment they are recorded, even
//! when dated ahead of `as_of`. Retirements and engagements only count once
//! their start has been reached.

use ringside_core::{RosterId, RosterKind, Timestamp};
use serde::{Deserialize, Serialize};

use crate::interval::{IntervalKind, IntervalLedger};

// ─── Roster Status ───────────────────────────────────────────────────

/// Derived lifecycle status of a roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterStatus {
    /// Never engaged.
    Unemployed,
    /// Engagement starts in the future.
    PendingEmployment,
    /// Engaged and free to be booked.
    Available,
    /// Composite is engaged but cannot be booked as a unit.
    Unbookable,
    /// Engaged and serving a suspension.
    Suspended,
    /// Engaged and injured.
    Injured,
    /// Previously engaged; engagement has ended.
    Released,
    /// Retired.
    Retired,
}

impl RosterStatus {
    /// All statuses, in declaration order.
    pub const ALL: [RosterStatus; 8] = [
        Self::Unemployed,
        Self::PendingEmployment,
        Self::Available,
        Self::Unbookable,
        Self::Suspended,
        Self::Injured,
        Self::Released,
        Self::Retired,
    ];

    /// Return the snake_case name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unemployed => "unemployed",
            Self::PendingEmployment => "pending_employment",
            Self::Available => "available",
            Self::Unbookable => "unbookable",
            Self::Suspended => "suspended",
            Self::Injured => "injured",
            Self::Released => "released",
            Self::Retired => "retired",
        }
    }

    /// Parse the snake_case name produced by [`RosterStatus::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Human-facing label for an entry of `kind` in this status.
    pub fn label(&self, kind: RosterKind) -> &'static str {
        let activation = matches!(kind, RosterKind::Stable | RosterKind::Title);
        match self {
            Self::Unemployed if activation => "Unactivated",
            Self::Unemployed => "Unemployed",
            Self::PendingEmployment => match kind {
                RosterKind::Stable => "Pending Activation",
                RosterKind::Title => "Pending Introduction",
                _ => "Pending Employment",
            },
            Self::Available => match kind {
                RosterKind::Manager => "Available",
                RosterKind::Stable | RosterKind::Title => "Active",
                _ => "Bookable",
            },
            Self::Unbookable => "Unbookable",
            Self::Suspended => "Suspended",
            Self::Injured => "Injured",
            Self::Released if activation => "Inactive",
            Self::Released => "Released",
            Self::Retired => "Retired",
        }
    }

    /// Whether an entry in this status may be booked into a match.
    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Whether the entry is under an engagement that has already started.
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            Self::Available | Self::Unbookable | Self::Suspended | Self::Injured
        )
    }
}

impl std::fmt::Display for RosterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Lifecycle Facts ─────────────────────────────────────────────────

/// Snapshot of the intervals that decide an entry's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecycleFacts {
    /// A current engagement interval exists.
    pub engaged: bool,
    /// An open engagement interval starts after `as_of`.
    pub pending: bool,
    /// A closed engagement interval exists.
    pub previously_engaged: bool,
    /// An open suspension exists.
    pub suspended: bool,
    /// An open injury exists.
    pub injured: bool,
    /// A current retirement exists.
    pub retired: bool,
}

impl LifecycleFacts {
    /// Read the facts for `owner` from the ledger.
    pub fn gather(
        ledger: &IntervalLedger,
        owner: RosterId,
        engagement: IntervalKind,
        as_of: Timestamp,
    ) -> Self {
        Self {
            engaged: ledger.current(owner, engagement, as_of).is_some(),
            pending: ledger.has_future_open(owner, engagement, as_of),
            previously_engaged: ledger.previous(owner, engagement).is_some(),
            suspended: ledger.open_interval(owner, IntervalKind::Suspension).is_some(),
            injured: ledger.open_interval(owner, IntervalKind::Injury).is_some(),
            retired: ledger.current(owner, IntervalKind::Retirement, as_of).is_some(),
        }
    }

    /// Engaged now and not retired.
    pub fn in_employment(&self) -> bool {
        self.engaged && !self.retired
    }
}

/// Derive a participant's status. Never yields `Unbookable`.
pub fn derive(facts: &LifecycleFacts) -> RosterStatus {
    if facts.retired {
        RosterStatus::Retired
    } else if facts.engaged && facts.injured {
        RosterStatus::Injured
    } else if facts.engaged && facts.suspended {
        RosterStatus::Suspended
    } else if facts.engaged {
        RosterStatus::Available
    } else if facts.pending {
        RosterStatus::PendingEmployment
    } else if facts.previously_engaged {
        RosterStatus::Released
    } else {
        RosterStatus::Unemployed
    }
}

/// Membership constraints that decide whether an engaged composite is bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeRule {
    /// Fewest current members for the composite to be bookable.
    pub minimum_members: usize,
    /// Every current member must itself be `Available`.
    pub members_must_be_available: bool,
}

/// Derive a composite's status from its own facts and its current members'
/// statuses.
pub fn derive_composite(
    facts: &LifecycleFacts,
    members: &[RosterStatus],
    rule: CompositeRule,
) -> RosterStatus {
    if facts.retired {
        return RosterStatus::Retired;
    }
    if facts.engaged {
        if facts.suspended || members.contains(&RosterStatus::Suspended) {
            return RosterStatus::Suspended;
        }
        let short_handed = members.len() < rule.minimum_members;
        let member_out = rule.members_must_be_available
            && members.iter().any(|status| !status.is_bookable());
        if short_handed || member_out {
            return RosterStatus::Unbookable;
        }
        return RosterStatus::Available;
    }
    if facts.pending {
        RosterStatus::PendingEmployment
    } else if facts.previously_engaged {
        RosterStatus::Released
    } else {
        RosterStatus::Unemployed
    }
}
