//! # Lifecycle Engine
//!
//! One engine for every roster kind. Each operation runs as a single
//! [`RosterStore::transaction`]:
//!
//! 1. look up the live entry and its [`LifecycleProfile`],
//! 2. check the guard against [`LifecycleFacts`](crate::status::LifecycleFacts) as of the clock's now,
//! 3. check `at` (defaulting to now) against the entry's intervals,
//! 4. write intervals dated `at`,
//! 5. recompute the cached status,
//! 6. cascade (up to composites, or down to members).
//!
//! A failure at any step discards the whole transaction, cascade included.
//!
//! ## Auto-closing
//!
//! `release` and `retire` close an open suspension and an open injury at
//! the same instant before ending the engagement. `retire` then opens the
//! retirement at that instant, so the closed suspension's `ended_at`
//! equals the retirement's `started_at`.
//!
//! ## Dating
//!
//! Only `employ` may be dated after now; it records a pending employment.
//! Any other transition dated in the future is refused with
//! [`LifecycleError::FutureDated`]. A past `at` must not precede the start
//! of an interval the transition closes, nor the end of the previous
//! interval of a kind it opens ([`LifecycleError::OutOfOrder`]).

use std::convert::Infallible;
use std::sync::Arc;

use ringside_core::{Clock, RosterId, RosterKind, RosterName, Timestamp};
use serde::Serialize;
use thiserror::Error;

use crate::cascade::{cascade_up, eligible_members, refresh};
use crate::formation::{self, FormationError};
use crate::guard::{LifecycleProfile, Transition};
use crate::interval::{Interval, IntervalError, IntervalKind};
use crate::matches::{self, BookingError, MatchError, ProposedMatch};
use crate::roster::{Membership, Roster, RosterEntry};
use crate::status::RosterStatus;
use crate::store::RosterStore;

// ─── Errors ──────────────────────────────────────────────────────────

/// Why a lifecycle operation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("{kind} {id} cannot be employed (status: {status})")]
    CannotBeEmployed { id: RosterId, kind: RosterKind, status: RosterStatus },

    #[error("{kind} {id} cannot be released (status: {status})")]
    CannotBeReleased { id: RosterId, kind: RosterKind, status: RosterStatus },

    #[error("{kind} {id} cannot be suspended (status: {status})")]
    CannotBeSuspended { id: RosterId, kind: RosterKind, status: RosterStatus },

    #[error("{kind} {id} cannot be reinstated (status: {status})")]
    CannotBeReinstated { id: RosterId, kind: RosterKind, status: RosterStatus },

    #[error("{kind} {id} cannot be injured (status: {status})")]
    CannotBeInjured { id: RosterId, kind: RosterKind, status: RosterStatus },

    #[error("{kind} {id} cannot be cleared from injury (status: {status})")]
    CannotBeClearedFromInjury { id: RosterId, kind: RosterKind, status: RosterStatus },

    #[error("{kind} {id} cannot be retired (status: {status})")]
    CannotBeRetired { id: RosterId, kind: RosterKind, status: RosterStatus },

    #[error("{kind} {id} cannot be unretired (status: {status})")]
    CannotBeUnretired { id: RosterId, kind: RosterKind, status: RosterStatus },

    /// The kind has no such operation (e.g. injuring a title).
    #[error("a {kind} cannot {action}")]
    Unsupported { kind: RosterKind, action: &'static str },

    /// Only employment can be scheduled ahead of the clock.
    #[error("{kind} {id} cannot {action} at {at}, which is in the future")]
    FutureDated {
        id: RosterId,
        kind: RosterKind,
        action: &'static str,
        at: Timestamp,
    },

    /// `at` would put an interval before its neighbour in the ledger.
    #[error("{kind} {id} cannot {action} at {at}: {interval} interval {edge} at {boundary}")]
    OutOfOrder {
        id: RosterId,
        kind: RosterKind,
        action: &'static str,
        at: Timestamp,
        interval: IntervalKind,
        edge: &'static str,
        boundary: Timestamp,
    },

    /// Missing or soft-deleted.
    #[error("roster entry {0} not found")]
    UnknownEntry(RosterId),

    #[error(transparent)]
    Formation(#[from] FormationError),

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

impl LifecycleError {
    fn guard(transition: Transition, id: RosterId, kind: RosterKind, status: RosterStatus) -> Self {
        match transition {
            Transition::Employ => Self::CannotBeEmployed { id, kind, status },
            Transition::Release => Self::CannotBeReleased { id, kind, status },
            Transition::Suspend => Self::CannotBeSuspended { id, kind, status },
            Transition::Reinstate => Self::CannotBeReinstated { id, kind, status },
            Transition::Injure => Self::CannotBeInjured { id, kind, status },
            Transition::ClearInjury => Self::CannotBeClearedFromInjury { id, kind, status },
            Transition::Retire => Self::CannotBeRetired { id, kind, status },
            Transition::Unretire => Self::CannotBeUnretired { id, kind, status },
        }
    }

    /// Whether this is a failed transition guard.
    pub fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            Self::CannotBeEmployed { .. }
                | Self::CannotBeReleased { .. }
                | Self::CannotBeSuspended { .. }
                | Self::CannotBeReinstated { .. }
                | Self::CannotBeInjured { .. }
                | Self::CannotBeClearedFromInjury { .. }
                | Self::CannotBeRetired { .. }
                | Self::CannotBeUnretired { .. }
        )
    }

    /// Entry, kind and status a failed guard was evaluated against.
    pub fn guard_context(&self) -> Option<(RosterId, RosterKind, RosterStatus)> {
        match *self {
            Self::CannotBeEmployed { id, kind, status }
            | Self::CannotBeReleased { id, kind, status }
            | Self::CannotBeSuspended { id, kind, status }
            | Self::CannotBeReinstated { id, kind, status }
            | Self::CannotBeInjured { id, kind, status }
            | Self::CannotBeClearedFromInjury { id, kind, status }
            | Self::CannotBeRetired { id, kind, status }
            | Self::CannotBeUnretired { id, kind, status } => Some((id, kind, status)),
            _ => None,
        }
    }
}

/// Why a match could not be booked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchCheckError {
    #[error(transparent)]
    Composition(#[from] MatchError),

    #[error(transparent)]
    Booking(#[from] BookingError),
}

// ─── Reports ─────────────────────────────────────────────────────────

/// Outcome of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionReport {
    pub subject: RosterId,
    pub transition: Transition,
    pub at: Timestamp,
    /// Status of the subject after the transition and its cascade.
    pub status: RosterStatus,
    /// Every entry whose intervals or cached status the operation wrote,
    /// the subject first.
    pub touched: Vec<RosterId>,
}

/// An entry together with its full interval history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    pub entry: RosterEntry,
    pub intervals: Vec<Interval>,
}

// ─── Engine ──────────────────────────────────────────────────────────

/// Runs lifecycle operations against a [`RosterStore`].
#[derive(Debug, Clone)]
pub struct LifecycleEngine<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: RosterStore> LifecycleEngine<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The instant lifecycle facts are evaluated at.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // -- Entries ----------------------------------------------------------

    /// Add a new, never-engaged wrestler, manager, referee or title.
    ///
    /// Tag teams and stables are created through [`Self::form_tag_team`] and
    /// [`Self::form_stable`].
    pub fn register(&self, kind: RosterKind, name: RosterName) -> Result<RosterEntry, LifecycleError> {
        if kind.is_composite() {
            return Err(LifecycleError::Unsupported {
                kind,
                action: "be registered without members",
            });
        }
        let entry = RosterEntry::new(kind, name, self.now());
        self.store.transaction(|roster| {
            roster.insert(entry.clone());
            Ok::<_, LifecycleError>(())
        })?;
        tracing::debug!(id = %entry.id, kind = %kind, "registered roster entry");
        Ok(entry)
    }

    /// Soft-delete an entry. Composites it belonged to are re-derived.
    pub fn soft_delete(&self, id: RosterId) -> Result<Vec<RosterId>, LifecycleError> {
        let as_of = self.now();
        self.store.transaction(|roster| {
            let entry = roster.get_mut(id).filter(|e| !e.is_deleted());
            let entry = entry.ok_or(LifecycleError::UnknownEntry(id))?;
            entry.deleted_at = Some(as_of);
            let mut touched = vec![id];
            cascade_up(roster, id, as_of, &mut touched);
            tracing::debug!(%id, "soft-deleted roster entry");
            Ok(touched)
        })
    }

    /// Undo a soft delete.
    pub fn restore(&self, id: RosterId) -> Result<Vec<RosterId>, LifecycleError> {
        let as_of = self.now();
        self.store.transaction(|roster| {
            let entry = roster.get_mut(id).filter(|e| e.is_deleted());
            let entry = entry.ok_or(LifecycleError::UnknownEntry(id))?;
            entry.deleted_at = None;
            refresh(roster, id, as_of);
            let mut touched = vec![id];
            cascade_up(roster, id, as_of, &mut touched);
            tracing::debug!(%id, "restored roster entry");
            Ok(touched)
        })
    }

    /// A live entry.
    pub fn get(&self, id: RosterId) -> Option<RosterEntry> {
        self.store.read(|roster| roster.live(id).cloned())
    }

    /// Live entries, optionally of one kind and one status, ordered by name.
    pub fn list(&self, kind: Option<RosterKind>, status: Option<RosterStatus>) -> Vec<RosterEntry> {
        self.store.read(|roster| {
            roster
                .list(kind)
                .into_iter()
                .filter(|e| status.map_or(true, |s| e.status == s))
                .cloned()
                .collect()
        })
    }

    /// Interval history of a live entry, ordered by start.
    pub fn history(&self, id: RosterId) -> Result<Vec<Interval>, LifecycleError> {
        self.store.read(|roster| {
            roster.live(id).ok_or(LifecycleError::UnknownEntry(id))?;
            Ok(roster.ledger().history(id).into_iter().cloned().collect())
        })
    }

    /// Entries (deleted ones included) with their intervals, for persistence.
    pub fn snapshots(&self, ids: &[RosterId]) -> Vec<EntrySnapshot> {
        self.store.read(|roster| {
            ids.iter()
                .filter_map(|id| {
                    let entry = roster.get(*id)?.clone();
                    let intervals = roster.ledger().history(*id).into_iter().cloned().collect();
                    Some(EntrySnapshot { entry, intervals })
                })
                .collect()
        })
    }

    /// Recompute every cached status as of now. Returns the entries whose
    /// status changed (a pending employment whose start has passed, say).
    pub fn refresh_all(&self) -> Vec<RosterId> {
        let as_of = self.now();
        let result = self.store.transaction(|roster| {
            let mut ids: Vec<RosterId> = roster.entries().map(|e| e.id).collect();
            // Participants first so composites see fresh member statuses.
            ids.sort_by_key(|id| roster.get(*id).map(|e| e.kind.is_composite()));
            let mut changed = Vec::new();
            for id in ids {
                let before = roster.get(id).map(|e| e.status);
                if refresh(roster, id, as_of) != before {
                    changed.push(id);
                }
            }
            Ok::<_, Infallible>(changed)
        });
        let changed = match result {
            Ok(changed) => changed,
            Err(never) => match never {},
        };
        if !changed.is_empty() {
            tracing::info!(count = changed.len(), "refreshed stale roster statuses");
        }
        changed
    }

    // -- Transitions ------------------------------------------------------

    /// Apply `transition` to `id`, dated `at` (default: now).
    pub fn transition(
        &self,
        id: RosterId,
        transition: Transition,
        at: Option<Timestamp>,
    ) -> Result<TransitionReport, LifecycleError> {
        let as_of = self.now();
        let at = at.unwrap_or(as_of);
        self.store.transaction(|roster| {
            let mut touched = Vec::new();
            let status = apply(roster, id, transition, at, as_of, &mut touched)?;
            dedup_in_order(&mut touched);
            Ok(TransitionReport {
                subject: id,
                transition,
                at,
                status,
                touched,
            })
        })
    }

    pub fn employ(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::Employ, at)
    }

    pub fn release(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::Release, at)
    }

    pub fn suspend(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::Suspend, at)
    }

    pub fn reinstate(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::Reinstate, at)
    }

    pub fn injure(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::Injure, at)
    }

    pub fn clear_injury(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::ClearInjury, at)
    }

    pub fn retire(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::Retire, at)
    }

    pub fn unretire(&self, id: RosterId, at: Option<Timestamp>) -> Result<TransitionReport, LifecycleError> {
        self.transition(id, Transition::Unretire, at)
    }

    // -- Composites -------------------------------------------------------

    /// Form a tag team from two wrestlers. With `started_at`, the team is
    /// employed in the same transaction.
    pub fn form_tag_team(
        &self,
        name: RosterName,
        wrestlers: &[RosterId],
        started_at: Option<Timestamp>,
    ) -> Result<RosterEntry, LifecycleError> {
        let as_of = self.now();
        self.store.transaction(|roster| {
            formation::check_tag_team(roster, wrestlers, as_of)?;
            let id = insert_composite(roster, RosterKind::TagTeam, name, wrestlers, started_at, as_of)?;
            tracing::debug!(%id, "formed tag team");
            roster.live(id).cloned().ok_or(LifecycleError::UnknownEntry(id))
        })
    }

    /// Form a stable from wrestlers and tag teams. With `started_at`, the
    /// stable is activated in the same transaction.
    pub fn form_stable(
        &self,
        name: RosterName,
        wrestlers: &[RosterId],
        tag_teams: &[RosterId],
        started_at: Option<Timestamp>,
    ) -> Result<RosterEntry, LifecycleError> {
        let as_of = self.now();
        self.store.transaction(|roster| {
            let members = formation::resolve_stable_members(roster, wrestlers, tag_teams, as_of)?;
            let id = insert_composite(roster, RosterKind::Stable, name, &members, started_at, as_of)?;
            tracing::debug!(%id, members = members.len(), "formed stable");
            roster.live(id).cloned().ok_or(LifecycleError::UnknownEntry(id))
        })
    }

    /// Add `participant` to `composite`.
    pub fn add_member(
        &self,
        composite: RosterId,
        participant: RosterId,
        at: Option<Timestamp>,
    ) -> Result<RosterEntry, LifecycleError> {
        let as_of = self.now();
        let at = at.unwrap_or(as_of);
        self.store.transaction(|roster| {
            formation::check_join(roster, composite, participant, as_of)?;
            let entry = roster
                .get_mut(composite)
                .ok_or(LifecycleError::UnknownEntry(composite))?;
            entry.members.push(Membership {
                participant,
                joined_at: at,
                left_at: None,
            });
            refresh(roster, composite, as_of);
            tracing::debug!(%composite, %participant, "member joined");
            roster.live(composite).cloned().ok_or(LifecycleError::UnknownEntry(composite))
        })
    }

    /// Remove `participant` from `composite`.
    pub fn remove_member(
        &self,
        composite: RosterId,
        participant: RosterId,
        at: Option<Timestamp>,
    ) -> Result<RosterEntry, LifecycleError> {
        let as_of = self.now();
        let at = at.unwrap_or(as_of);
        self.store.transaction(|roster| {
            formation::check_leave(roster, composite, participant)?;
            let entry = roster
                .get_mut(composite)
                .ok_or(LifecycleError::UnknownEntry(composite))?;
            for membership in entry.members.iter_mut() {
                if membership.participant == participant && membership.is_current() {
                    membership.left_at = Some(at.max(membership.joined_at));
                }
            }
            refresh(roster, composite, as_of);
            tracing::debug!(%composite, %participant, "member left");
            roster.live(composite).cloned().ok_or(LifecycleError::UnknownEntry(composite))
        })
    }

    // -- Matches ----------------------------------------------------------

    /// Validate a proposed match's shape and the bookability of everyone in it.
    pub fn check_match(&self, proposed: &ProposedMatch) -> Result<(), MatchCheckError> {
        matches::validate(proposed)?;
        let as_of = self.now();
        self.store
            .read(|roster| matches::check_booking(roster, proposed, as_of))?;
        Ok(())
    }
}

// ─── Transaction Bodies ──────────────────────────────────────────────

fn apply(
    roster: &mut Roster,
    id: RosterId,
    transition: Transition,
    at: Timestamp,
    as_of: Timestamp,
    touched: &mut Vec<RosterId>,
) -> Result<RosterStatus, LifecycleError> {
    let kind = roster
        .live(id)
        .map(|e| e.kind)
        .ok_or(LifecycleError::UnknownEntry(id))?;
    let (profile, facts) = roster
        .facts(id, as_of)
        .ok_or(LifecycleError::UnknownEntry(id))?;
    if !profile.supports(transition) {
        return Err(LifecycleError::Unsupported {
            kind,
            action: transition.as_str(),
        });
    }
    let retirement_open = roster
        .ledger()
        .open_interval(id, IntervalKind::Retirement)
        .is_some();
    if !transition.permitted_by(&facts) || (transition == Transition::Employ && retirement_open) {
        let status = roster.evaluate(id, as_of).unwrap_or(RosterStatus::Unemployed);
        return Err(LifecycleError::guard(transition, id, kind, status));
    }
    check_dates(roster, &profile, id, transition, at, as_of)?;

    write_intervals(roster, &profile, id, transition, at, as_of)?;
    let mut status = refresh(roster, id, as_of).unwrap_or(RosterStatus::Unemployed);
    touched.push(id);
    tracing::debug!(
        %id,
        kind = %kind,
        transition = transition.as_str(),
        at = %at,
        status = status.as_str(),
        "applied lifecycle transition"
    );

    if kind.is_participant() {
        cascade_up(roster, id, as_of, touched);
    } else if kind.is_composite() && transition.cascades_to_members() {
        let members = eligible_members(roster, id, transition, as_of);
        if !members.is_empty() {
            tracing::info!(
                composite = %id,
                transition = transition.as_str(),
                members = members.len(),
                "cascading transition to members"
            );
        }
        for member in members {
            apply(roster, member, transition, at, as_of, touched)?;
        }
        status = refresh(roster, id, as_of).unwrap_or(status);
    }
    Ok(status)
}

/// Refuse an `at` that would leave the ledger out of order. Runs after the
/// guard, so the intervals a transition closes are known to be open.
fn check_dates(
    roster: &Roster,
    profile: &LifecycleProfile,
    id: RosterId,
    transition: Transition,
    at: Timestamp,
    as_of: Timestamp,
) -> Result<(), LifecycleError> {
    let kind = profile.kind;
    let action = transition.as_str();
    if transition != Transition::Employ && at > as_of {
        return Err(LifecycleError::FutureDated { id, kind, action, at });
    }

    let engagement = profile.engagement;
    // `started`: open intervals `at` must not precede (closed, or the
    // engagement a new suspension or injury sits inside).
    // `ended`: kinds whose previous interval must have ended by `at`.
    let (started, ended) = match transition {
        Transition::Employ => (vec![], vec![engagement]),
        Transition::Release => (vec![IntervalKind::Suspension, IntervalKind::Injury, engagement], vec![]),
        Transition::Suspend => (vec![engagement], vec![IntervalKind::Suspension]),
        Transition::Reinstate => (vec![IntervalKind::Suspension], vec![]),
        Transition::Injure => (vec![engagement], vec![IntervalKind::Injury]),
        Transition::ClearInjury => (vec![IntervalKind::Injury], vec![]),
        Transition::Retire => (
            vec![IntervalKind::Suspension, IntervalKind::Injury, engagement],
            vec![IntervalKind::Retirement],
        ),
        Transition::Unretire => (vec![IntervalKind::Retirement], vec![engagement]),
    };

    let ledger = roster.ledger();
    let out_of_order = |interval: IntervalKind, edge: &'static str, boundary: Timestamp| {
        LifecycleError::OutOfOrder {
            id,
            kind,
            action,
            at,
            interval,
            edge,
            boundary,
        }
    };
    for interval in started {
        if let Some(open) = ledger.open_interval(id, interval) {
            if at < open.started_at {
                return Err(out_of_order(interval, "starts", open.started_at));
            }
        }
    }
    for interval in ended {
        if let Some(ended_at) = ledger.previous(id, interval).and_then(|i| i.ended_at) {
            if at < ended_at {
                return Err(out_of_order(interval, "ended", ended_at));
            }
        }
    }
    Ok(())
}

fn write_intervals(
    roster: &mut Roster,
    profile: &LifecycleProfile,
    id: RosterId,
    transition: Transition,
    at: Timestamp,
    as_of: Timestamp,
) -> Result<(), IntervalError> {
    let kind = profile.kind;
    let engagement = profile.engagement;
    match transition {
        Transition::Employ => {
            let ledger = roster.ledger_mut();
            if ledger.has_future_open(id, engagement, as_of) {
                ledger.redate_future(id, engagement, at, as_of)?;
            } else {
                ledger.open(kind, id, engagement, at)?;
            }
        }
        Transition::Release => {
            close_if_open(roster, id, IntervalKind::Suspension, at)?;
            close_if_open(roster, id, IntervalKind::Injury, at)?;
            roster.ledger_mut().close(id, engagement, at)?;
        }
        Transition::Suspend => {
            roster.ledger_mut().open(kind, id, IntervalKind::Suspension, at)?;
        }
        Transition::Reinstate => {
            // Composites suspended only through a member have nothing of their own to close.
            close_if_open(roster, id, IntervalKind::Suspension, at)?;
        }
        Transition::Injure => {
            roster.ledger_mut().open(kind, id, IntervalKind::Injury, at)?;
        }
        Transition::ClearInjury => {
            roster.ledger_mut().close(id, IntervalKind::Injury, at)?;
        }
        Transition::Retire => {
            close_if_open(roster, id, IntervalKind::Suspension, at)?;
            close_if_open(roster, id, IntervalKind::Injury, at)?;
            let ledger = roster.ledger_mut();
            ledger.close(id, engagement, at)?;
            ledger.open(kind, id, IntervalKind::Retirement, at)?;
        }
        Transition::Unretire => {
            let ledger = roster.ledger_mut();
            ledger.close(id, IntervalKind::Retirement, at)?;
            ledger.open(kind, id, engagement, at)?;
        }
    }
    Ok(())
}

fn close_if_open(
    roster: &mut Roster,
    id: RosterId,
    kind: IntervalKind,
    at: Timestamp,
) -> Result<(), IntervalError> {
    let ledger = roster.ledger_mut();
    if ledger.open_interval(id, kind).is_some() {
        ledger.close(id, kind, at)?;
    }
    Ok(())
}

fn insert_composite(
    roster: &mut Roster,
    kind: RosterKind,
    name: RosterName,
    members: &[RosterId],
    started_at: Option<Timestamp>,
    as_of: Timestamp,
) -> Result<RosterId, LifecycleError> {
    let mut entry = RosterEntry::new(kind, name, as_of);
    let joined_at = started_at.unwrap_or(as_of);
    entry.members = members
        .iter()
        .map(|participant| Membership {
            participant: *participant,
            joined_at,
            left_at: None,
        })
        .collect();
    let id = entry.id;
    roster.insert(entry);
    match started_at {
        Some(at) => {
            apply(roster, id, Transition::Employ, at, as_of, &mut Vec::new())?;
        }
        None => {
            refresh(roster, id, as_of);
        }
    }
    Ok(id)
}

fn dedup_in_order(ids: &mut Vec<RosterId>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRosterStore;
    use ringside_core::FixedClock;

    type Engine = LifecycleEngine<MemoryRosterStore>;

    fn t0() -> Timestamp {
        Timestamp::parse("2026-03-01T12:00:00Z").unwrap()
    }

    fn engine() -> (Engine, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(t0()));
        (LifecycleEngine::new(MemoryRosterStore::new(), clock.clone()), clock)
    }

    fn name(s: &str) -> RosterName {
        RosterName::new(s).unwrap()
    }

    fn register(engine: &Engine, kind: RosterKind, n: &str) -> RosterId {
        engine.register(kind, name(n)).unwrap().id
    }

    /// A wrestler employed since yesterday.
    fn employed(engine: &Engine, n: &str) -> RosterId {
        let id = register(engine, RosterKind::Wrestler, n);
        engine.employ(id, Some(engine.now().add_days(-1))).unwrap();
        id
    }

    /// A tag team of two employed wrestlers, employed from now.
    fn tag_team(engine: &Engine) -> (RosterId, RosterId, RosterId) {
        let a = employed(engine, "Edge");
        let b = employed(engine, "Christian");
        let team = engine
            .form_tag_team(name("Edge & Christian"), &[a, b], Some(engine.now()))
            .unwrap()
            .id;
        (team, a, b)
    }

    fn status(engine: &Engine, id: RosterId) -> RosterStatus {
        engine.get(id).unwrap().status
    }

    fn intervals(engine: &Engine, id: RosterId, kind: IntervalKind) -> Vec<Interval> {
        engine
            .history(id)
            .unwrap()
            .into_iter()
            .filter(|i| i.kind == kind)
            .collect()
    }

    fn open_count(engine: &Engine, id: RosterId, kind: IntervalKind) -> usize {
        intervals(engine, id, kind).iter().filter(|i| i.is_open()).count()
    }

    // -- Participants -----------------------------------------------------

    #[test]
    fn test_new_participant_is_unemployed() {
        let (engine, _) = engine();
        let id = register(&engine, RosterKind::Referee, "Mike Chioda");
        assert_eq!(status(&engine, id), RosterStatus::Unemployed);
    }

    #[test]
    fn test_employ_release_employ_keeps_history() {
        let (engine, clock) = engine();
        let id = register(&engine, RosterKind::Wrestler, "Chris Jericho");
        engine.employ(id, None).unwrap();
        clock.advance_days(1);
        engine.release(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Released);
        clock.advance_days(1);
        engine.employ(id, None).unwrap();

        let employments = intervals(&engine, id, IntervalKind::Employment);
        assert_eq!(employments.len(), 2);
        assert!(!employments[0].is_open());
        assert!(employments[1].is_open());
        assert_eq!(status(&engine, id), RosterStatus::Available);
    }

    #[test]
    fn test_scenario_suspend_reinstate_retire() {
        let (engine, _) = engine();
        let id = employed(&engine, "Brock Lesnar");

        engine.suspend(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Suspended);

        engine.reinstate(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Available);

        engine.retire(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Retired);

        let suspension = intervals(&engine, id, IntervalKind::Suspension).pop().unwrap();
        let retirement = intervals(&engine, id, IntervalKind::Retirement).pop().unwrap();
        assert_eq!(suspension.ended_at, Some(retirement.started_at));
    }

    #[test]
    fn test_retire_while_suspended_closes_suspension_at_same_instant() {
        let (engine, clock) = engine();
        let id = employed(&engine, "Randy Orton");
        engine.suspend(id, None).unwrap();
        clock.advance_days(3);

        let report = engine.retire(id, None).unwrap();
        assert_eq!(report.status, RosterStatus::Retired);
        assert_eq!(open_count(&engine, id, IntervalKind::Suspension), 0);

        let suspension = intervals(&engine, id, IntervalKind::Suspension).pop().unwrap();
        let retirement = intervals(&engine, id, IntervalKind::Retirement).pop().unwrap();
        assert_eq!(suspension.ended_at, Some(t0().add_days(3)));
        assert_eq!(retirement.started_at, t0().add_days(3));
        assert_eq!(open_count(&engine, id, IntervalKind::Employment), 0);
    }

    #[test]
    fn test_release_while_injured_clears_injury() {
        let (engine, _) = engine();
        let id = employed(&engine, "Kurt Angle");
        engine.injure(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Injured);

        engine.release(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Released);
        assert_eq!(open_count(&engine, id, IntervalKind::Injury), 0);
    }

    #[test]
    fn test_second_suspend_fails_and_leaves_one_open_suspension() {
        let (engine, _) = engine();
        let id = employed(&engine, "Shawn Michaels");
        engine.suspend(id, None).unwrap();

        let err = engine.suspend(id, None).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::CannotBeSuspended {
                id,
                kind: RosterKind::Wrestler,
                status: RosterStatus::Suspended
            }
        );
        assert!(err.is_guard_failure());
        assert_eq!(open_count(&engine, id, IntervalKind::Suspension), 1);
    }

    #[test]
    fn test_injured_cannot_be_suspended() {
        let (engine, _) = engine();
        let id = employed(&engine, "Mick Foley");
        engine.injure(id, None).unwrap();
        assert!(matches!(
            engine.suspend(id, None),
            Err(LifecycleError::CannotBeSuspended { .. })
        ));
        engine.clear_injury(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Available);
    }

    // -- Dating ---------------------------------------------------------

    #[test]
    fn test_future_dated_retire_is_refused() {
        let (engine, clock) = engine();
        let id = employed(&engine, "Owen Hart");

        let err = engine.retire(id, Some(t0().add_days(5))).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::FutureDated {
                id,
                kind: RosterKind::Wrestler,
                action: "retire",
                at: t0().add_days(5),
            }
        );
        assert_eq!(status(&engine, id), RosterStatus::Available);
        assert!(matches!(
            engine.employ(id, None),
            Err(LifecycleError::CannotBeEmployed { .. })
        ));

        clock.advance_days(6);
        assert!(matches!(
            engine.unretire(id, None),
            Err(LifecycleError::CannotBeUnretired { .. })
        ));
        assert_eq!(open_count(&engine, id, IntervalKind::Employment), 1);
        assert_eq!(open_count(&engine, id, IntervalKind::Retirement), 0);
    }

    #[test]
    fn test_only_employment_may_be_future_dated() {
        let (engine, _) = engine();
        let id = employed(&engine, "Ricky Steamboat");
        let tomorrow = Some(t0().add_days(1));
        for transition in [Transition::Suspend, Transition::Injure, Transition::Release] {
            assert!(matches!(
                engine.transition(id, transition, tomorrow),
                Err(LifecycleError::FutureDated { .. })
            ));
        }
        assert_eq!(status(&engine, id), RosterStatus::Available);
    }

    #[test]
    fn test_backdated_release_before_suspension_is_out_of_order() {
        let (engine, _) = engine();
        let id = employed(&engine, "Jeff Hardy");
        engine.suspend(id, None).unwrap();

        let err = engine.release(id, Some(t0().add_days(-1))).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::OutOfOrder {
                interval: IntervalKind::Suspension,
                edge: "starts",
                ..
            }
        ));
        assert!(!matches!(err, LifecycleError::Interval(_)));
        assert_eq!(status(&engine, id), RosterStatus::Suspended);
        assert_eq!(open_count(&engine, id, IntervalKind::Suspension), 1);
        assert_eq!(open_count(&engine, id, IntervalKind::Employment), 1);
    }

    #[test]
    fn test_backdated_retire_before_injury_is_out_of_order() {
        let (engine, clock) = engine();
        let id = employed(&engine, "Edge");
        engine.injure(id, None).unwrap();
        clock.advance_days(2);

        assert!(matches!(
            engine.retire(id, Some(t0().add_days(-1))),
            Err(LifecycleError::OutOfOrder {
                interval: IntervalKind::Injury,
                ..
            })
        ));
        engine.retire(id, Some(t0().add_days(1))).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Retired);
    }

    #[test]
    fn test_suspension_cannot_predate_employment() {
        let (engine, _) = engine();
        let id = employed(&engine, "Rey Mysterio");
        assert!(matches!(
            engine.suspend(id, Some(t0().add_days(-2))),
            Err(LifecycleError::OutOfOrder {
                interval: IntervalKind::Employment,
                edge: "starts",
                ..
            })
        ));
    }

    #[test]
    fn test_reemployment_cannot_overlap_previous_employment() {
        let (engine, clock) = engine();
        let id = register(&engine, RosterKind::Manager, "Paul Bearer");
        engine.employ(id, None).unwrap();
        clock.advance_days(3);
        engine.release(id, None).unwrap();

        assert!(matches!(
            engine.employ(id, Some(t0().add_days(1))),
            Err(LifecycleError::OutOfOrder {
                interval: IntervalKind::Employment,
                edge: "ended",
                ..
            })
        ));
        engine.employ(id, Some(t0().add_days(3))).unwrap();
        assert_eq!(intervals(&engine, id, IntervalKind::Employment).len(), 2);
    }

    #[test]
    fn test_misdated_cascade_discards_whole_transaction() {
        let (engine, _) = engine();
        let a = employed(&engine, "Arn Anderson");
        let b = employed(&engine, "Tully Blanchard");
        let yesterday = t0().add_days(-1);
        let team = engine
            .form_tag_team(name("The Brain Busters"), &[a, b], Some(yesterday))
            .unwrap()
            .id;
        engine.injure(b, None).unwrap();

        // The team and Arn can retire as of yesterday; Tully's injury began today.
        assert!(matches!(
            engine.retire(team, Some(yesterday)),
            Err(LifecycleError::OutOfOrder {
                interval: IntervalKind::Injury,
                ..
            })
        ));
        assert_eq!(open_count(&engine, team, IntervalKind::Retirement), 0);
        assert_eq!(open_count(&engine, a, IntervalKind::Retirement), 0);
        assert_eq!(open_count(&engine, team, IntervalKind::Employment), 1);
        assert_eq!(open_count(&engine, b, IntervalKind::Injury), 1);
    }

    #[test]
    fn test_future_employment_is_pending_then_redated() {
        let (engine, _) = engine();
        let id = register(&engine, RosterKind::Manager, "Jimmy Hart");
        engine.employ(id, Some(t0().add_days(7))).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::PendingEmployment);
        assert!(matches!(
            engine.release(id, None),
            Err(LifecycleError::CannotBeReleased { .. })
        ));

        engine.employ(id, None).unwrap();
        let employments = intervals(&engine, id, IntervalKind::Employment);
        assert_eq!(employments.len(), 1);
        assert_eq!(employments[0].started_at, t0());
        assert_eq!(status(&engine, id), RosterStatus::Available);
    }

    #[test]
    fn test_pending_employment_becomes_available_after_refresh() {
        let (engine, clock) = engine();
        let id = register(&engine, RosterKind::Wrestler, "Goldberg");
        engine.employ(id, Some(t0().add_days(2))).unwrap();
        clock.advance_days(2);
        assert_eq!(engine.refresh_all(), vec![id]);
        assert_eq!(status(&engine, id), RosterStatus::Available);
    }

    #[test]
    fn test_retired_cannot_be_employed_but_can_be_unretired() {
        let (engine, clock) = engine();
        let id = employed(&engine, "Ric Flair");
        engine.retire(id, None).unwrap();
        assert!(matches!(
            engine.employ(id, None),
            Err(LifecycleError::CannotBeEmployed {
                status: RosterStatus::Retired,
                ..
            })
        ));
        clock.advance_days(30);
        engine.unretire(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Available);
        assert_eq!(intervals(&engine, id, IntervalKind::Employment).len(), 2);
        assert_eq!(open_count(&engine, id, IntervalKind::Retirement), 0);
    }

    #[test]
    fn test_unknown_entry() {
        let (engine, _) = engine();
        let id = RosterId::new();
        assert_eq!(engine.employ(id, None), Err(LifecycleError::UnknownEntry(id)));
    }

    #[test]
    fn test_soft_deleted_entry_rejects_transitions_until_restored() {
        let (engine, _) = engine();
        let id = register(&engine, RosterKind::Wrestler, "Hulk Hogan");
        engine.soft_delete(id).unwrap();
        assert!(engine.get(id).is_none());
        assert_eq!(engine.employ(id, None), Err(LifecycleError::UnknownEntry(id)));
        assert_eq!(engine.soft_delete(id), Err(LifecycleError::UnknownEntry(id)));

        engine.restore(id).unwrap();
        engine.employ(id, None).unwrap();
        assert_eq!(status(&engine, id), RosterStatus::Available);
    }

    #[test]
    fn test_register_rejects_composites() {
        let (engine, _) = engine();
        assert!(matches!(
            engine.register(RosterKind::TagTeam, name("nWo")),
            Err(LifecycleError::Unsupported { .. })
        ));
    }

    // -- Tag teams --------------------------------------------------------

    #[test]
    fn test_formed_tag_team_is_bookable() {
        let (engine, _) = engine();
        let (team, _, _) = tag_team(&engine);
        let entry = engine.get(team).unwrap();
        assert_eq!(entry.status, RosterStatus::Available);
        assert_eq!(entry.status.label(entry.kind), "Bookable");
        assert_eq!(entry.current_members().len(), 2);
    }

    #[test]
    fn test_tag_team_without_start_is_unemployed() {
        let (engine, _) = engine();
        let a = employed(&engine, "Road Warrior Hawk");
        let b = employed(&engine, "Road Warrior Animal");
        let team = engine
            .form_tag_team(name("Legion of Doom"), &[a, b], None)
            .unwrap();
        assert_eq!(team.status, RosterStatus::Unemployed);
    }

    #[test]
    fn test_retiring_tag_team_retires_both_wrestlers_once() {
        let (engine, _) = engine();
        let (team, a, b) = tag_team(&engine);

        let report = engine.retire(team, None).unwrap();
        assert_eq!(report.status, RosterStatus::Retired);
        assert_eq!(report.touched, vec![team, a, b]);

        for wrestler in [a, b] {
            assert_eq!(intervals(&engine, wrestler, IntervalKind::Retirement).len(), 1);
            assert_eq!(status(&engine, wrestler), RosterStatus::Retired);
        }
    }

    #[test]
    fn test_suspended_member_suspends_tag_team() {
        let (engine, _) = engine();
        let (team, a, _) = tag_team(&engine);

        let report = engine.suspend(a, None).unwrap();
        assert!(report.touched.contains(&team));
        assert_eq!(status(&engine, team), RosterStatus::Suspended);

        engine.reinstate(team, None).unwrap();
        assert_eq!(status(&engine, a), RosterStatus::Available);
        assert_eq!(status(&engine, team), RosterStatus::Available);
    }

    #[test]
    fn test_suspending_tag_team_suspends_members() {
        let (engine, _) = engine();
        let (team, a, b) = tag_team(&engine);
        engine.suspend(team, None).unwrap();
        assert_eq!(status(&engine, team), RosterStatus::Suspended);
        assert_eq!(status(&engine, a), RosterStatus::Suspended);
        assert_eq!(status(&engine, b), RosterStatus::Suspended);

        engine.reinstate(team, None).unwrap();
        for id in [team, a, b] {
            assert_eq!(status(&engine, id), RosterStatus::Available);
        }
    }

    #[test]
    fn test_injured_member_makes_tag_team_unbookable() {
        let (engine, _) = engine();
        let (team, _, b) = tag_team(&engine);
        engine.injure(b, None).unwrap();
        assert_eq!(status(&engine, team), RosterStatus::Unbookable);
        engine.clear_injury(b, None).unwrap();
        assert_eq!(status(&engine, team), RosterStatus::Available);
    }

    #[test]
    fn test_tag_team_cannot_be_injured() {
        let (engine, _) = engine();
        let (team, _, _) = tag_team(&engine);
        assert_eq!(
            engine.injure(team, None),
            Err(LifecycleError::Unsupported {
                kind: RosterKind::TagTeam,
                action: "injure"
            })
        );
    }

    #[test]
    fn test_releasing_tag_team_leaves_members_employed() {
        let (engine, _) = engine();
        let (team, a, b) = tag_team(&engine);
        engine.release(team, None).unwrap();
        assert_eq!(status(&engine, team), RosterStatus::Released);
        assert_eq!(status(&engine, a), RosterStatus::Available);
        assert_eq!(status(&engine, b), RosterStatus::Available);
    }

    #[test]
    fn test_member_leaving_makes_tag_team_unbookable() {
        let (engine, _) = engine();
        let (team, a, _) = tag_team(&engine);
        let entry = engine.remove_member(team, a, None).unwrap();
        assert_eq!(entry.status, RosterStatus::Unbookable);

        let replacement = employed(&engine, "Matt Hardy");
        let entry = engine.add_member(team, replacement, None).unwrap();
        assert_eq!(entry.status, RosterStatus::Available);
        assert_eq!(entry.members.len(), 3);
    }

    #[test]
    fn test_tag_team_formation_rules() {
        let (engine, _) = engine();
        let (_, a, _) = tag_team(&engine);
        let c = employed(&engine, "Jeff Hardy");
        let rookie = register(&engine, RosterKind::Wrestler, "Rookie");

        let err = engine.form_tag_team(name("Solo"), &[c], None).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Formation(FormationError::PartnerCount {
                expected: 2,
                actual: 1
            })
        );

        let err = engine.form_tag_team(name("Twins"), &[c, c], None).unwrap_err();
        assert_eq!(err, LifecycleError::Formation(FormationError::DuplicateMember(c)));

        let err = engine.form_tag_team(name("Green"), &[c, rookie], None).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Formation(FormationError::NotEmployed { .. })
        ));

        let err = engine.form_tag_team(name("Poached"), &[c, a], None).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Formation(FormationError::AlreadyInTagTeam { .. })
        ));
    }

    #[test]
    fn test_deleting_member_makes_tag_team_unbookable() {
        let (engine, _) = engine();
        let (team, a, _) = tag_team(&engine);
        let touched = engine.soft_delete(a).unwrap();
        assert_eq!(touched, vec![a, team]);
        assert_eq!(status(&engine, team), RosterStatus::Unbookable);
    }

    // -- Stables and titles -----------------------------------------------

    #[test]
    fn test_stable_lifecycle() {
        let (engine, _) = engine();
        let (team, a, b) = tag_team(&engine);
        let leader = employed(&engine, "Triple H");
        let stable = engine
            .form_stable(name("Evolution"), &[leader], &[team], Some(t0()))
            .unwrap();
        assert_eq!(stable.status, RosterStatus::Available);
        assert_eq!(stable.status.label(RosterKind::Stable), "Active");
        let mut members = stable.current_members();
        members.sort();
        let mut expected = vec![leader, a, b];
        expected.sort();
        assert_eq!(members, expected);

        engine.release(stable.id, None).unwrap();
        let entry = engine.get(stable.id).unwrap();
        assert_eq!(entry.status.label(RosterKind::Stable), "Inactive");
        assert_eq!(intervals(&engine, stable.id, IntervalKind::Activation).len(), 1);
        assert_eq!(status(&engine, leader), RosterStatus::Available);
    }

    #[test]
    fn test_retiring_stable_retires_members() {
        let (engine, _) = engine();
        let members: Vec<RosterId> = ["Arn", "Ric", "Tully"]
            .into_iter()
            .map(|n| employed(&engine, n))
            .collect();
        let stable = engine
            .form_stable(name("Four Horsemen"), &members, &[], Some(t0()))
            .unwrap()
            .id;
        engine.retire(stable, None).unwrap();
        for id in members {
            assert_eq!(status(&engine, id), RosterStatus::Retired);
        }
    }

    #[test]
    fn test_stable_needs_three_members() {
        let (engine, _) = engine();
        let a = employed(&engine, "Kevin Nash");
        let b = employed(&engine, "Scott Hall");
        let err = engine.form_stable(name("Outsiders"), &[a, b], &[], None).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Formation(FormationError::TooFewMembers {
                minimum: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_member_cannot_join_second_stable() {
        let (engine, _) = engine();
        let members: Vec<RosterId> = ["Bubba", "D-Von", "Spike"]
            .into_iter()
            .map(|n| employed(&engine, n))
            .collect();
        engine
            .form_stable(name("Dudley Boyz"), &members, &[], None)
            .unwrap();
        let x = employed(&engine, "X");
        let y = employed(&engine, "Y");
        let err = engine
            .form_stable(name("Rivals"), &[members[0], x, y], &[], None)
            .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Formation(FormationError::AlreadyInStable { .. })
        ));
    }

    #[test]
    fn test_title_lifecycle() {
        let (engine, _) = engine();
        let title = register(&engine, RosterKind::Title, "Intercontinental Championship");
        let label = |engine: &Engine| {
            let entry = engine.get(title).unwrap();
            entry.status.label(entry.kind)
        };
        assert_eq!(label(&engine), "Unactivated");

        engine.employ(title, Some(t0().add_days(3))).unwrap();
        assert_eq!(label(&engine), "Pending Introduction");

        engine.employ(title, None).unwrap();
        assert_eq!(label(&engine), "Active");
        assert!(matches!(
            engine.suspend(title, None),
            Err(LifecycleError::Unsupported { .. })
        ));

        engine.release(title, None).unwrap();
        assert_eq!(label(&engine), "Inactive");
        assert!(matches!(
            engine.retire(title, None),
            Err(LifecycleError::CannotBeRetired { .. })
        ));

        engine.employ(title, None).unwrap();
        engine.retire(title, None).unwrap();
        assert_eq!(label(&engine), "Retired");
        engine.unretire(title, None).unwrap();
        assert_eq!(label(&engine), "Active");
        assert!(intervals(&engine, title, IntervalKind::Employment).is_empty());
    }

    // -- Matches ----------------------------------------------------------

    #[test]
    fn test_check_match_requires_bookable_competitors() {
        use crate::matches::{MatchSide, MatchTypeTemplate};

        let (engine, _) = engine();
        let a = employed(&engine, "The Rock");
        let b = employed(&engine, "Stone Cold");
        let side = |id: RosterId| MatchSide {
            wrestlers: vec![id],
            tag_teams: vec![],
        };
        let singles = |x: RosterId, y: RosterId| ProposedMatch {
            template: MatchTypeTemplate::fixed(2, 2),
            sides: vec![side(x), side(y)],
        };

        assert_eq!(engine.check_match(&singles(a, b)), Ok(()));
        assert_eq!(
            engine.check_match(&singles(a, a)),
            Err(MatchCheckError::Booking(BookingError::DuplicateCompetitor(a)))
        );

        engine.suspend(b, None).unwrap();
        assert_eq!(
            engine.check_match(&singles(a, b)),
            Err(MatchCheckError::Booking(BookingError::NotBookable {
                id: b,
                status: RosterStatus::Suspended
            }))
        );
    }

    #[test]
    fn test_check_match_rejects_wrestler_booked_twice_through_team() {
        use crate::matches::{MatchSide, MatchTypeTemplate};

        let (engine, _) = engine();
        let (team, a, _) = tag_team(&engine);
        let proposed = ProposedMatch {
            template: MatchTypeTemplate::open(),
            sides: vec![
                MatchSide {
                    wrestlers: vec![],
                    tag_teams: vec![team],
                },
                MatchSide {
                    wrestlers: vec![a],
                    tag_teams: vec![],
                },
            ],
        };
        assert_eq!(
            engine.check_match(&proposed),
            Err(MatchCheckError::Booking(BookingError::DuplicateCompetitor(a)))
        );
    }

    // -- Concurrency ------------------------------------------------------

    #[test]
    fn test_concurrent_suspends_have_one_winner() {
        let (engine, _) = engine();
        let id = employed(&engine, "Sting");
        let results: Vec<Result<TransitionReport, LifecycleError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| engine.suspend(id, None)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(LifecycleError::is_guard_failure));
        assert_eq!(open_count(&engine, id, IntervalKind::Suspension), 1);
    }

    // -- Properties -------------------------------------------------------

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Target, transition, days to advance the clock, and an optional
        /// offset in days from now for `at`.
        fn step() -> impl Strategy<Value = (usize, usize, i64, Option<i64>)> {
            (
                0usize..4,
                0usize..Transition::ALL.len(),
                0i64..3,
                prop::option::of(-3i64..5),
            )
        }

        proptest! {
            /// Random transition sequences, dated or not, never open a
            /// second interval of a kind, never raise a ledger error, and
            /// leave every cached status equal to a fresh derivation.
            #[test]
            fn random_sequences_preserve_invariants(steps in prop::collection::vec(step(), 1..40)) {
                let (engine, clock) = engine();
                let (team, a, b) = tag_team(&engine);
                let manager = register(&engine, RosterKind::Manager, "Bobby Heenan");
                let targets = [a, b, team, manager];

                for (target, transition, days, offset) in steps {
                    clock.advance_days(days);
                    let at = offset.map(|d| engine.now().add_days(d));
                    let result = engine.transition(targets[target], Transition::ALL[transition], at);
                    if let Err(err) = &result {
                        prop_assert!(!matches!(err, LifecycleError::Interval(_)), "ledger error: {err}");
                    }

                    let now = engine.now();
                    for id in targets {
                        for kind in IntervalKind::ALL {
                            prop_assert!(open_count(&engine, id, kind) <= 1);
                        }
                        let entry = engine.get(id).unwrap();
                        if entry.kind.is_participant() {
                            prop_assert_ne!(entry.status, RosterStatus::Unbookable);
                        }
                        let fresh = engine.store().read(|roster| roster.evaluate(id, now));
                        prop_assert_eq!(Some(entry.status), fresh);
                    }
                }
            }
        }
    }
}
