//! # Composite Formation
//!
//! Rules for who may form or join a tag team or stable.
//!
//! - A tag team is exactly two distinct wrestlers. Each must be employed or
//!   pending employment, and neither may already be a current member of
//!   another tag team.
//! - A stable is built from wrestlers and tag teams; each tag team
//!   contributes its current wrestlers. The resulting set must hold at least
//!   three distinct members, none of them already in another current stable.
//!
//! The checks here only read the roster. The engine applies the membership
//! change once a check passes.

use std::collections::HashSet;

use ringside_core::{RosterId, RosterKind, Timestamp};
use thiserror::Error;

use crate::guard::{STABLE_MINIMUM, TAG_TEAM_SIZE};
use crate::roster::Roster;
use crate::status::RosterStatus;

/// A formation or membership rule was broken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormationError {
    #[error("a tag team needs exactly {expected} wrestlers (got {actual})")]
    PartnerCount { expected: usize, actual: usize },

    #[error("a stable needs at least {minimum} members (got {actual})")]
    TooFewMembers { minimum: usize, actual: usize },

    #[error("{0} is listed more than once")]
    DuplicateMember(RosterId),

    #[error("roster entry {0} not found")]
    UnknownMember(RosterId),

    #[error("{id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: RosterId,
        expected: RosterKind,
        actual: RosterKind,
    },

    /// The candidate is neither employed nor pending employment.
    #[error("{id} is {status} and cannot join")]
    NotEmployed { id: RosterId, status: RosterStatus },

    #[error("{wrestler} already belongs to tag team {tag_team}")]
    AlreadyInTagTeam { wrestler: RosterId, tag_team: RosterId },

    #[error("{member} already belongs to stable {stable}")]
    AlreadyInStable { member: RosterId, stable: RosterId },

    #[error("{0} is not a tag team or stable")]
    NotAComposite(RosterId),

    #[error("{participant} is already a member of {composite}")]
    AlreadyMember { composite: RosterId, participant: RosterId },

    #[error("{participant} is not a current member of {composite}")]
    NotAMember { composite: RosterId, participant: RosterId },

    #[error("tag team {0} already has two wrestlers")]
    TagTeamFull(RosterId),
}

impl FormationError {
    /// Stable machine-readable name of the broken rule.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PartnerCount { .. } => "partner_count",
            Self::TooFewMembers { .. } => "too_few_members",
            Self::DuplicateMember(_) => "duplicate_member",
            Self::UnknownMember(_) => "unknown_member",
            Self::WrongKind { .. } => "wrong_kind",
            Self::NotEmployed { .. } => "not_employed",
            Self::AlreadyInTagTeam { .. } => "already_in_tag_team",
            Self::AlreadyInStable { .. } => "already_in_stable",
            Self::NotAComposite(_) => "not_a_composite",
            Self::AlreadyMember { .. } => "already_member",
            Self::NotAMember { .. } => "not_a_member",
            Self::TagTeamFull(_) => "tag_team_full",
        }
    }
}

/// Check that `wrestlers` may form a new tag team.
pub fn check_tag_team(
    roster: &Roster,
    wrestlers: &[RosterId],
    as_of: Timestamp,
) -> Result<(), FormationError> {
    if wrestlers.len() != TAG_TEAM_SIZE {
        return Err(FormationError::PartnerCount {
            expected: TAG_TEAM_SIZE,
            actual: wrestlers.len(),
        });
    }
    reject_duplicates(wrestlers)?;
    for &wrestler in wrestlers {
        eligible_wrestler(roster, wrestler, as_of)?;
        not_in_other(roster, wrestler, RosterKind::TagTeam, None)?;
    }
    Ok(())
}

/// Resolve the member set of a new stable, expanding tag teams into their
/// current wrestlers.
pub fn resolve_stable_members(
    roster: &Roster,
    wrestlers: &[RosterId],
    tag_teams: &[RosterId],
    as_of: Timestamp,
) -> Result<Vec<RosterId>, FormationError> {
    let mut members = wrestlers.to_vec();
    for &team in tag_teams {
        let entry = roster
            .live(team)
            .ok_or(FormationError::UnknownMember(team))?;
        if entry.kind != RosterKind::TagTeam {
            return Err(FormationError::WrongKind {
                id: team,
                expected: RosterKind::TagTeam,
                actual: entry.kind,
            });
        }
        members.extend(roster.live_members(team));
    }
    reject_duplicates(&members)?;
    for &member in &members {
        eligible_wrestler(roster, member, as_of)?;
    }
    if members.len() < STABLE_MINIMUM {
        return Err(FormationError::TooFewMembers {
            minimum: STABLE_MINIMUM,
            actual: members.len(),
        });
    }
    for &member in &members {
        not_in_other(roster, member, RosterKind::Stable, None)?;
    }
    Ok(members)
}

/// Check that `participant` may join `composite`.
pub fn check_join(
    roster: &Roster,
    composite: RosterId,
    participant: RosterId,
    as_of: Timestamp,
) -> Result<(), FormationError> {
    let entry = roster
        .live(composite)
        .filter(|e| e.kind.is_composite())
        .ok_or(FormationError::NotAComposite(composite))?;
    if entry.has_current_member(participant) {
        return Err(FormationError::AlreadyMember {
            composite,
            participant,
        });
    }
    eligible_wrestler(roster, participant, as_of)?;
    if entry.kind == RosterKind::TagTeam && roster.live_members(composite).len() >= TAG_TEAM_SIZE {
        return Err(FormationError::TagTeamFull(composite));
    }
    not_in_other(roster, participant, entry.kind, Some(composite))
}

/// Check that `participant` is a current member of `composite`.
pub fn check_leave(
    roster: &Roster,
    composite: RosterId,
    participant: RosterId,
) -> Result<(), FormationError> {
    let entry = roster
        .live(composite)
        .filter(|e| e.kind.is_composite())
        .ok_or(FormationError::NotAComposite(composite))?;
    if !entry.has_current_member(participant) {
        return Err(FormationError::NotAMember {
            composite,
            participant,
        });
    }
    Ok(())
}

fn reject_duplicates(ids: &[RosterId]) -> Result<(), FormationError> {
    let mut seen = HashSet::new();
    match ids.iter().find(|id| !seen.insert(**id)) {
        Some(&dup) => Err(FormationError::DuplicateMember(dup)),
        None => Ok(()),
    }
}

fn eligible_wrestler(roster: &Roster, id: RosterId, as_of: Timestamp) -> Result<(), FormationError> {
    let entry = roster.live(id).ok_or(FormationError::UnknownMember(id))?;
    if entry.kind != RosterKind::Wrestler {
        return Err(FormationError::WrongKind {
            id,
            expected: RosterKind::Wrestler,
            actual: entry.kind,
        });
    }
    let status = roster
        .evaluate(id, as_of)
        .ok_or(FormationError::UnknownMember(id))?;
    if status.is_engaged() || status == RosterStatus::PendingEmployment {
        Ok(())
    } else {
        Err(FormationError::NotEmployed { id, status })
    }
}

fn not_in_other(
    roster: &Roster,
    participant: RosterId,
    kind: RosterKind,
    except: Option<RosterId>,
) -> Result<(), FormationError> {
    let other = roster
        .composites_of(participant, Some(kind))
        .into_iter()
        .find(|id| Some(*id) != except);
    match (other, kind) {
        (Some(tag_team), RosterKind::TagTeam) => Err(FormationError::AlreadyInTagTeam {
            wrestler: participant,
            tag_team,
        }),
        (Some(stable), _) => Err(FormationError::AlreadyInStable {
            member: participant,
            stable,
        }),
        (None, _) => Ok(()),
    }
}
