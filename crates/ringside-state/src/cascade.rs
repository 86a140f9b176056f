//! # Composite Cascade
//!
//! Propagation between participants and the composites built from them.
//!
//! ```text
//!            down: employ, suspend, reinstate, retire, unretire
//!   TagTeam / Stable ───────────────────────────────────────▶ current members
//!          ▲                                                      │
//!          └───────────── up: re-derive status ◀──────────────────┘
//! ```
//!
//! Down-cascades only touch members whose own guard admits the transition;
//! a member that is already retired is skipped by a composite retire, not
//! failed. Cascades go one level deep: members are participants and have no
//! members of their own.

use ringside_core::{RosterId, Timestamp};

use crate::guard::Transition;
use crate::roster::Roster;
use crate::status::RosterStatus;

/// Re-derive `id`'s status and store it on the entry.
pub fn refresh(roster: &mut Roster, id: RosterId, as_of: Timestamp) -> Option<RosterStatus> {
    let status = roster.evaluate(id, as_of)?;
    if let Some(entry) = roster.get_mut(id) {
        entry.status = status;
    }
    Some(status)
}

/// Re-derive every live composite `participant` currently belongs to.
pub fn cascade_up(roster: &mut Roster, participant: RosterId, as_of: Timestamp, touched: &mut Vec<RosterId>) {
    for composite in roster.composites_of(participant, None) {
        if let Some(status) = refresh(roster, composite, as_of) {
            tracing::info!(
                %participant,
                %composite,
                status = status.as_str(),
                "re-derived composite after member change"
            );
            touched.push(composite);
        }
    }
}

/// Current members of `composite` whose guard admits `transition` as of `as_of`.
pub fn eligible_members(
    roster: &Roster,
    composite: RosterId,
    transition: Transition,
    as_of: Timestamp,
) -> Vec<RosterId> {
    roster
        .live_members(composite)
        .into_iter()
        .filter(|member| {
            roster
                .facts(*member, as_of)
                .is_some_and(|(profile, facts)| {
                    profile.supports(transition) && transition.permitted_by(&facts)
                })
        })
        .collect()
}
