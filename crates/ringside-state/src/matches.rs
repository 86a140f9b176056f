//! # Match Composition
//!
//! Checks that a proposed match fits its match type: the right number of
//! sides and the right number of competitors. A tag team counts as two
//! competitors regardless of who is currently in it.
//!
//! Validation is lenient about incomplete input. An empty side
//! list, or any side with no competitors at all, is "not yet specified" and
//! passes; required-field checks belong to whoever builds the request.
//!
//! [`check_booking`] is the roster-aware half: every competitor must exist,
//! be of the right kind, be bookable, and appear only once.

use std::collections::HashSet;

use ringside_core::{RosterId, RosterKind, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::Roster;
use crate::status::RosterStatus;

// ─── Templates ───────────────────────────────────────────────────────

/// Side and competitor constraints of a match type. `None` is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchTypeTemplate {
    #[serde(default)]
    pub number_of_sides: Option<usize>,
    #[serde(default)]
    pub number_of_competitors: Option<usize>,
}

impl MatchTypeTemplate {
    /// A template with fixed sides and competitors.
    pub const fn fixed(sides: usize, competitors: usize) -> Self {
        Self {
            number_of_sides: Some(sides),
            number_of_competitors: Some(competitors),
        }
    }

    /// A template with no constraints (battle royals and the like).
    pub const fn open() -> Self {
        Self {
            number_of_sides: None,
            number_of_competitors: None,
        }
    }
}

/// A named, standard match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchType {
    pub name: &'static str,
    pub slug: &'static str,
    #[serde(flatten)]
    pub template: MatchTypeTemplate,
}

/// The standard match types.
pub const CATALOG: &[MatchType] = &[
    MatchType { name: "Singles", slug: "singles", template: MatchTypeTemplate::fixed(2, 2) },
    MatchType { name: "Tag Team", slug: "tagteam", template: MatchTypeTemplate::fixed(2, 4) },
    MatchType { name: "Triple Threat", slug: "triple", template: MatchTypeTemplate::fixed(3, 3) },
    MatchType { name: "Triangle", slug: "triangle", template: MatchTypeTemplate::fixed(3, 3) },
    MatchType { name: "Fatal 4 Way", slug: "fatal4way", template: MatchTypeTemplate::fixed(4, 4) },
    MatchType { name: "6 Man Tag Team", slug: "6man", template: MatchTypeTemplate::fixed(2, 6) },
    MatchType { name: "8 Man Tag Team", slug: "8man", template: MatchTypeTemplate::fixed(2, 8) },
    MatchType { name: "10 Man Tag Team", slug: "10man", template: MatchTypeTemplate::fixed(2, 10) },
    MatchType { name: "Two On One Handicap", slug: "21handicap", template: MatchTypeTemplate::fixed(2, 3) },
    MatchType { name: "Three On Two Handicap", slug: "32handicap", template: MatchTypeTemplate::fixed(2, 5) },
    MatchType { name: "Battle Royal", slug: "battleroyal", template: MatchTypeTemplate::open() },
    MatchType { name: "Royal Rumble", slug: "royalrumble", template: MatchTypeTemplate::open() },
    MatchType { name: "Tornado Tag Team", slug: "tornadotag", template: MatchTypeTemplate::fixed(2, 4) },
    MatchType { name: "Gauntlet", slug: "gauntlet", template: MatchTypeTemplate::open() },
];

/// Look up a catalog entry by slug.
pub fn find_match_type(slug: &str) -> Option<&'static MatchType> {
    CATALOG.iter().find(|t| t.slug == slug)
}

// ─── Proposed Matches ────────────────────────────────────────────────

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchSide {
    #[serde(default)]
    pub wrestlers: Vec<RosterId>,
    #[serde(default)]
    pub tag_teams: Vec<RosterId>,
}

impl MatchSide {
    /// Competitors on this side, counting each tag team as two.
    pub fn competitor_count(&self) -> usize {
        self.wrestlers.len() + self.tag_teams.len() * 2
    }

    /// Whether nothing has been put on this side yet.
    pub fn is_empty(&self) -> bool {
        self.wrestlers.is_empty() && self.tag_teams.is_empty()
    }
}

/// A match as submitted for booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProposedMatch {
    pub template: MatchTypeTemplate,
    #[serde(default)]
    pub sides: Vec<MatchSide>,
}

/// The proposed match does not fit its template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("match requires {expected} sides, {actual} provided")]
    SideCount { expected: usize, actual: usize },

    #[error("match requires {expected} competitors, {actual} provided")]
    CompetitorCount { expected: usize, actual: usize },
}

impl MatchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SideCount { .. } => "side_count",
            Self::CompetitorCount { .. } => "competitor_count",
        }
    }
}

/// Total competitors across every side.
pub fn competitor_count(sides: &[MatchSide]) -> usize {
    sides.iter().map(MatchSide::competitor_count).sum()
}

/// Check side and competitor counts against the template.
pub fn validate(proposed: &ProposedMatch) -> Result<(), MatchError> {
    let sides = &proposed.sides;
    if sides.is_empty() {
        return Ok(());
    }
    if let Some(expected) = proposed.template.number_of_sides {
        if sides.len() != expected {
            return Err(MatchError::SideCount {
                expected,
                actual: sides.len(),
            });
        }
    }
    if sides.iter().any(MatchSide::is_empty) {
        return Ok(());
    }
    if let Some(expected) = proposed.template.number_of_competitors {
        let actual = competitor_count(sides);
        if actual != expected {
            return Err(MatchError::CompetitorCount { expected, actual });
        }
    }
    Ok(())
}

// ─── Booking ─────────────────────────────────────────────────────────

/// A listed competitor cannot be booked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("competitor {0} not found")]
    UnknownCompetitor(RosterId),

    #[error("{id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: RosterId,
        expected: RosterKind,
        actual: RosterKind,
    },

    #[error("{id} is {status} and cannot be booked")]
    NotBookable { id: RosterId, status: RosterStatus },

    /// The same wrestler appears twice, directly or through a tag team.
    #[error("{0} appears more than once in the match")]
    DuplicateCompetitor(RosterId),
}

impl BookingError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCompetitor(_) => "unknown_competitor",
            Self::WrongKind { .. } => "wrong_kind",
            Self::NotBookable { .. } => "not_bookable",
            Self::DuplicateCompetitor(_) => "duplicate_competitor",
        }
    }
}

/// Check every competitor against the roster as of `as_of`.
pub fn check_booking(
    roster: &Roster,
    proposed: &ProposedMatch,
    as_of: Timestamp,
) -> Result<(), BookingError> {
    let mut seen = HashSet::new();
    for side in &proposed.sides {
        let listed = side
            .wrestlers
            .iter()
            .map(|id| (*id, RosterKind::Wrestler))
            .chain(side.tag_teams.iter().map(|id| (*id, RosterKind::TagTeam)));
        for (id, expected) in listed {
            let entry = roster.live(id).ok_or(BookingError::UnknownCompetitor(id))?;
            if entry.kind != expected {
                return Err(BookingError::WrongKind {
                    id,
                    expected,
                    actual: entry.kind,
                });
            }
            let status = roster
                .evaluate(id, as_of)
                .ok_or(BookingError::UnknownCompetitor(id))?;
            if !status.is_bookable() {
                return Err(BookingError::NotBookable { id, status });
            }
            let mut competitors = vec![id];
            if expected == RosterKind::TagTeam {
                competitors.extend(roster.live_members(id));
            }
            for competitor in competitors {
                if !seen.insert(competitor) {
                    return Err(BookingError::DuplicateCompetitor(competitor));
                }
            }
        }
    }
    Ok(())
}
