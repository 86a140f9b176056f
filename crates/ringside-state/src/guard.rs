//! # Lifecycle Guards
//!
//! Preconditions for each lifecycle transition, and the per-kind profile
//! declaring which transitions a roster kind supports at all.
//!
//! ## Transitions
//!
//! ```text
//! Unemployed ──employ──▶ Available ──suspend──▶ Suspended ──reinstate──▶ Available
//!     ▲                    │    │
//!     │                    │    └──injure──▶ Injured ──clear_injury──▶ Available
//!  (future employ          │
//!   = PendingEmployment)   ├──release──▶ Released ──employ──▶ Available
//!                          │
//!                          └──retire──▶ Retired ──unretire──▶ Available
//! ```
//!
//! Guards read [`LifecycleFacts`] only. They never look at the cached
//! status, so a stale cache cannot admit an illegal transition.

use ringside_core::RosterKind;
use serde::{Deserialize, Serialize};

use crate::interval::IntervalKind;
use crate::status::{CompositeRule, LifecycleFacts};

// ─── Transition ──────────────────────────────────────────────────────

/// A lifecycle transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Employ,
    Release,
    Suspend,
    Reinstate,
    Injure,
    ClearInjury,
    Retire,
    Unretire,
}

impl Transition {
    /// All transitions, in declaration order.
    pub const ALL: [Transition; 8] = [
        Self::Employ,
        Self::Release,
        Self::Suspend,
        Self::Reinstate,
        Self::Injure,
        Self::ClearInjury,
        Self::Retire,
        Self::Unretire,
    ];

    /// Return the snake_case name of this transition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employ => "employ",
            Self::Release => "release",
            Self::Suspend => "suspend",
            Self::Reinstate => "reinstate",
            Self::Injure => "injure",
            Self::ClearInjury => "clear_injury",
            Self::Retire => "retire",
            Self::Unretire => "unretire",
        }
    }

    /// Resolve a URL action segment (`clear-injury`, `activate`, ...).
    ///
    /// `activate` and `deactivate` are the stable and title spellings of
    /// `employ` and `release`.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "activate" => Some(Self::Employ),
            "deactivate" => Some(Self::Release),
            other => {
                let normalized = other.replace('-', "_");
                Self::ALL.into_iter().find(|t| t.as_str() == normalized)
            }
        }
    }

    /// Whether `facts` satisfy this transition's precondition.
    pub fn permitted_by(&self, facts: &LifecycleFacts) -> bool {
        match self {
            Self::Employ => facts.can_employ(),
            Self::Release => facts.can_release(),
            Self::Suspend => facts.can_suspend(),
            Self::Reinstate => facts.can_reinstate(),
            Self::Injure => facts.can_injure(),
            Self::ClearInjury => facts.can_clear_injury(),
            Self::Retire => facts.can_retire(),
            Self::Unretire => facts.can_unretire(),
        }
    }

    /// Whether a composite applies this transition to its members too.
    pub fn cascades_to_members(&self) -> bool {
        matches!(
            self,
            Self::Employ | Self::Suspend | Self::Reinstate | Self::Retire | Self::Unretire
        )
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Guards ──────────────────────────────────────────────────────────

impl LifecycleFacts {
    /// Not currently employed and not retired. A pending engagement may be
    /// re-dated, so it does not block.
    pub fn can_employ(&self) -> bool {
        !self.engaged && !self.retired
    }

    pub fn can_release(&self) -> bool {
        self.in_employment()
    }

    pub fn can_suspend(&self) -> bool {
        self.in_employment() && !self.suspended && !self.injured
    }

    pub fn can_reinstate(&self) -> bool {
        self.suspended
    }

    pub fn can_injure(&self) -> bool {
        self.in_employment() && !self.injured && !self.suspended
    }

    pub fn can_clear_injury(&self) -> bool {
        self.injured
    }

    pub fn can_retire(&self) -> bool {
        self.in_employment()
    }

    pub fn can_unretire(&self) -> bool {
        self.retired
    }
}

// ─── Kind Profiles ───────────────────────────────────────────────────

/// What a roster kind can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleProfile {
    /// The kind described.
    pub kind: RosterKind,
    /// Interval kind that makes an entry of this kind active.
    pub engagement: IntervalKind,
    /// Transitions this kind accepts.
    pub transitions: &'static [Transition],
    /// Member rules, for composites.
    pub composite: Option<CompositeRule>,
}

const ALL_TRANSITIONS: &[Transition] = &Transition::ALL;

const TAG_TEAM_TRANSITIONS: &[Transition] = &[
    Transition::Employ,
    Transition::Release,
    Transition::Suspend,
    Transition::Reinstate,
    Transition::Retire,
    Transition::Unretire,
];

const ACTIVATION_TRANSITIONS: &[Transition] = &[
    Transition::Employ,
    Transition::Release,
    Transition::Retire,
    Transition::Unretire,
];

/// Minimum current members for a tag team to be bookable.
pub const TAG_TEAM_SIZE: usize = 2;

/// Minimum current members for a stable to be bookable.
pub const STABLE_MINIMUM: usize = 3;

impl LifecycleProfile {
    /// The profile for `kind`.
    pub fn of(kind: RosterKind) -> Self {
        match kind {
            RosterKind::Wrestler | RosterKind::Manager | RosterKind::Referee => Self {
                kind,
                engagement: IntervalKind::Employment,
                transitions: ALL_TRANSITIONS,
                composite: None,
            },
            RosterKind::TagTeam => Self {
                kind,
                engagement: IntervalKind::Employment,
                transitions: TAG_TEAM_TRANSITIONS,
                composite: Some(CompositeRule {
                    minimum_members: TAG_TEAM_SIZE,
                    members_must_be_available: true,
                }),
            },
            RosterKind::Stable => Self {
                kind,
                engagement: IntervalKind::Activation,
                transitions: ACTIVATION_TRANSITIONS,
                composite: Some(CompositeRule {
                    minimum_members: STABLE_MINIMUM,
                    members_must_be_available: false,
                }),
            },
            RosterKind::Title => Self {
                kind,
                engagement: IntervalKind::Activation,
                transitions: ACTIVATION_TRANSITIONS,
                composite: None,
            },
        }
    }

    /// Whether this kind accepts `transition`.
    pub fn supports(&self, transition: Transition) -> bool {
        self.transitions.contains(&transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(engaged: bool, suspended: bool, injured: bool, retired: bool) -> LifecycleFacts {
        LifecycleFacts {
            engaged,
            suspended,
            injured,
            retired,
            ..LifecycleFacts::default()
        }
    }

    #[test]
    fn test_unemployed_can_only_be_employed() {
        let f = LifecycleFacts::default();
        let allowed: Vec<Transition> = Transition::ALL
            .into_iter()
            .filter(|t| t.permitted_by(&f))
            .collect();
        assert_eq!(allowed, vec![Transition::Employ]);
    }

    #[test]
    fn test_pending_can_be_employed_again() {
        let f = LifecycleFacts {
            pending: true,
            ..LifecycleFacts::default()
        };
        assert!(f.can_employ());
        assert!(!f.can_release());
        assert!(!f.can_retire());
    }

    #[test]
    fn test_employed_cannot_be_employed() {
        assert!(!facts(true, false, false, false).can_employ());
    }

    #[test]
    fn test_suspended_cannot_be_injured_or_suspended() {
        let f = facts(true, true, false, false);
        assert!(!f.can_suspend());
        assert!(!f.can_injure());
        assert!(f.can_reinstate());
        assert!(f.can_release());
        assert!(f.can_retire());
    }

    #[test]
    fn test_injured_cannot_be_suspended() {
        let f = facts(true, false, true, false);
        assert!(!f.can_suspend());
        assert!(f.can_clear_injury());
    }

    #[test]
    fn test_retired_can_only_be_unretired() {
        let f = facts(false, false, false, true);
        let allowed: Vec<Transition> = Transition::ALL
            .into_iter()
            .filter(|t| t.permitted_by(&f))
            .collect();
        assert_eq!(allowed, vec![Transition::Unretire]);
    }

    #[test]
    fn test_from_action_accepts_aliases() {
        assert_eq!(Transition::from_action("clear-injury"), Some(Transition::ClearInjury));
        assert_eq!(Transition::from_action("activate"), Some(Transition::Employ));
        assert_eq!(Transition::from_action("deactivate"), Some(Transition::Release));
        assert_eq!(Transition::from_action("promote"), None);
    }

    #[test]
    fn test_profiles() {
        let wrestler = LifecycleProfile::of(RosterKind::Wrestler);
        assert!(Transition::ALL.iter().all(|t| wrestler.supports(*t)));

        let tag_team = LifecycleProfile::of(RosterKind::TagTeam);
        assert!(!tag_team.supports(Transition::Injure));
        assert!(tag_team.supports(Transition::Suspend));

        let title = LifecycleProfile::of(RosterKind::Title);
        assert_eq!(title.engagement, IntervalKind::Activation);
        assert!(!title.supports(Transition::Suspend));
        assert!(title.composite.is_none());

        let stable = LifecycleProfile::of(RosterKind::Stable);
        assert_eq!(stable.composite.map(|r| r.minimum_members), Some(3));
    }

    #[test]
    fn test_release_does_not_cascade() {
        assert!(!Transition::Release.cascades_to_members());
        assert!(Transition::Retire.cascades_to_members());
    }
}
