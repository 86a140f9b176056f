//! # Roster Kinds and Names
//!
//! [`RosterKind`] is the one enum naming every kind of entry the roster
//! holds. Participants (wrestlers, managers, referees) carry their own
//! employment lifecycle; composites (tag teams, stables) are built from
//! participants; titles are neither.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every kind of roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterKind {
    /// An in-ring competitor.
    Wrestler,
    /// A manager accompanying wrestlers.
    Manager,
    /// A match official.
    Referee,
    /// Two wrestlers booked as one unit.
    TagTeam,
    /// A faction of three or more members.
    Stable,
    /// A championship.
    Title,
}

impl RosterKind {
    /// All kinds, in declaration order.
    pub const ALL: [RosterKind; 6] = [
        Self::Wrestler,
        Self::Manager,
        Self::Referee,
        Self::TagTeam,
        Self::Stable,
        Self::Title,
    ];

    /// Return the snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrestler => "wrestler",
            Self::Manager => "manager",
            Self::Referee => "referee",
            Self::TagTeam => "tag_team",
            Self::Stable => "stable",
            Self::Title => "title",
        }
    }

    /// Whether this kind is an individual with its own employment lifecycle.
    pub fn is_participant(&self) -> bool {
        matches!(self, Self::Wrestler | Self::Manager | Self::Referee)
    }

    /// Whether this kind is built from participant members.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::TagTeam | Self::Stable)
    }
}

impl std::fmt::Display for RosterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RosterKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownKind(s.to_string()))
    }
}

/// Maximum length of a roster display name.
pub const MAX_NAME_LEN: usize = 255;

/// Validated roster display name: trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RosterName(String);

impl RosterName {
    /// Create a validated name.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = s.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong {
                max: MAX_NAME_LEN,
                len,
            });
        }
        Ok(Self(trimmed))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RosterName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RosterName> for String {
    fn from(name: RosterName) -> Self {
        name.0
    }
}

impl std::fmt::Display for RosterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
