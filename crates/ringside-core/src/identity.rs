//! # Identity Newtypes
//!
//! UUID-backed identifiers. Each is a distinct type: an [`IntervalId`]
//! cannot be passed where a [`RosterId`] is expected.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a roster entry: a wrestler, manager, referee, tag team,
/// stable or title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterId(Uuid);

impl RosterId {
    /// Create a new random roster identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a roster identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RosterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RosterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RosterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier of a single lifecycle interval row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalId(Uuid);

impl IntervalId {
    /// Create a new random interval identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an interval identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IntervalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IntervalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
