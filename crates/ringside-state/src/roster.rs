//! # Roster Model
//!
//! The in-memory roster: every entry, its membership history, and the
//! interval ledger backing every status. A [`Roster`] value is the unit a
//! [`RosterStore`](crate::store::RosterStore) transaction works on; it is
//! cheap enough to clone that a transaction can mutate a private copy and
//! swap it in on success.

use std::collections::HashMap;

use ringside_core::{RosterId, RosterKind, RosterName, Timestamp};
use serde::{Deserialize, Serialize};

use crate::guard::LifecycleProfile;
use crate::interval::IntervalLedger;
use crate::status::{derive, derive_composite, LifecycleFacts, RosterStatus};

/// One participant's time in a composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// The member.
    pub participant: RosterId,
    /// When the member joined.
    pub joined_at: Timestamp,
    /// When the member left; `None` while current.
    pub left_at: Option<Timestamp>,
}

impl Membership {
    /// Whether the member has not left.
    pub fn is_current(&self) -> bool {
        self.left_at.is_none()
    }
}

/// A wrestler, manager, referee, tag team, stable or title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: RosterId,
    pub kind: RosterKind,
    pub name: RosterName,
    /// Cached projection of the interval ledger. Recomputed after every
    /// mutation; never consulted by guards.
    pub status: RosterStatus,
    /// Membership history. Empty for everything except composites.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Membership>,
    pub created_at: Timestamp,
    /// Soft-deletion marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

impl RosterEntry {
    /// A fresh, never-engaged entry.
    pub fn new(kind: RosterKind, name: RosterName, created_at: Timestamp) -> Self {
        Self {
            id: RosterId::new(),
            kind,
            name,
            status: RosterStatus::Unemployed,
            members: Vec::new(),
            created_at,
            deleted_at: None,
        }
    }

    /// Whether the entry has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Ids of the members who have not left.
    pub fn current_members(&self) -> Vec<RosterId> {
        self.members
            .iter()
            .filter(|m| m.is_current())
            .map(|m| m.participant)
            .collect()
    }

    /// Whether `participant` is a current member.
    pub fn has_current_member(&self, participant: RosterId) -> bool {
        self.members
            .iter()
            .any(|m| m.participant == participant && m.is_current())
    }
}

/// Every roster entry plus the interval ledger.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: HashMap<RosterId, RosterEntry>,
    ledger: IntervalLedger,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Replaces any entry with the same id.
    pub fn insert(&mut self, entry: RosterEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Look up an entry, including soft-deleted ones.
    pub fn get(&self, id: RosterId) -> Option<&RosterEntry> {
        self.entries.get(&id)
    }

    /// Look up an entry that has not been soft-deleted.
    pub fn live(&self, id: RosterId) -> Option<&RosterEntry> {
        self.entries.get(&id).filter(|e| !e.is_deleted())
    }

    pub(crate) fn get_mut(&mut self, id: RosterId) -> Option<&mut RosterEntry> {
        self.entries.get_mut(&id)
    }

    /// Every entry, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.values()
    }

    /// Live entries of `kind`, ordered by name.
    pub fn list(&self, kind: Option<RosterKind>) -> Vec<&RosterEntry> {
        let mut rows: Vec<&RosterEntry> = self
            .entries
            .values()
            .filter(|e| !e.is_deleted())
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .collect();
        rows.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()).then(a.id.cmp(&b.id)));
        rows
    }

    /// The interval ledger.
    pub fn ledger(&self) -> &IntervalLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut IntervalLedger {
        &mut self.ledger
    }

    /// Live composites of `kind` that `participant` currently belongs to.
    pub fn composites_of(&self, participant: RosterId, kind: Option<RosterKind>) -> Vec<RosterId> {
        let mut ids: Vec<RosterId> = self
            .entries
            .values()
            .filter(|e| e.kind.is_composite() && !e.is_deleted())
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .filter(|e| e.has_current_member(participant))
            .map(|e| e.id)
            .collect();
        ids.sort();
        ids
    }

    /// Current members of `composite` that have not been soft-deleted.
    pub fn live_members(&self, composite: RosterId) -> Vec<RosterId> {
        self.get(composite)
            .map(|e| e.current_members())
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.live(*id).is_some())
            .collect()
    }

    /// Profile and interval facts for `id` as of `as_of`.
    ///
    /// For composites, `suspended` also reflects suspended members.
    pub fn facts(&self, id: RosterId, as_of: Timestamp) -> Option<(LifecycleProfile, LifecycleFacts)> {
        let entry = self.get(id)?;
        let profile = LifecycleProfile::of(entry.kind);
        let mut facts = LifecycleFacts::gather(&self.ledger, id, profile.engagement, as_of);
        // A composite is suspended while any current member is.
        if entry.kind.is_composite() && !facts.suspended {
            facts.suspended = self
                .live_members(id)
                .into_iter()
                .any(|member| self.evaluate(member, as_of) == Some(RosterStatus::Suspended));
        }
        Some((profile, facts))
    }

    /// Status of `id` derived from the ledger as of `as_of`, ignoring the
    /// cached value.
    pub fn evaluate(&self, id: RosterId, as_of: Timestamp) -> Option<RosterStatus> {
        let (profile, facts) = self.facts(id, as_of)?;
        let status = match profile.composite {
            None => derive(&facts),
            Some(rule) => {
                let members: Vec<RosterStatus> = self
                    .live_members(id)
                    .into_iter()
                    .filter_map(|member| self.evaluate(member, as_of))
                    .collect();
                derive_composite(&facts, &members, rule)
            }
        };
        Some(status)
    }

    /// Rebuild a roster from persisted rows.
    pub fn from_parts(entries: Vec<RosterEntry>, ledger: IntervalLedger) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.id, e)).collect(),
            ledger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> Timestamp {
        Timestamp::parse("2026-01-01T00:00:00Z").unwrap()
    }

    fn entry(kind: RosterKind, name: &str) -> RosterEntry {
        RosterEntry::new(kind, RosterName::new(name).unwrap(), at())
    }

    #[test]
    fn new_entry_is_unemployed() {
        let e = entry(RosterKind::Wrestler, "Bret Hart");
        assert_eq!(e.status, RosterStatus::Unemployed);
        assert!(!e.is_deleted());
    }

    #[test]
    fn list_filters_kind_and_deleted() {
        let mut roster = Roster::new();
        let a = entry(RosterKind::Wrestler, "Owen Hart");
        let mut b = entry(RosterKind::Wrestler, "Bret Hart");
        let c = entry(RosterKind::Referee, "Earl Hebner");
        b.deleted_at = Some(at());
        roster.insert(a.clone());
        roster.insert(b);
        roster.insert(c);
        let wrestlers = roster.list(Some(RosterKind::Wrestler));
        assert_eq!(wrestlers.len(), 1);
        assert_eq!(wrestlers[0].id, a.id);
        assert_eq!(roster.list(None).len(), 2);
    }

    #[test]
    fn composites_of_ignores_former_members() {
        let mut roster = Roster::new();
        let wrestler = entry(RosterKind::Wrestler, "Arn Anderson");
        let mut team = entry(RosterKind::TagTeam, "Minnesota Wrecking Crew");
        let mut old_team = entry(RosterKind::TagTeam, "Brain Busters");
        team.members.push(Membership {
            participant: wrestler.id,
            joined_at: at(),
            left_at: None,
        });
        old_team.members.push(Membership {
            participant: wrestler.id,
            joined_at: at(),
            left_at: Some(at().add_days(1)),
        });
        let (wid, tid) = (wrestler.id, team.id);
        roster.insert(wrestler);
        roster.insert(team);
        roster.insert(old_team);
        assert_eq!(roster.composites_of(wid, None), vec![tid]);
        assert!(roster.composites_of(wid, Some(RosterKind::Stable)).is_empty());
    }

    #[test]
    fn entry_serializes_without_empty_members() {
        let json = serde_json::to_value(entry(RosterKind::Manager, "Paul Heyman")).unwrap();
        assert_eq!(json["kind"], "manager");
        assert_eq!(json["status"], "unemployed");
        assert!(json.get("members").is_none());
        assert!(json.get("deleted_at").is_none());
    }
}
