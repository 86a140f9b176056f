//! Roster persistence.
//!
//! Every write persists the [`EntrySnapshot`]s an operation touched in one
//! database transaction, so a cascade reaches the database whole or not at
//! all. Entries go first, then memberships, then intervals. Intervals that
//! close are written before intervals that open so the one-open-per-kind
//! index never sees two open rows for the same owner.

use chrono::{DateTime, Utc};
use ringside_core::{IntervalId, RosterId, RosterKind, RosterName, Timestamp};
use ringside_state::{
    EntrySnapshot, Interval, IntervalKind, IntervalLedger, Membership, Roster, RosterEntry,
    RosterStatus,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Upsert every snapshot with its memberships and intervals in a single
/// transaction.
pub async fn save_snapshots(pool: &PgPool, snapshots: &[EntrySnapshot]) -> Result<(), sqlx::Error> {
    if snapshots.is_empty() {
        return Ok(());
    }
    let mut tx = pool.begin().await?;
    for snapshot in snapshots {
        upsert_entry(&mut tx, &snapshot.entry).await?;
    }
    for snapshot in snapshots {
        upsert_memberships(&mut tx, &snapshot.entry).await?;
    }
    for interval in interval_write_order(snapshots) {
        upsert_interval(&mut tx, interval).await?;
    }
    tx.commit().await
}

/// Intervals of every snapshot, closed ones first.
fn interval_write_order(snapshots: &[EntrySnapshot]) -> Vec<&Interval> {
    let mut intervals: Vec<&Interval> = snapshots.iter().flat_map(|s| s.intervals.iter()).collect();
    intervals.sort_by_key(|i| i.is_open());
    intervals
}

async fn upsert_entry(tx: &mut Transaction<'_, Postgres>, entry: &RosterEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO roster_entries (id, kind, name, status, created_at, deleted_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE
         SET name = EXCLUDED.name, status = EXCLUDED.status, deleted_at = EXCLUDED.deleted_at",
    )
    .bind(*entry.id.as_uuid())
    .bind(entry.kind.as_str())
    .bind(entry.name.as_str())
    .bind(entry.status.as_str())
    .bind(*entry.created_at.as_datetime())
    .bind(entry.deleted_at.map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_memberships(
    tx: &mut Transaction<'_, Postgres>,
    entry: &RosterEntry,
) -> Result<(), sqlx::Error> {
    for membership in &entry.members {
        sqlx::query(
            "INSERT INTO memberships (composite_id, participant_id, joined_at, left_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (composite_id, participant_id, joined_at) DO UPDATE
             SET left_at = EXCLUDED.left_at",
        )
        .bind(*entry.id.as_uuid())
        .bind(*membership.participant.as_uuid())
        .bind(*membership.joined_at.as_datetime())
        .bind(membership.left_at.map(|t| *t.as_datetime()))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn upsert_interval(tx: &mut Transaction<'_, Postgres>, interval: &Interval) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO intervals (id, owner_id, owner_kind, kind, started_at, ended_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE
         SET started_at = EXCLUDED.started_at, ended_at = EXCLUDED.ended_at",
    )
    .bind(*interval.id.as_uuid())
    .bind(*interval.owner.as_uuid())
    .bind(interval.owner_kind.as_str())
    .bind(interval.kind.as_str())
    .bind(*interval.started_at.as_datetime())
    .bind(interval.ended_at.map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Load the whole roster on startup.
pub async fn load_all(pool: &PgPool) -> Result<Roster, sqlx::Error> {
    let entry_rows = sqlx::query_as::<_, EntryRow>(
        "SELECT id, kind, name, status, created_at, deleted_at FROM roster_entries ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let membership_rows = sqlx::query_as::<_, MembershipRow>(
        "SELECT composite_id, participant_id, joined_at, left_at FROM memberships ORDER BY joined_at",
    )
    .fetch_all(pool)
    .await?;

    let interval_rows = sqlx::query_as::<_, IntervalRow>(
        "SELECT id, owner_id, owner_kind, kind, started_at, ended_at FROM intervals ORDER BY started_at",
    )
    .fetch_all(pool)
    .await?;

    let mut entries = entry_rows
        .into_iter()
        .map(EntryRow::into_entry)
        .collect::<Result<Vec<_>, _>>()?;
    for row in membership_rows {
        let composite = RosterId::from_uuid(row.composite_id);
        if let Some(entry) = entries.iter_mut().find(|e| e.id == composite) {
            entry.members.push(row.into_membership());
        }
    }

    let mut ledger = IntervalLedger::new();
    for row in interval_rows {
        ledger
            .restore(row.into_interval()?)
            .map_err(|e| sqlx::Error::Protocol(format!("inconsistent interval ledger: {e}")))?;
    }

    Ok(Roster::from_parts(entries, ledger))
}

// ── Rows ─────────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    kind: String,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl EntryRow {
    fn into_entry(self) -> Result<RosterEntry, sqlx::Error> {
        let kind: RosterKind = self
            .kind
            .parse()
            .map_err(|e| sqlx::Error::Protocol(format!("roster entry {}: {e}", self.id)))?;
        let name = RosterName::new(self.name)
            .map_err(|e| sqlx::Error::Protocol(format!("roster entry {}: {e}", self.id)))?;
        // The cached status is re-derived after hydration anyway.
        let status = RosterStatus::parse(&self.status).unwrap_or_else(|| {
            tracing::warn!(id = %self.id, status = %self.status, "unknown cached status in database");
            RosterStatus::Unemployed
        });
        let mut entry = RosterEntry::new(kind, name, Timestamp::from_utc(self.created_at));
        entry.id = RosterId::from_uuid(self.id);
        entry.status = status;
        entry.deleted_at = self.deleted_at.map(Timestamp::from_utc);
        Ok(entry)
    }
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    composite_id: Uuid,
    participant_id: Uuid,
    joined_at: DateTime<Utc>,
    left_at: Option<DateTime<Utc>>,
}

impl MembershipRow {
    fn into_membership(self) -> Membership {
        Membership {
            participant: RosterId::from_uuid(self.participant_id),
            joined_at: Timestamp::from_utc(self.joined_at),
            left_at: self.left_at.map(Timestamp::from_utc),
        }
    }
}

#[derive(sqlx::FromRow)]
struct IntervalRow {
    id: Uuid,
    owner_id: Uuid,
    owner_kind: String,
    kind: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl IntervalRow {
    fn into_interval(self) -> Result<Interval, sqlx::Error> {
        let owner_kind: RosterKind = self
            .owner_kind
            .parse()
            .map_err(|e| sqlx::Error::Protocol(format!("interval {}: {e}", self.id)))?;
        let kind = IntervalKind::parse(&self.kind)
            .ok_or_else(|| sqlx::Error::Protocol(format!("interval {}: unknown kind {:?}", self.id, self.kind)))?;
        Ok(Interval {
            id: IntervalId::from_uuid(self.id),
            owner: RosterId::from_uuid(self.owner_id),
            owner_kind,
            kind,
            started_at: Timestamp::from_utc(self.started_at),
            ended_at: self.ended_at.map(Timestamp::from_utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        *Timestamp::parse("2026-03-01T12:00:00Z").unwrap().as_datetime()
    }

    #[test]
    fn entry_row_maps_to_entry() {
        let id = Uuid::new_v4();
        let entry = EntryRow {
            id,
            kind: "tag_team".into(),
            name: "The Hart Foundation".into(),
            status: "available".into(),
            created_at: at(),
            deleted_at: None,
        }
        .into_entry()
        .unwrap();
        assert_eq!(entry.id, RosterId::from_uuid(id));
        assert_eq!(entry.kind, RosterKind::TagTeam);
        assert_eq!(entry.status, RosterStatus::Available);
        assert!(entry.members.is_empty());
    }

    #[test]
    fn entry_row_with_unknown_kind_is_rejected() {
        let row = EntryRow {
            id: Uuid::new_v4(),
            kind: "valet".into(),
            name: "Miss Elizabeth".into(),
            status: "available".into(),
            created_at: at(),
            deleted_at: None,
        };
        assert!(matches!(row.into_entry(), Err(sqlx::Error::Protocol(_))));
    }

    #[test]
    fn interval_row_maps_to_interval() {
        let interval = IntervalRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            owner_kind: "wrestler".into(),
            kind: "suspension".into(),
            started_at: at(),
            ended_at: None,
        }
        .into_interval()
        .unwrap();
        assert_eq!(interval.kind, IntervalKind::Suspension);
        assert!(interval.is_open());
    }

    fn snapshot(kind: RosterKind, name: &str, intervals: Vec<Interval>) -> EntrySnapshot {
        let entry = RosterEntry::new(kind, RosterName::new(name).unwrap(), Timestamp::from_utc(at()));
        EntrySnapshot { entry, intervals }
    }

    fn interval(owner: RosterId, kind: IntervalKind, ended: bool) -> Interval {
        Interval {
            id: IntervalId::new(),
            owner,
            owner_kind: RosterKind::Wrestler,
            kind,
            started_at: Timestamp::from_utc(at()),
            ended_at: ended.then(|| Timestamp::from_utc(at())),
        }
    }

    #[test]
    fn cascade_snapshots_write_every_closed_interval_before_any_open_one() {
        // A tag team retirement cascading to both members.
        let mut team = snapshot(RosterKind::TagTeam, "The Brain Busters", vec![]);
        let (a, b) = (RosterId::new(), RosterId::new());
        team.intervals = vec![
            interval(team.entry.id, IntervalKind::Retirement, false),
            interval(team.entry.id, IntervalKind::Employment, true),
        ];
        let first = snapshot(
            RosterKind::Wrestler,
            "Arn Anderson",
            vec![interval(a, IntervalKind::Retirement, false), interval(a, IntervalKind::Employment, true)],
        );
        let second = snapshot(
            RosterKind::Wrestler,
            "Tully Blanchard",
            vec![interval(b, IntervalKind::Employment, true), interval(b, IntervalKind::Retirement, false)],
        );
        let snapshots = [team, first, second];

        let order = interval_write_order(&snapshots);
        assert_eq!(order.len(), 6);
        let first_open = order.iter().position(|i| i.is_open()).unwrap();
        assert_eq!(first_open, 3);
        assert!(order[first_open..].iter().all(|i| i.is_open()));
    }

    #[test]
    fn nothing_to_write_for_no_snapshots() {
        assert!(interval_write_order(&[]).is_empty());
    }
}
