//! # Roster Store
//!
//! The unit of work every lifecycle operation runs in. A transaction takes
//! the exclusive lock, hands the closure a private copy of the roster, and
//! commits the copy only if the closure returns `Ok`. Guard, interval
//! writes, status recomputation and cascade therefore land together or not
//! at all, and two concurrent transitions on the same entry serialize: the
//! second one sees the first one's intervals.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::roster::Roster;

/// Transactional access to a [`Roster`].
pub trait RosterStore: Send + Sync {
    /// Run `f` against a consistent snapshot.
    fn read<R>(&self, f: impl FnOnce(&Roster) -> R) -> R;

    /// Run `f` on a private copy of the roster and commit it if `f` succeeds.
    fn transaction<R, E>(&self, f: impl FnOnce(&mut Roster) -> Result<R, E>) -> Result<R, E>;
}

/// Thread-safe, cloneable in-memory roster.
///
/// The lock is `parking_lot` and is never held across `.await` points.
/// Clones share the same roster.
#[derive(Debug, Clone, Default)]
pub struct MemoryRosterStore {
    roster: Arc<RwLock<Roster>>,
}

impl MemoryRosterStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with an existing roster (e.g. hydrated from Postgres).
    pub fn from_roster(roster: Roster) -> Self {
        Self {
            roster: Arc::new(RwLock::new(roster)),
        }
    }

    /// Replace the whole roster.
    pub fn replace(&self, roster: Roster) {
        *self.roster.write() = roster;
    }
}

impl RosterStore for MemoryRosterStore {
    fn read<R>(&self, f: impl FnOnce(&Roster) -> R) -> R {
        f(&self.roster.read())
    }

    fn transaction<R, E>(&self, f: impl FnOnce(&mut Roster) -> Result<R, E>) -> Result<R, E> {
        let mut guard = self.roster.write();
        let mut working = guard.clone();
        let result = f(&mut working)?;
        *guard = working;
        Ok(result)
    }
}
