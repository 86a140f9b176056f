//! # Application State
//!
//! Shared state for every handler: the lifecycle engine over an in-memory
//! roster, the optional Postgres pool it writes through to, and server
//! configuration.
//!
//! Reads are served from memory. Writes commit in memory first; the
//! touched entries are then persisted with [`AppState::persist`].

use std::sync::Arc;

use ringside_core::{Clock, RosterId, SystemClock};
use ringside_state::{LifecycleEngine, MemoryRosterStore, RosterStore};
use sqlx::PgPool;

use crate::error::AppError;

/// The engine every handler runs against.
pub type Engine = LifecycleEngine<MemoryRosterStore>;

/// Server configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer secret. `None` disables authentication.
    pub auth_token: Option<String>,
}

impl AppConfig {
    /// Read `PORT` and `AUTH_TOKEN`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "invalid PORT, using default");
                defaults.port
            }),
            Err(_) => defaults.port,
        };
        Self {
            port,
            auth_token: std::env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// Shared application state. Clones share the same roster.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Engine,
    pub db_pool: Option<PgPool>,
    pub config: AppConfig,
}

impl AppState {
    /// In-memory state on the system clock with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock), None)
    }

    /// Full constructor; tests inject a fixed clock here.
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>, db_pool: Option<PgPool>) -> Self {
        Self {
            engine: LifecycleEngine::new(MemoryRosterStore::new(), clock),
            db_pool,
            config,
        }
    }

    /// Load the roster from the database and bring cached statuses up to date.
    ///
    /// Called once on startup when a pool is available.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };

        let roster = crate::db::roster::load_all(pool)
            .await
            .map_err(|e| format!("failed to load roster: {e}"))?;
        let entries = roster.entries().count();
        let intervals = roster.ledger().iter().count();
        self.engine.store().replace(roster);

        // Pending employments may have started while the server was down.
        let stale = self.engine.refresh_all();
        self.persist(&stale)
            .await
            .map_err(|e| format!("failed to persist refreshed statuses: {e}"))?;

        tracing::info!(
            entries,
            intervals,
            refreshed = stale.len(),
            "hydrated roster from database"
        );
        Ok(())
    }

    /// Write the current state of `ids` through to the database.
    ///
    /// No-op without a pool. The in-memory commit has already happened, so a
    /// failure here is logged and surfaced as a 500.
    pub async fn persist(&self, ids: &[RosterId]) -> Result<(), AppError> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };
        let snapshots = self.engine.snapshots(ids);
        if let Err(e) = crate::db::roster::save_snapshots(pool, &snapshots).await {
            let ids: Vec<String> = snapshots.iter().map(|s| s.entry.id.to_string()).collect();
            tracing::error!(entries = ?ids, error = %e, "failed to persist roster entries");
            return Err(AppError::Internal(format!(
                "{} roster entries updated in memory but database write failed",
                snapshots.len()
            )));
        }
        Ok(())
    }

    /// Ids of `composite` and its current members, for persisting a
    /// formation or membership change.
    pub fn with_members(&self, composite: RosterId) -> Vec<RosterId> {
        let mut ids = vec![composite];
        ids.extend(self.engine.store().read(|roster| roster.live_members(composite)));
        ids
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
