//! # Database Persistence Layer
//!
//! Optional Postgres persistence via SQLx. With `DATABASE_URL` set, every
//! successful roster write is persisted after the in-memory commit and the
//! roster is hydrated from the database on startup. Without it the API runs
//! in memory only.

pub mod roster;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Connect and run migrations. `None` when `DATABASE_URL` is unset.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        tracing::warn!("DATABASE_URL not set, running in-memory only. The roster will not survive restarts.");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;
    tracing::info!("connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(Some(pool))
}
