//! # ringside-api: HTTP Surface for the Roster Lifecycle Engine
//!
//! ## API Surface
//!
//! | Prefix                   | Module                    | Domain                      |
//! |--------------------------|---------------------------|-----------------------------|
//! | `/v1/roster/*`           | [`routes::roster`]        | Entries and transitions     |
//! | `/v1/tag-teams/*`        | [`routes::composites`]    | Tag team formation          |
//! | `/v1/stables/*`          | [`routes::composites`]    | Stable formation            |
//! | `/v1/titles`             | [`routes::titles`]        | Championships               |
//! | `/v1/match-types`        | [`routes::matches`]       | Match type catalog          |
//! | `/v1/matches/validate`   | [`routes::matches`]       | Match validation            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! Health probes (`/health/liveness`, `/health/readiness`) sit outside auth.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the router with every route and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::roster::router())
        .merge(routes::composites::router())
        .merge(routes::titles::router())
        .merge(routes::matches::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}
