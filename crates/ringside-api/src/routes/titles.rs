//! # Titles API
//!
//! Championships are introduced (activated), retired, and unretired through
//! the generic roster transitions. This module adds the title-shaped
//! shortcuts: listing, and introducing a title in one request.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ringside_core::{RosterKind, RosterName};
use serde::Deserialize;
use utoipa::ToSchema;

use super::roster::{live_entry, RosterEntryResponse};
use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{check_at, extract_validated_json, parse_at, Validate};
use crate::state::AppState;

/// Create a title, optionally introducing it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTitleRequest {
    pub name: String,
    /// Activate the title from this instant. A future date leaves it
    /// pending introduction.
    pub introduced_at: Option<String>,
}

impl Validate for CreateTitleRequest {
    fn validate(&self) -> Result<(), String> {
        RosterName::new(self.name.as_str()).map_err(|e| format!("name: {e}"))?;
        check_at("introduced_at", self.introduced_at.as_deref())
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/titles", get(list_titles).post(create_title))
}

/// GET /v1/titles
#[utoipa::path(
    get,
    path = "/v1/titles",
    responses((status = 200, description = "Titles", body = Vec<RosterEntryResponse>)),
    tag = "titles"
)]
async fn list_titles(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<RosterEntryResponse>>, AppError> {
    require_role(&caller, Role::Basic)?;
    let titles = state.engine.list(Some(RosterKind::Title), None);
    Ok(Json(titles.iter().map(RosterEntryResponse::from).collect()))
}

/// POST /v1/titles: create a title and optionally introduce it.
#[utoipa::path(
    post,
    path = "/v1/titles",
    request_body = CreateTitleRequest,
    responses(
        (status = 201, description = "Title created", body = RosterEntryResponse),
        (status = 422, description = "Invalid name or date", body = crate::error::ErrorBody),
    ),
    tag = "titles"
)]
async fn create_title(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateTitleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RosterEntryResponse>), AppError> {
    require_role(&caller, Role::Administrator)?;
    let req = extract_validated_json(body)?;
    let introduced_at = parse_at(req.introduced_at.as_deref())?;

    let title = state
        .engine
        .register(RosterKind::Title, RosterName::new(req.name)?)?;
    let introduced = introduced_at
        .map(|at| state.engine.employ(title.id, Some(at)))
        .transpose();
    state.persist(&[title.id]).await?;
    introduced?;

    let title = live_entry(&state, title.id)?;
    Ok((StatusCode::CREATED, Json(RosterEntryResponse::from(&title))))
}
