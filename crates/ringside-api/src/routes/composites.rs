//! # Tag Team & Stable API
//!
//! Formation and membership changes. Lifecycle transitions on a formed tag
//! team or stable go through the generic roster transition endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use ringside_core::{RosterId, RosterKind, RosterName};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::roster::{live_entry, roster_id, RosterEntryResponse, TransitionRequest};
use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{check_at, extract_validated_json, parse_at, Validate};
use crate::state::AppState;

/// Form a tag team from two employed wrestlers.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FormTagTeamRequest {
    pub name: String,
    pub wrestlers: Vec<Uuid>,
    /// Employ the team from this instant. Omit to leave it unemployed.
    pub started_at: Option<String>,
}

impl Validate for FormTagTeamRequest {
    fn validate(&self) -> Result<(), String> {
        RosterName::new(self.name.as_str()).map_err(|e| format!("name: {e}"))?;
        check_at("started_at", self.started_at.as_deref())
    }
}

/// Form a stable from wrestlers and tag teams.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FormStableRequest {
    pub name: String,
    #[serde(default)]
    pub wrestlers: Vec<Uuid>,
    /// Each tag team contributes its current wrestlers.
    #[serde(default)]
    pub tag_teams: Vec<Uuid>,
    /// Activate the stable from this instant. Omit to leave it unactivated.
    pub started_at: Option<String>,
}

impl Validate for FormStableRequest {
    fn validate(&self) -> Result<(), String> {
        RosterName::new(self.name.as_str()).map_err(|e| format!("name: {e}"))?;
        check_at("started_at", self.started_at.as_deref())
    }
}

/// Add a participant to a tag team or stable.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMemberRequest {
    pub participant: Uuid,
    pub at: Option<String>,
}

impl Validate for AddMemberRequest {
    fn validate(&self) -> Result<(), String> {
        check_at("at", self.at.as_deref())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tag-teams", get(list_tag_teams).post(form_tag_team))
        .route("/v1/tag-teams/:id/members", post(add_tag_team_member))
        .route("/v1/tag-teams/:id/members/:participant", delete(remove_tag_team_member))
        .route("/v1/stables", get(list_stables).post(form_stable))
        .route("/v1/stables/:id/members", post(add_stable_member))
        .route("/v1/stables/:id/members/:participant", delete(remove_stable_member))
}

fn composite_of_kind(state: &AppState, id: Uuid, kind: RosterKind) -> Result<RosterId, AppError> {
    let entry = live_entry(state, roster_id(id))?;
    if entry.kind != kind {
        return Err(AppError::NotFound(format!("{kind} {id}")));
    }
    Ok(entry.id)
}

fn list_of_kind(state: &AppState, kind: RosterKind) -> Vec<RosterEntryResponse> {
    state
        .engine
        .list(Some(kind), None)
        .iter()
        .map(RosterEntryResponse::from)
        .collect()
}

// ── Tag teams ───────────────────────────────────────────────────────────────

/// GET /v1/tag-teams
#[utoipa::path(
    get,
    path = "/v1/tag-teams",
    responses((status = 200, description = "Tag teams", body = Vec<RosterEntryResponse>)),
    tag = "composites"
)]
async fn list_tag_teams(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<RosterEntryResponse>>, AppError> {
    require_role(&caller, Role::Basic)?;
    Ok(Json(list_of_kind(&state, RosterKind::TagTeam)))
}

/// POST /v1/tag-teams: form a tag team.
#[utoipa::path(
    post,
    path = "/v1/tag-teams",
    request_body = FormTagTeamRequest,
    responses(
        (status = 201, description = "Tag team formed", body = RosterEntryResponse),
        (status = 422, description = "Formation rule broken", body = crate::error::ErrorBody),
    ),
    tag = "composites"
)]
async fn form_tag_team(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<FormTagTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RosterEntryResponse>), AppError> {
    require_role(&caller, Role::Administrator)?;
    let req = extract_validated_json(body)?;
    let wrestlers: Vec<RosterId> = req.wrestlers.into_iter().map(roster_id).collect();
    let started_at = parse_at(req.started_at.as_deref())?;

    let entry = state
        .engine
        .form_tag_team(RosterName::new(req.name)?, &wrestlers, started_at)?;
    state.persist(&state.with_members(entry.id)).await?;
    Ok((StatusCode::CREATED, Json(RosterEntryResponse::from(&entry))))
}

/// POST /v1/tag-teams/{id}/members: add a wrestler to a one-member team.
#[utoipa::path(
    post,
    path = "/v1/tag-teams/{id}/members",
    params(("id" = Uuid, Path, description = "Tag team ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "Member added", body = RosterEntryResponse),
        (status = 404, description = "No such tag team", body = crate::error::ErrorBody),
        (status = 422, description = "Membership rule broken", body = crate::error::ErrorBody),
    ),
    tag = "composites"
)]
async fn add_tag_team_member(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<Json<RosterEntryResponse>, AppError> {
    add_member(state, caller, id, RosterKind::TagTeam, body).await
}

/// DELETE /v1/tag-teams/{id}/members/{participant}
#[utoipa::path(
    delete,
    path = "/v1/tag-teams/{id}/members/{participant}",
    params(
        ("id" = Uuid, Path, description = "Tag team ID"),
        ("participant" = Uuid, Path, description = "Member to remove"),
        ("at" = Option<String>, Query, description = "When the member left; defaults to now"),
    ),
    responses(
        (status = 200, description = "Member removed", body = RosterEntryResponse),
        (status = 404, description = "No such tag team", body = crate::error::ErrorBody),
        (status = 422, description = "Not a current member", body = crate::error::ErrorBody),
    ),
    tag = "composites"
)]
async fn remove_tag_team_member(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((id, participant)): Path<(Uuid, Uuid)>,
    Query(query): Query<TransitionRequest>,
) -> Result<Json<RosterEntryResponse>, AppError> {
    remove_member(state, caller, id, participant, RosterKind::TagTeam, query).await
}

// ── Stables ─────────────────────────────────────────────────────────────────

/// GET /v1/stables
#[utoipa::path(
    get,
    path = "/v1/stables",
    responses((status = 200, description = "Stables", body = Vec<RosterEntryResponse>)),
    tag = "composites"
)]
async fn list_stables(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<RosterEntryResponse>>, AppError> {
    require_role(&caller, Role::Basic)?;
    Ok(Json(list_of_kind(&state, RosterKind::Stable)))
}

/// POST /v1/stables: form a stable.
#[utoipa::path(
    post,
    path = "/v1/stables",
    request_body = FormStableRequest,
    responses(
        (status = 201, description = "Stable formed", body = RosterEntryResponse),
        (status = 422, description = "Formation rule broken", body = crate::error::ErrorBody),
    ),
    tag = "composites"
)]
async fn form_stable(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<FormStableRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RosterEntryResponse>), AppError> {
    require_role(&caller, Role::Administrator)?;
    let req = extract_validated_json(body)?;
    let wrestlers: Vec<RosterId> = req.wrestlers.into_iter().map(roster_id).collect();
    let tag_teams: Vec<RosterId> = req.tag_teams.into_iter().map(roster_id).collect();
    let started_at = parse_at(req.started_at.as_deref())?;

    let entry = state
        .engine
        .form_stable(RosterName::new(req.name)?, &wrestlers, &tag_teams, started_at)?;
    state.persist(&state.with_members(entry.id)).await?;
    Ok((StatusCode::CREATED, Json(RosterEntryResponse::from(&entry))))
}

/// POST /v1/stables/{id}/members
#[utoipa::path(
    post,
    path = "/v1/stables/{id}/members",
    params(("id" = Uuid, Path, description = "Stable ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "Member added", body = RosterEntryResponse),
        (status = 404, description = "No such stable", body = crate::error::ErrorBody),
        (status = 422, description = "Membership rule broken", body = crate::error::ErrorBody),
    ),
    tag = "composites"
)]
async fn add_stable_member(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<Json<RosterEntryResponse>, AppError> {
    add_member(state, caller, id, RosterKind::Stable, body).await
}

/// DELETE /v1/stables/{id}/members/{participant}
#[utoipa::path(
    delete,
    path = "/v1/stables/{id}/members/{participant}",
    params(
        ("id" = Uuid, Path, description = "Stable ID"),
        ("participant" = Uuid, Path, description = "Member to remove"),
        ("at" = Option<String>, Query, description = "When the member left; defaults to now"),
    ),
    responses(
        (status = 200, description = "Member removed", body = RosterEntryResponse),
        (status = 404, description = "No such stable", body = crate::error::ErrorBody),
        (status = 422, description = "Not a current member", body = crate::error::ErrorBody),
    ),
    tag = "composites"
)]
async fn remove_stable_member(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path((id, participant)): Path<(Uuid, Uuid)>,
    Query(query): Query<TransitionRequest>,
) -> Result<Json<RosterEntryResponse>, AppError> {
    remove_member(state, caller, id, participant, RosterKind::Stable, query).await
}

// ── Shared ──────────────────────────────────────────────────────────────────

async fn add_member(
    state: AppState,
    caller: CallerIdentity,
    id: Uuid,
    kind: RosterKind,
    body: Result<Json<AddMemberRequest>, JsonRejection>,
) -> Result<Json<RosterEntryResponse>, AppError> {
    require_role(&caller, Role::Administrator)?;
    let composite = composite_of_kind(&state, id, kind)?;
    let req = extract_validated_json(body)?;
    let at = parse_at(req.at.as_deref())?;

    let entry = state
        .engine
        .add_member(composite, roster_id(req.participant), at)?;
    state.persist(&[composite]).await?;
    Ok(Json(RosterEntryResponse::from(&entry)))
}

async fn remove_member(
    state: AppState,
    caller: CallerIdentity,
    id: Uuid,
    participant: Uuid,
    kind: RosterKind,
    query: TransitionRequest,
) -> Result<Json<RosterEntryResponse>, AppError> {
    require_role(&caller, Role::Administrator)?;
    let composite = composite_of_kind(&state, id, kind)?;
    query.validate().map_err(AppError::Validation)?;
    let at = parse_at(query.at.as_deref())?;

    let entry = state
        .engine
        .remove_member(composite, roster_id(participant), at)?;
    state.persist(&[composite]).await?;
    Ok(Json(RosterEntryResponse::from(&entry)))
}
