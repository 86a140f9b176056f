//! # Roster API
//!
//! Registration, lookup, soft deletion, interval history, and lifecycle
//! transitions for every roster kind.
//!
//! Transitions are `POST /v1/roster/{id}/{action}` where `action` is one of
//! `employ`, `release`, `suspend`, `reinstate`, `injure`, `clear-injury`,
//! `retire`, `unretire`, or the stable and title spellings `activate` and
//! `deactivate`. The body is optional; `{"at": "..."}` back- or post-dates
//! the transition.

use axum::extract::rejection::JsonRejection;
use axum::extract::{MatchedPath, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use ringside_core::{RosterId, RosterKind, RosterName, Timestamp};
use ringside_state::{Interval, Membership, RosterEntry, RosterStatus, Transition, TransitionReport};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{check_at, extract_optional_json, extract_validated_json, parse_at, Validate};
use crate::state::AppState;

/// URL segments accepted after `/v1/roster/{id}/`.
pub const ACTIONS: [&str; 10] = [
    "employ",
    "release",
    "suspend",
    "reinstate",
    "injure",
    "clear-injury",
    "retire",
    "unretire",
    "activate",
    "deactivate",
];

// ── DTOs ────────────────────────────────────────────────────────────────────

/// One participant's time in a tag team or stable.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipResponse {
    pub participant: Uuid,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

impl From<&Membership> for MembershipResponse {
    fn from(m: &Membership) -> Self {
        Self {
            participant: *m.participant.as_uuid(),
            joined_at: *m.joined_at.as_datetime(),
            left_at: m.left_at.map(|t| *t.as_datetime()),
        }
    }
}

/// A roster entry as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RosterEntryResponse {
    pub id: Uuid,
    /// `wrestler`, `manager`, `referee`, `tag_team`, `stable` or `title`.
    pub kind: String,
    pub name: String,
    /// Machine status, e.g. `pending_employment`.
    pub status: String,
    /// Display label for the status, e.g. "Pending Introduction" for a title.
    pub status_label: String,
    /// Membership history; empty for participants and titles.
    pub members: Vec<MembershipResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<&RosterEntry> for RosterEntryResponse {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            kind: entry.kind.as_str().to_string(),
            name: entry.name.as_str().to_string(),
            status: entry.status.as_str().to_string(),
            status_label: entry.status.label(entry.kind).to_string(),
            members: entry.members.iter().map(MembershipResponse::from).collect(),
            created_at: *entry.created_at.as_datetime(),
        }
    }
}

/// One lifecycle span.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IntervalResponse {
    pub id: Uuid,
    /// `employment`, `suspension`, `injury`, `retirement` or `activation`.
    pub kind: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<&Interval> for IntervalResponse {
    fn from(i: &Interval) -> Self {
        Self {
            id: *i.id.as_uuid(),
            kind: i.kind.as_str().to_string(),
            started_at: *i.started_at.as_datetime(),
            ended_at: i.ended_at.map(|t| *t.as_datetime()),
        }
    }
}

/// Result of a transition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub transition: String,
    pub at: DateTime<Utc>,
    /// The subject after the transition and its cascade.
    pub entry: RosterEntryResponse,
    /// Every entry the transition wrote, the subject first.
    pub touched: Vec<Uuid>,
}

impl TransitionResponse {
    fn new(report: &TransitionReport, entry: &RosterEntry) -> Self {
        Self {
            transition: report.transition.as_str().to_string(),
            at: *report.at.as_datetime(),
            entry: RosterEntryResponse::from(entry),
            touched: report.touched.iter().map(|id| *id.as_uuid()).collect(),
        }
    }
}

/// Register a wrestler, manager, referee or title.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEntryRequest {
    pub kind: String,
    pub name: String,
}

impl Validate for CreateEntryRequest {
    fn validate(&self) -> Result<(), String> {
        let kind: RosterKind = self.kind.parse().map_err(|e| format!("kind: {e}"))?;
        if kind.is_composite() {
            return Err(format!(
                "kind: a {kind} is formed from members, use /v1/tag-teams or /v1/stables"
            ));
        }
        RosterName::new(self.name.as_str()).map_err(|e| format!("name: {e}"))?;
        Ok(())
    }
}

/// Optional effective date for a transition.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TransitionRequest {
    /// RFC 3339 or `YYYY-MM-DD HH:MM:SS`; defaults to now.
    pub at: Option<String>,
}

impl Validate for TransitionRequest {
    fn validate(&self) -> Result<(), String> {
        check_at("at", self.at.as_deref())
    }
}

/// Filter for list endpoints.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListParams {
    pub kind: Option<String>,
    /// Machine status name, e.g. `retired` or `pending_employment`.
    pub status: Option<String>,
}

impl ListParams {
    fn status(&self) -> Result<Option<RosterStatus>, AppError> {
        self.status
            .as_deref()
            .map(|s| {
                RosterStatus::parse(s)
                    .ok_or_else(|| AppError::Validation(format!("status: unknown status {s:?}")))
            })
            .transpose()
    }
}

// ── Router ──────────────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    let mut router = Router::new()
        .route("/v1/roster", get(list_entries).post(register_entry))
        .route("/v1/roster/:id", get(get_entry).delete(delete_entry))
        .route("/v1/roster/:id/restore", post(restore_entry))
        .route("/v1/roster/:id/intervals", get(entry_intervals));
    for action in ACTIONS {
        router = router.route(&format!("/v1/roster/:id/{action}"), post(transition_entry));
    }
    router
}

pub(crate) fn roster_id(id: Uuid) -> RosterId {
    RosterId::from_uuid(id)
}

pub(crate) fn live_entry(state: &AppState, id: RosterId) -> Result<RosterEntry, AppError> {
    state
        .engine
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("roster entry {id}")))
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// GET /v1/roster: live entries ordered by name.
#[utoipa::path(
    get,
    path = "/v1/roster",
    params(
        ("kind" = Option<String>, Query, description = "Only entries of this kind"),
        ("status" = Option<String>, Query, description = "Only entries in this status"),
    ),
    responses(
        (status = 200, description = "Roster entries", body = Vec<RosterEntryResponse>),
        (status = 422, description = "Unknown kind or status", body = crate::error::ErrorBody),
    ),
    tag = "roster"
)]
async fn list_entries(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RosterEntryResponse>>, AppError> {
    require_role(&caller, Role::Basic)?;
    let kind = params
        .kind
        .as_deref()
        .map(str::parse::<RosterKind>)
        .transpose()?;
    let status = params.status()?;
    let entries = state.engine.list(kind, status);
    Ok(Json(entries.iter().map(RosterEntryResponse::from).collect()))
}

/// POST /v1/roster: register a never-engaged entry.
#[utoipa::path(
    post,
    path = "/v1/roster",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry registered", body = RosterEntryResponse),
        (status = 422, description = "Invalid kind or name", body = crate::error::ErrorBody),
    ),
    tag = "roster"
)]
async fn register_entry(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RosterEntryResponse>), AppError> {
    require_role(&caller, Role::Administrator)?;
    let req = extract_validated_json(body)?;
    let kind: RosterKind = req.kind.parse()?;
    let entry = state.engine.register(kind, RosterName::new(req.name)?)?;
    state.persist(&[entry.id]).await?;
    Ok((StatusCode::CREATED, Json(RosterEntryResponse::from(&entry))))
}

/// GET /v1/roster/{id}
#[utoipa::path(
    get,
    path = "/v1/roster/{id}",
    params(("id" = Uuid, Path, description = "Roster entry ID")),
    responses(
        (status = 200, description = "Entry found", body = RosterEntryResponse),
        (status = 404, description = "Not found or soft-deleted", body = crate::error::ErrorBody),
    ),
    tag = "roster"
)]
async fn get_entry(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterEntryResponse>, AppError> {
    require_role(&caller, Role::Basic)?;
    let entry = live_entry(&state, roster_id(id))?;
    Ok(Json(RosterEntryResponse::from(&entry)))
}

/// DELETE /v1/roster/{id}: soft delete.
#[utoipa::path(
    delete,
    path = "/v1/roster/{id}",
    params(("id" = Uuid, Path, description = "Roster entry ID")),
    responses(
        (status = 204, description = "Entry soft-deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "roster"
)]
async fn delete_entry(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::Administrator)?;
    let touched = state.engine.soft_delete(roster_id(id))?;
    state.persist(&touched).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/roster/{id}/restore: undo a soft delete.
#[utoipa::path(
    post,
    path = "/v1/roster/{id}/restore",
    params(("id" = Uuid, Path, description = "Roster entry ID")),
    responses(
        (status = 200, description = "Entry restored", body = RosterEntryResponse),
        (status = 404, description = "No soft-deleted entry with this ID", body = crate::error::ErrorBody),
    ),
    tag = "roster"
)]
async fn restore_entry(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterEntryResponse>, AppError> {
    require_role(&caller, Role::Administrator)?;
    let id = roster_id(id);
    let touched = state.engine.restore(id)?;
    state.persist(&touched).await?;
    let entry = live_entry(&state, id)?;
    Ok(Json(RosterEntryResponse::from(&entry)))
}

/// GET /v1/roster/{id}/intervals: lifecycle history ordered by start.
#[utoipa::path(
    get,
    path = "/v1/roster/{id}/intervals",
    params(("id" = Uuid, Path, description = "Roster entry ID")),
    responses(
        (status = 200, description = "Interval history", body = Vec<IntervalResponse>),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "roster"
)]
async fn entry_intervals(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<IntervalResponse>>, AppError> {
    require_role(&caller, Role::Basic)?;
    let history = state.engine.history(roster_id(id))?;
    Ok(Json(history.iter().map(IntervalResponse::from).collect()))
}

/// POST /v1/roster/{id}/{action}: apply a lifecycle transition.
#[utoipa::path(
    post,
    path = "/v1/roster/{id}/{action}",
    params(
        ("id" = Uuid, Path, description = "Roster entry ID"),
        ("action" = String, Path, description = "employ, release, suspend, reinstate, injure, clear-injury, retire, unretire, activate or deactivate"),
    ),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition applied", body = TransitionResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Guard refused the transition", body = crate::error::ErrorBody),
        (status = 422, description = "Transition not supported for this kind", body = crate::error::ErrorBody),
    ),
    tag = "roster"
)]
async fn transition_entry(
    State(state): State<AppState>,
    caller: CallerIdentity,
    matched: MatchedPath,
    Path(id): Path<Uuid>,
    body: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<TransitionResponse>, AppError> {
    require_role(&caller, Role::Administrator)?;
    let action = matched.as_str().rsplit('/').next().unwrap_or_default();
    let transition = Transition::from_action(action)
        .ok_or_else(|| AppError::NotFound(format!("unknown action {action:?}")))?;
    let req = extract_optional_json(body)?;
    let at: Option<Timestamp> = parse_at(req.at.as_deref())?;

    let id = roster_id(id);
    let report = state.engine.transition(id, transition, at)?;
    state.persist(&report.touched).await?;
    let entry = live_entry(&state, id)?;
    Ok(Json(TransitionResponse::new(&report, &entry)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_resolves() {
        for action in ACTIONS {
            assert!(Transition::from_action(action).is_some(), "{action}");
        }
    }

    #[test]
    fn create_request_rejects_composites() {
        let req = CreateEntryRequest {
            kind: "tag_team".into(),
            name: "The Brain Busters".into(),
        };
        assert!(req.validate().unwrap_err().contains("/v1/tag-teams"));
    }

    #[test]
    fn create_request_rejects_blank_name() {
        let req = CreateEntryRequest {
            kind: "referee".into(),
            name: "   ".into(),
        };
        assert!(req.validate().unwrap_err().starts_with("name"));
    }

    #[test]
    fn entry_response_carries_label() {
        let entry = RosterEntry::new(
            RosterKind::Title,
            RosterName::new("Intercontinental Championship").unwrap(),
            Timestamp::parse("2026-03-01T12:00:00Z").unwrap(),
        );
        let response = RosterEntryResponse::from(&entry);
        assert_eq!(response.status, "unemployed");
        assert_eq!(response.status_label, "Unactivated");
        assert_eq!(response.kind, "title");
    }

    #[test]
    fn list_params_parse_status() {
        let params = ListParams {
            kind: None,
            status: Some("pending_employment".into()),
        };
        assert_eq!(params.status().unwrap(), Some(RosterStatus::PendingEmployment));
        assert_eq!(ListParams::default().status().unwrap(), None);

        let params = ListParams {
            kind: None,
            status: Some("on_vacation".into()),
        };
        assert_eq!(params.status().unwrap_err().status_and_code().1, "VALIDATION_ERROR");
    }
}
