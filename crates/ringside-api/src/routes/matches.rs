//! # Match Types & Match Validation API
//!
//! `GET /v1/match-types` lists the standard catalog. `POST
//! /v1/matches/validate` checks a proposed match against a catalog type or
//! an ad-hoc template and, unless told otherwise, checks every competitor
//! is bookable right now.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use ringside_state::matches::{self, find_match_type, CATALOG};
use ringside_state::{MatchCheckError, MatchSide, MatchTypeTemplate, ProposedMatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roster::roster_id;
use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// A standard match type. `null` counts are unconstrained.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchTypeResponse {
    pub name: String,
    pub slug: String,
    pub number_of_sides: Option<usize>,
    pub number_of_competitors: Option<usize>,
}

/// One side of a proposed match.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MatchSideRequest {
    #[serde(default)]
    pub wrestlers: Vec<Uuid>,
    /// Each tag team counts as two competitors.
    #[serde(default)]
    pub tag_teams: Vec<Uuid>,
}

/// A match to validate. Give either `match_type` or explicit counts.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateMatchRequest {
    /// Catalog slug, e.g. `tagteam` or `21handicap`.
    pub match_type: Option<String>,
    pub number_of_sides: Option<usize>,
    pub number_of_competitors: Option<usize>,
    #[serde(default)]
    pub sides: Vec<MatchSideRequest>,
    /// Also check every competitor exists and is bookable. Defaults to true.
    #[serde(default = "default_true")]
    pub check_booking: bool,
}

fn default_true() -> bool {
    true
}

impl Validate for ValidateMatchRequest {
    fn validate(&self) -> Result<(), String> {
        match &self.match_type {
            Some(slug) if find_match_type(slug).is_none() => {
                Err(format!("match_type: unknown match type {slug:?}"))
            }
            Some(_) if self.number_of_sides.is_some() || self.number_of_competitors.is_some() => {
                Err("give either match_type or explicit counts, not both".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl ValidateMatchRequest {
    fn template(&self) -> MatchTypeTemplate {
        self.match_type
            .as_deref()
            .and_then(find_match_type)
            .map(|t| t.template)
            .unwrap_or(MatchTypeTemplate {
                number_of_sides: self.number_of_sides,
                number_of_competitors: self.number_of_competitors,
            })
    }

    fn into_proposed(self) -> ProposedMatch {
        ProposedMatch {
            template: self.template(),
            sides: self
                .sides
                .into_iter()
                .map(|side| MatchSide {
                    wrestlers: side.wrestlers.into_iter().map(roster_id).collect(),
                    tag_teams: side.tag_teams.into_iter().map(roster_id).collect(),
                })
                .collect(),
        }
    }
}

/// The match passed every requested check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MatchValidationResponse {
    pub valid: bool,
    pub sides: usize,
    /// Competitor count with tag teams counted as two.
    pub competitors: usize,
    pub booking_checked: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/match-types", get(list_match_types))
        .route("/v1/matches/validate", post(validate_match))
}

/// GET /v1/match-types
#[utoipa::path(
    get,
    path = "/v1/match-types",
    responses((status = 200, description = "Match type catalog", body = Vec<MatchTypeResponse>)),
    tag = "matches"
)]
async fn list_match_types(caller: CallerIdentity) -> Result<Json<Vec<MatchTypeResponse>>, AppError> {
    require_role(&caller, Role::Basic)?;
    let catalog = CATALOG
        .iter()
        .map(|t| MatchTypeResponse {
            name: t.name.to_string(),
            slug: t.slug.to_string(),
            number_of_sides: t.template.number_of_sides,
            number_of_competitors: t.template.number_of_competitors,
        })
        .collect();
    Ok(Json(catalog))
}

/// POST /v1/matches/validate
#[utoipa::path(
    post,
    path = "/v1/matches/validate",
    request_body = ValidateMatchRequest,
    responses(
        (status = 200, description = "Match is valid", body = MatchValidationResponse),
        (status = 422, description = "Side, competitor or booking rule broken", body = crate::error::ErrorBody),
    ),
    tag = "matches"
)]
async fn validate_match(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<ValidateMatchRequest>, JsonRejection>,
) -> Result<Json<MatchValidationResponse>, AppError> {
    require_role(&caller, Role::Basic)?;
    let req = extract_validated_json(body)?;
    let booking_checked = req.check_booking;
    let proposed = req.into_proposed();

    if booking_checked {
        state.engine.check_match(&proposed)?;
    } else {
        matches::validate(&proposed).map_err(MatchCheckError::from)?;
    }

    Ok(Json(MatchValidationResponse {
        valid: true,
        sides: proposed.sides.len(),
        competitors: matches::competitor_count(&proposed.sides),
        booking_checked,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> ValidateMatchRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn catalog_slug_selects_template() {
        let req = request(r#"{"match_type": "21handicap"}"#);
        assert_eq!(req.template(), MatchTypeTemplate::fixed(2, 3));
        assert!(req.check_booking);
    }

    #[test]
    fn explicit_counts_form_template() {
        let req = request(r#"{"number_of_sides": 3, "check_booking": false}"#);
        assert_eq!(req.template().number_of_sides, Some(3));
        assert_eq!(req.template().number_of_competitors, None);
    }

    #[test]
    fn unknown_slug_is_rejected() {
        let err = request(r#"{"match_type": "ladder"}"#).validate().unwrap_err();
        assert!(err.contains("ladder"));
    }

    #[test]
    fn slug_and_counts_together_are_rejected() {
        let req = request(r#"{"match_type": "singles", "number_of_sides": 2}"#);
        assert!(req.validate().is_err());
    }
}
