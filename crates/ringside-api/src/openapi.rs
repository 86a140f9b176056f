//! # OpenAPI Specification
//!
//! Every utoipa-annotated handler assembled into one document, served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ringside API",
        version = "0.1.0",
        description = "Roster lifecycle management for a wrestling promotion: employment, suspension, injury and retirement of wrestlers, managers and referees; tag team and stable formation; title activation; match validation.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Roster
        crate::routes::roster::list_entries,
        crate::routes::roster::register_entry,
        crate::routes::roster::get_entry,
        crate::routes::roster::delete_entry,
        crate::routes::roster::restore_entry,
        crate::routes::roster::entry_intervals,
        crate::routes::roster::transition_entry,
        // Composites
        crate::routes::composites::list_tag_teams,
        crate::routes::composites::form_tag_team,
        crate::routes::composites::add_tag_team_member,
        crate::routes::composites::remove_tag_team_member,
        crate::routes::composites::list_stables,
        crate::routes::composites::form_stable,
        crate::routes::composites::add_stable_member,
        crate::routes::composites::remove_stable_member,
        // Titles
        crate::routes::titles::list_titles,
        crate::routes::titles::create_title,
        // Matches
        crate::routes::matches::list_match_types,
        crate::routes::matches::validate_match,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::auth::Role,
        crate::routes::roster::RosterEntryResponse,
        crate::routes::roster::MembershipResponse,
        crate::routes::roster::IntervalResponse,
        crate::routes::roster::TransitionResponse,
        crate::routes::roster::CreateEntryRequest,
        crate::routes::roster::TransitionRequest,
        crate::routes::composites::FormTagTeamRequest,
        crate::routes::composites::FormStableRequest,
        crate::routes::composites::AddMemberRequest,
        crate::routes::titles::CreateTitleRequest,
        crate::routes::matches::MatchTypeResponse,
        crate::routes::matches::MatchSideRequest,
        crate::routes::matches::ValidateMatchRequest,
        crate::routes::matches::MatchValidationResponse,
    )),
    tags(
        (name = "roster", description = "Roster entries and lifecycle transitions"),
        (name = "composites", description = "Tag teams and stables"),
        (name = "titles", description = "Championships"),
        (name = "matches", description = "Match types and validation"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_transition_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/roster/{id}/{action}"));
        assert!(doc.paths.paths.contains_key("/v1/matches/validate"));
    }

    #[test]
    fn spec_registers_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("ErrorBody"));
    }
}
