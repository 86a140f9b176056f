//! # API Error Types
//!
//! [`AppError`] turns engine failures into HTTP responses with a JSON body
//! of the form `{"error": {"code", "message", "details"?}}`.
//!
//! | Failure                          | Status | Code                     |
//! |----------------------------------|--------|--------------------------|
//! | unknown or soft-deleted entry    | 404    | `NOT_FOUND`              |
//! | guard refused a transition       | 409    | `TRANSITION_NOT_ALLOWED` |
//! | formation, match, booking rule   | 422    | `RULE_VIOLATION`         |
//! | malformed name or timestamp      | 422    | `VALIDATION_ERROR`       |
//! | unparseable body                 | 400    | `BAD_REQUEST`            |
//!
//! Internal messages are logged and replaced before they reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ringside_state::{LifecycleError, MatchCheckError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "RULE_VIOLATION").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Structured context for guard and rule failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Application-level error returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Role too low for the operation (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A lifecycle guard refused the transition (409).
    #[error("{message}")]
    TransitionNotAllowed { message: String, details: Value },

    /// A formation, match or booking rule was broken (422).
    #[error("{message}")]
    RuleViolation { message: String, details: Value },

    /// Internal server error (500). Logged, never returned verbatim.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub(crate) fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::TransitionNotAllowed { .. } => (StatusCode::CONFLICT, "TRANSITION_NOT_ALLOWED"),
            Self::RuleViolation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "RULE_VIOLATION"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::TransitionNotAllowed { details, .. } | Self::RuleViolation { details, .. } => {
                Some(details.clone())
            }
            _ => None,
        }
    }

    fn rule(message: String, details: Value) -> Self {
        Self::RuleViolation { message, details }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ringside_core::ValidationError> for AppError {
    fn from(err: ringside_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        if let Some((id, kind, status)) = err.guard_context() {
            return Self::TransitionNotAllowed {
                message: err.to_string(),
                details: json!({
                    "id": id,
                    "kind": kind,
                    "status": status,
                    "status_label": status.label(kind),
                }),
            };
        }
        match err {
            LifecycleError::UnknownEntry(id) => Self::NotFound(format!("roster entry {id}")),
            LifecycleError::Unsupported { kind, action } => Self::rule(
                err.to_string(),
                json!({ "rule": "unsupported", "kind": kind, "action": action }),
            ),
            LifecycleError::Formation(ref formation) => {
                Self::rule(err.to_string(), json!({ "rule": formation.code() }))
            }
            LifecycleError::FutureDated { id, action, at, .. } => Self::rule(
                err.to_string(),
                json!({ "rule": "future_dated", "id": id, "action": action, "at": at }),
            ),
            LifecycleError::OutOfOrder {
                id,
                action,
                at,
                interval,
                boundary,
                ..
            } => Self::rule(
                err.to_string(),
                json!({
                    "rule": "out_of_order",
                    "id": id,
                    "action": action,
                    "at": at,
                    "interval": interval,
                    "boundary": boundary,
                }),
            ),
            LifecycleError::Interval(interval) => Self::Internal(interval.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<MatchCheckError> for AppError {
    fn from(err: MatchCheckError) -> Self {
        let details = match &err {
            MatchCheckError::Composition(composition) => {
                use ringside_state::MatchError;
                let (MatchError::SideCount { expected, actual }
                | MatchError::CompetitorCount { expected, actual }) = composition;
                json!({ "rule": composition.code(), "expected": expected, "actual": actual })
            }
            MatchCheckError::Booking(booking) => {
                use ringside_state::BookingError;
                match booking {
                    BookingError::NotBookable { id, status } => {
                        json!({ "rule": booking.code(), "id": id, "status": status })
                    }
                    BookingError::WrongKind { id, .. }
                    | BookingError::UnknownCompetitor(id)
                    | BookingError::DuplicateCompetitor(id) => {
                        json!({ "rule": booking.code(), "id": id })
                    }
                }
            }
        };
        Self::rule(err.to_string(), details)
    }
}
