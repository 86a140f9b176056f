//! # Authentication & Authorization
//!
//! Bearer token middleware with three ordered roles.
//!
//! ```text
//! Bearer {role}:{secret}   role-scoped token
//! Bearer {secret}          shared secret, treated as super_administrator
//! ```
//!
//! Reads need [`Role::Basic`]; anything that writes the roster needs
//! [`Role::Administrator`]. With no token configured, every request runs as
//! [`Role::SuperAdministrator`].

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Role ────────────────────────────────────────────────────────────────────

/// Caller roles, lowest privilege first. `Ord` follows declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only access to the roster.
    Basic,
    /// Can run transitions, form composites, and validate matches.
    Administrator,
    /// Everything an administrator can do.
    SuperAdministrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Administrator => "administrator",
            Self::SuperAdministrator => "super_administrator",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Self::Basic),
            "administrator" => Some(Self::Administrator),
            "super_administrator" => Some(Self::SuperAdministrator),
            _ => None,
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity the auth middleware attached to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub role: Role,
}

impl CallerIdentity {
    /// Whether the caller holds at least `minimum`.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// 403 unless the caller holds at least `minimum`.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Expected secret, injected into request extensions. `Debug` redacts it.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse `{role}:{secret}` or a bare `{secret}`.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    match provided.split_once(':') {
        None => {
            if constant_time_token_eq(provided, expected_secret) {
                Ok(CallerIdentity {
                    role: Role::SuperAdministrator,
                })
            } else {
                Err("invalid bearer token".into())
            }
        }
        Some((role, secret)) => {
            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }
            let role = Role::parse(role).ok_or_else(|| format!("unknown role: {role}"))?;
            Ok(CallerIdentity { role })
        }
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the `Authorization` header and attach a [`CallerIdentity`].
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    let Some(AuthConfig {
        token: Some(expected),
    }) = expected_token
    else {
        request.extensions_mut().insert(CallerIdentity {
            role: Role::SuperAdministrator,
        });
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header.map(|value| value.strip_prefix("Bearer ")) {
        Some(Some(provided)) => match parse_bearer_token(provided, &expected) {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
                next.run(request).await
            }
            Err(msg) => {
                tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                unauthorized_response(&msg)
            }
        },
        Some(None) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn whoami(caller: CallerIdentity) -> &'static str {
        caller.role.as_str()
    }

    fn test_app(token: Option<&str>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(AuthConfig {
                token: token.map(str::to_string),
            }))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn roles_are_ordered() {
        assert!(Role::Basic < Role::Administrator);
        assert!(Role::Administrator < Role::SuperAdministrator);
    }

    #[test]
    fn require_role_rejects_lower_role() {
        let caller = CallerIdentity { role: Role::Basic };
        assert!(matches!(
            require_role(&caller, Role::Administrator),
            Err(AppError::Forbidden(_))
        ));
        assert!(require_role(&caller, Role::Basic).is_ok());
    }

    #[test]
    fn parse_role_scoped_token() {
        let identity = parse_bearer_token("basic:s3cret", "s3cret").unwrap();
        assert_eq!(identity.role, Role::Basic);
    }

    #[test]
    fn parse_rejects_unknown_role() {
        let err = parse_bearer_token("owner:s3cret", "s3cret").unwrap_err();
        assert!(err.contains("unknown role"));
    }

    #[test]
    fn parse_rejects_wrong_secret_before_role() {
        let err = parse_bearer_token("owner:nope", "s3cret").unwrap_err();
        assert_eq!(err, "invalid bearer token");
    }

    #[test]
    fn auth_config_debug_redacts() {
        let debug = format!("{:?}", AuthConfig { token: Some("hunter2".into()) });
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[tokio::test]
    async fn bare_secret_is_super_administrator() {
        let (status, body) = call(test_app(Some("s3cret")), Some("Bearer s3cret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "super_administrator");
    }

    #[tokio::test]
    async fn role_token_sets_identity() {
        let (status, body) = call(test_app(Some("s3cret")), Some("Bearer administrator:s3cret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "administrator");
    }

    #[tokio::test]
    async fn missing_header_rejected() {
        let (status, body) = call(test_app(Some("s3cret")), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("missing authorization header"));
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let (status, body) = call(test_app(Some("s3cret")), Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Bearer scheme"));
    }

    #[tokio::test]
    async fn disabled_auth_grants_top_role() {
        let (status, body) = call(test_app(None), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "super_administrator");
    }
}
