//! # Extractors & Validation
//!
//! JSON body extraction with [`Validate`] checks, and parsing of the
//! optional effective-date field most write requests carry.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use ringside_core::Timestamp;

use crate::error::AppError;

/// Request rules that serde cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping rejections to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Unwrap a JSON body and run its [`Validate`] rules.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Like [`extract_validated_json`], but an absent body counts as `T::default()`.
///
/// Transition endpoints accept an empty POST meaning "effective now".
pub fn extract_optional_json<T: Validate + Default>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    match result {
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        other => extract_validated_json(other),
    }
}

/// Parse an optional effective date. Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_at(at: Option<&str>) -> Result<Option<Timestamp>, AppError> {
    at.map(Timestamp::parse).transpose().map_err(AppError::from)
}

/// [`Validate`] helper for an optional timestamp field.
pub fn check_at(field: &str, at: Option<&str>) -> Result<(), String> {
    match at {
        Some(raw) => Timestamp::parse(raw)
            .map(|_| ())
            .map_err(|e| format!("{field}: {e}")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_at_accepts_both_formats() {
        let a = parse_at(Some("2026-03-01T12:00:00Z")).unwrap().unwrap();
        let b = parse_at(Some("2026-03-01 12:00:00")).unwrap().unwrap();
        assert_eq!(a, b);
        assert!(parse_at(None).unwrap().is_none());
    }

    #[test]
    fn parse_at_rejects_garbage() {
        assert!(matches!(parse_at(Some("yesterday")), Err(AppError::Validation(_))));
    }

    #[test]
    fn check_at_names_the_field() {
        let err = check_at("started_at", Some("soon")).unwrap_err();
        assert!(err.starts_with("started_at"));
        assert!(check_at("started_at", None).is_ok());
    }
}
