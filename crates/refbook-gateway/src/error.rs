//! Error handling for the gateway.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Validation messages keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when nothing was recorded, a validation error otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, AppError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self))
        }
    }
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Query parameters failed validation.
    #[error("invalid request parameters")]
    Validation(FieldErrors),

    /// Route matched no resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// Catalog store failure.
    #[error("store error: {0}")]
    Store(#[from] refbook_core::Error),

    /// The request exceeded the gateway timeout.
    #[error("request timed out")]
    Timeout,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body for non-validation failures.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(fields) => {
                warn!(?fields, "rejected request parameters");
                return (StatusCode::BAD_REQUEST, Json(fields)).into_response();
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            AppError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("code", "This field is required.");
        errors.add("version", "Ensure this field has no more than 50 characters.");
        errors.add("code", "second");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": ["This field is required.", "second"],
                "version": ["Ensure this field has no more than 50 characters."],
            })
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5).unwrap(), 5);

        let mut errors = FieldErrors::new();
        errors.add("date", "bad");
        assert!(matches!(errors.into_result(()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_status_codes() {
        let mut errors = FieldErrors::new();
        errors.add("date", "bad");
        assert_eq!(
            AppError::Validation(errors).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("/refbooks/x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            AppError::Store(refbook_core::Error::Pool("closed".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
