//! BFF error types with HTTP status code mapping.
//!
//! [`BffError`] is the central error type. Every variant renders the same
//! flat JSON body the console front-end expects:
//!
//! ```json
//! {
//!   "message": "Withdrawal already processed",
//!   "code": "WITHDRAWAL_STATE",
//!   "details": { "message": "Withdrawal already processed", "code": "WITHDRAWAL_STATE" }
//! }
//! ```

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error code, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Raw backend payload or field-level validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant              | HTTP Status             |
/// |----------------------|-------------------------|
/// | `Backend`            | relayed from backend    |
/// | `Unreachable`        | 502 Bad Gateway         |
/// | `MissingAccessToken` | 502 Bad Gateway         |
/// | `UnexpectedPayload`  | 502 Bad Gateway         |
/// | `InvalidRequest`     | 400 Bad Request         |
/// | `Validation`         | 400 Bad Request         |
/// | `Internal`           | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum BffError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Backend {
        /// Status code returned by the backend.
        status: StatusCode,
        /// Message extracted from the backend body.
        message: String,
        /// Backend error code, stringified.
        code: Option<String>,
        /// Full backend body, `null` when unreadable.
        details: serde_json::Value,
    },

    /// The backend could not be reached at all.
    #[error("unable to connect to the backend service: {0}")]
    Unreachable(String),

    /// Login succeeded upstream but no token came back.
    #[error("Access token is missing")]
    MissingAccessToken,

    /// The backend returned a body the mapper cannot read.
    #[error("unexpected backend payload: {0}")]
    UnexpectedPayload(String),

    /// Request validation failed before reaching the backend.
    #[error("{0}")]
    InvalidRequest(String),

    /// Field-level validation failed.
    #[error("{message}")]
    Validation {
        /// Summary message.
        message: String,
        /// Field name to message.
        fields: BTreeMap<String, String>,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BffError {
    /// Returns the error code emitted in the response body.
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        match self {
            Self::Backend { code, .. } => code.clone(),
            Self::Unreachable(_) => Some("BACKEND_UNREACHABLE".to_string()),
            Self::UnexpectedPayload(_) => Some("UNEXPECTED_PAYLOAD".to_string()),
            Self::InvalidRequest(_) => Some("INVALID_REQUEST".to_string()),
            Self::Validation { .. } => Some("VALIDATION_FAILED".to_string()),
            Self::MissingAccessToken | Self::Internal(_) => None,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Backend { status, .. } => *status,
            Self::Unreachable(_) | Self::MissingAccessToken | Self::UnexpectedPayload(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::InvalidRequest(_) | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the JSON body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        let message = match self {
            Self::Unreachable(_) => "Unable to connect to the backend service".to_string(),
            Self::UnexpectedPayload(_) => "Unexpected response from the backend service".to_string(),
            Self::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };
        let details = match self {
            Self::Backend { details, .. } => Some(details.clone()),
            Self::Validation { fields, .. } => serde_json::to_value(fields).ok(),
            _ => None,
        };
        ErrorResponse {
            message,
            code: self.error_code(),
            details,
        }
    }
}

impl From<reqwest::Error> for BffError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }
}

impl From<JsonRejection> for BffError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for BffError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for BffError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Internal(detail) => tracing::error!(%detail, "request failed"),
            Self::Unreachable(detail) => tracing::warn!(%detail, "backend unreachable"),
            Self::UnexpectedPayload(detail) => tracing::warn!(%detail, "unreadable backend payload"),
            _ => {}
        }
        let mut response = axum::Json(self.to_body()).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    async fn body_json(err: BffError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(value) = serde_json::from_slice(&bytes) else {
            panic!("body is not json");
        };
        (status, value)
    }

    #[tokio::test]
    async fn backend_error_keeps_status_and_payload() {
        let err = BffError::Backend {
            status: StatusCode::CONFLICT,
            message: "Withdrawal already processed".to_string(),
            code: Some("WITHDRAWAL_STATE".to_string()),
            details: serde_json::json!({"message": "Withdrawal already processed"}),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Withdrawal already processed");
        assert_eq!(body["code"], "WITHDRAWAL_STATE");
        assert_eq!(body["details"]["message"], "Withdrawal already processed");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let (status, body) = body_json(BffError::Internal("cache exploded".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
        assert!(body.get("code").is_none());
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn unreachable_maps_to_bad_gateway() {
        let (status, body) = body_json(BffError::Unreachable("refused".to_string())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Unable to connect to the backend service");
        assert_eq!(body["code"], "BACKEND_UNREACHABLE");
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), "Title is required.".to_string());
        let err = BffError::Validation {
            message: "Promotion is invalid".to_string(),
            fields,
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["title"], "Title is required.");
    }

    #[test]
    fn status_codes_follow_variant() {
        let err = BffError::Backend {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
            code: None,
            details: serde_json::Value::Null,
        };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BffError::MissingAccessToken.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(BffError::MissingAccessToken.error_code(), None);
        assert_eq!(
            BffError::InvalidRequest("x".to_string()).error_code().as_deref(),
            Some("INVALID_REQUEST")
        );
    }
}
