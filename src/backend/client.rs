//! HTTP client for the platform backend.
//!
//! One attempt per call, no retries, no timeout override. Every request
//! carries `Accept: application/json`, the configured `Accept-Language`, and
//! the session bearer token when one is present.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::instrument;

use crate::error::BffError;

/// Backend REST client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    accept_language: Arc<str>,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BffError::Internal`] when `base_url` is not an absolute
    /// URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, accept_language: &str) -> Result<Self, BffError> {
        let base_url = base_url.trim_end_matches('/');
        url::Url::parse(base_url)
            .map_err(|e| BffError::Internal(format!("invalid backend base url {base_url}: {e}")))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BffError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url),
            accept_language: Arc::from(accept_language),
        })
    }

    /// Backend origin, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path`, returning the decoded body.
    ///
    /// # Errors
    ///
    /// See [`BackendClient::send`].
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, BffError> {
        self.send(Method::GET, path, token, None).await
    }

    /// Sends one request to `path` (which may carry a query string).
    ///
    /// Returns the body on 2xx: JSON when the backend says so, text
    /// otherwise, `null` when empty or unparsable.
    ///
    /// # Errors
    ///
    /// - [`BffError::Unreachable`] when no response arrives.
    /// - [`BffError::Backend`] for any non-2xx status, with the message
    ///   and code pulled out of the body.
    #[instrument(skip(self, token, body))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, BffError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .http
            .request(method, &url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, self.accept_language.as_ref());
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, "backend request failed");
        })?;
        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "backend responded"
        );

        let payload = read_body(response).await;
        if status.is_success() {
            return Ok(payload);
        }

        let error = backend_error(status, payload);
        tracing::warn!(status = status.as_u16(), message = %error, "backend returned an error");
        Err(error)
    }
}

/// Reads a response body. JSON is decoded only when the content type says
/// so; a broken JSON body or an empty body reads as `null`.
async fn read_body(response: reqwest::Response) -> Value {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let Ok(bytes) = response.bytes().await else {
        return Value::Null;
    };
    if bytes.is_empty() {
        return Value::Null;
    }
    if is_json {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    } else {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Builds the relayed error for a non-2xx backend answer.
#[must_use]
pub fn backend_error(status: StatusCode, payload: Value) -> BffError {
    BffError::Backend {
        status,
        message: resolve_error_message(&payload, status),
        code: resolve_error_code(&payload),
        details: payload,
    }
}

/// Message precedence: `message`, then `details.message`, then a plain
/// text body, then a generic status line.
#[must_use]
pub fn resolve_error_message(payload: &Value, status: StatusCode) -> String {
    let from_object = payload
        .get("message")
        .and_then(message_text)
        .or_else(|| {
            payload
                .get("details")
                .and_then(|d| d.get("message"))
                .and_then(message_text)
        });
    if let Some(message) = from_object {
        return message;
    }
    if let Value::String(text) = payload {
        let text = text.trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }
    format!("Request failed with status {}", status.as_u16())
}

/// Stringified `code`, absent when missing or `null`.
#[must_use]
pub fn resolve_error_code(payload: &Value) -> Option<String> {
    match payload.get("code")? {
        Value::Null => None,
        Value::String(code) => Some(code.clone()),
        other => Some(other.to_string()),
    }
}

/// Validation pipes send `message` as an array of strings.
fn message_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(","),
        _ => String::new(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_prefers_top_level() {
        let payload = json!({"message": " Insufficient balance ", "details": {"message": "inner"}});
        assert_eq!(
            resolve_error_message(&payload, StatusCode::BAD_REQUEST),
            "Insufficient balance"
        );
    }

    #[test]
    fn message_joins_validation_array() {
        let payload = json!({"message": ["amount must be positive", "note too long"]});
        assert_eq!(
            resolve_error_message(&payload, StatusCode::BAD_REQUEST),
            "amount must be positive,note too long"
        );
    }

    #[test]
    fn message_falls_back_to_details_then_text_then_status() {
        let nested = json!({"message": "", "details": {"message": "Nested reason"}});
        assert_eq!(resolve_error_message(&nested, StatusCode::CONFLICT), "Nested reason");

        let text = Value::String("Bad Gateway from upstream".to_string());
        assert_eq!(
            resolve_error_message(&text, StatusCode::BAD_GATEWAY),
            "Bad Gateway from upstream"
        );

        assert_eq!(
            resolve_error_message(&Value::Null, StatusCode::SERVICE_UNAVAILABLE),
            "Request failed with status 503"
        );
    }

    #[test]
    fn code_is_stringified() {
        assert_eq!(resolve_error_code(&json!({"code": "E_LOCKED"})).as_deref(), Some("E_LOCKED"));
        assert_eq!(resolve_error_code(&json!({"code": 4001})).as_deref(), Some("4001"));
        assert_eq!(resolve_error_code(&json!({"code": null})), None);
        assert_eq!(resolve_error_code(&json!("text")), None);
    }

    #[test]
    fn backend_error_keeps_payload() {
        let payload = json!({"message": "Forbidden", "code": "FORBIDDEN"});
        let BffError::Backend {
            status,
            message,
            code,
            details,
        } = backend_error(StatusCode::FORBIDDEN, payload.clone())
        else {
            panic!("expected a backend error");
        };
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(message, "Forbidden");
        assert_eq!(code.as_deref(), Some("FORBIDDEN"));
        assert_eq!(details, payload);
    }

    #[test]
    fn base_url_must_be_absolute() {
        assert!(BackendClient::new("not a url", "en").is_err());
        let Ok(client) = BackendClient::new("http://backend.internal/", "en") else {
            panic!("valid url rejected");
        };
        assert_eq!(client.base_url(), "http://backend.internal");
    }
}
