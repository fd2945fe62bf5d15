//! Login and logout bodies.

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Request body for `POST /api/auth/login`.
///
/// Fields are read leniently: a non-string `username` falls through to
/// `email`, and a non-string `password` counts as missing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Username, or an email address.
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    /// Email address, used when `username` is absent.
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    /// Password.
    #[schema(value_type = Option<String>)]
    pub password: Option<Value>,
}

impl LoginRequest {
    /// Trimmed identifier: `username` when it is a string, else `email`.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.username
            .as_ref()
            .and_then(Value::as_str)
            .or_else(|| self.email.as_ref().and_then(Value::as_str))
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    /// Password when it is a string, empty otherwise.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_ref().and_then(Value::as_str).unwrap_or_default()
    }
}

/// Form body for `POST /api/auth/logout`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LogoutForm {
    /// Console locale to land on after logout.
    pub locale: Option<String>,
}

impl LogoutForm {
    /// Two-letter lower-case locale, `en` otherwise.
    #[must_use]
    pub fn locale(&self) -> String {
        self.locale
            .as_deref()
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| l.len() == 2 && l.chars().all(|c| c.is_ascii_lowercase()))
            .unwrap_or_else(|| "en".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn login(value: Value) -> LoginRequest {
        let Ok(req) = serde_json::from_value(value) else {
            panic!("decode failed");
        };
        req
    }

    #[test]
    fn username_wins_over_email() {
        let req = login(json!({"username": " alice ", "email": "a@example.com", "password": "pw"}));
        assert_eq!(req.identifier(), "alice");
        assert_eq!(req.password(), "pw");
    }

    #[test]
    fn non_string_username_falls_back_to_email() {
        let req = login(json!({"username": 42, "email": " a@example.com"}));
        assert_eq!(req.identifier(), "a@example.com");
        assert_eq!(req.password(), "");
    }

    #[test]
    fn locale_is_sanitized() {
        let form = |locale: &str| LogoutForm {
            locale: Some(locale.to_string()),
        };
        assert_eq!(form(" FR ").locale(), "fr");
        assert_eq!(form("english").locale(), "en");
        assert_eq!(form("e1").locale(), "en");
        assert_eq!(LogoutForm::default().locale(), "en");
    }
}
