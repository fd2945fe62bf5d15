//! Session relay: the HTTP-only cookie that carries the backend token.
//!
//! The BFF never inspects the token. It stores whatever the backend's login
//! returned, attaches it as a bearer token on the way out, and drops it when
//! the backend answers 401 or the admin logs out.

use std::convert::Infallible;
use std::fmt;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::app_state::AppState;
use crate::config::ConsoleConfig;

/// Current session cookie name.
pub const ACCESS_COOKIE: &str = "token";

/// Cookie name used by older console builds. Read as a fallback, always
/// cleared on write.
pub const LEGACY_ACCESS_COOKIE: &str = "access_token";

/// Attributes applied to every session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// Add the `Secure` attribute.
    pub secure: bool,
    /// Lifetime of a freshly set session cookie.
    pub max_age_secs: i64,
}

impl CookieSettings {
    /// Reads the cookie attributes from the service configuration.
    #[must_use]
    pub const fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            secure: config.secure_cookies,
            max_age_secs: config.access_cookie_max_age_secs,
        }
    }
}

fn session_cookie(name: &'static str, value: String, settings: CookieSettings, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Stores `token` in the session cookie and expires the legacy cookie.
#[must_use]
pub fn set_access_cookie(jar: CookieJar, token: &str, settings: CookieSettings) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        token.to_string(),
        settings,
        settings.max_age_secs,
    ))
    .add(session_cookie(LEGACY_ACCESS_COOKIE, String::new(), settings, 0))
}

/// Reads the session token, falling back to the legacy cookie. Empty
/// values count as absent.
#[must_use]
pub fn get_access_cookie(jar: &CookieJar) -> Option<String> {
    [ACCESS_COOKIE, LEGACY_ACCESS_COOKIE]
        .into_iter()
        .filter_map(|name| jar.get(name))
        .map(Cookie::value)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Expires both session cookies.
#[must_use]
pub fn clear_access_cookie(jar: CookieJar, settings: CookieSettings) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, String::new(), settings, 0))
        .add(session_cookie(LEGACY_ACCESS_COOKIE, String::new(), settings, 0))
}

/// Session token of the current request, if any.
///
/// Never rejects: handlers forward without a token and let the backend
/// decide.
#[derive(Clone, Default)]
pub struct AccessToken(pub Option<String>);

impl AccessToken {
    /// Borrowed token.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.0.is_some() { "<redacted>" } else { "<none>" };
        f.debug_tuple("AccessToken").field(&shown).finish()
    }
}

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(get_access_cookie(&jar)))
    }
}

/// Expires the session cookies whenever an `/api` response is 401.
///
/// Disabled by `CLEAR_COOKIE_ON_UNAUTHORIZED=false`.
pub async fn clear_session_on_unauthorized(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::UNAUTHORIZED || !state.config.clear_cookie_on_unauthorized {
        return response;
    }
    tracing::info!("backend rejected the session, clearing cookies");
    let jar = clear_access_cookie(CookieJar::new(), state.cookie_settings());
    (jar, response).into_response()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::http::header::{COOKIE, SET_COOKIE};

    const SETTINGS: CookieSettings = CookieSettings {
        secure: false,
        max_age_secs: 604_800,
    };

    fn set_cookie_headers(jar: CookieJar) -> Vec<String> {
        let response = (jar, StatusCode::OK).into_response();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    fn jar_with(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        let Ok(value) = cookie_header.parse() else {
            panic!("bad header");
        };
        headers.insert(COOKIE, value);
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn set_writes_token_and_expires_legacy() {
        let headers = set_cookie_headers(set_access_cookie(CookieJar::new(), "abc", SETTINGS));
        let Some(token) = headers.iter().find(|h| h.starts_with("token=")) else {
            panic!("token cookie missing: {headers:?}");
        };
        assert!(token.starts_with("token=abc"));
        assert!(token.contains("HttpOnly"));
        assert!(token.contains("SameSite=Lax"));
        assert!(token.contains("Path=/"));
        assert!(token.contains("Max-Age=604800"));
        assert!(!token.contains("Secure"));

        let Some(legacy) = headers.iter().find(|h| h.starts_with("access_token=")) else {
            panic!("legacy cookie missing: {headers:?}");
        };
        assert!(legacy.contains("Max-Age=0"));
    }

    #[test]
    fn secure_flag_follows_settings() {
        let settings = CookieSettings {
            secure: true,
            ..SETTINGS
        };
        let headers = set_cookie_headers(set_access_cookie(CookieJar::new(), "abc", settings));
        assert!(headers.iter().all(|h| h.contains("Secure")));
    }

    #[test]
    fn clear_expires_both() {
        let headers = set_cookie_headers(clear_access_cookie(CookieJar::new(), SETTINGS));
        assert_eq!(headers.len(), 2);
        assert!(headers.iter().all(|h| h.contains("Max-Age=0")));
    }

    #[test]
    fn get_prefers_current_then_legacy() {
        assert_eq!(
            get_access_cookie(&jar_with("token=new; access_token=old")).as_deref(),
            Some("new")
        );
        assert_eq!(
            get_access_cookie(&jar_with("access_token=old")).as_deref(),
            Some("old")
        );
        assert_eq!(
            get_access_cookie(&jar_with("token=; access_token=old")).as_deref(),
            Some("old")
        );
        assert_eq!(get_access_cookie(&jar_with("lang=en")), None);
    }

    #[test]
    fn debug_never_prints_token() {
        let token = AccessToken(Some("secret-value".to_string()));
        assert!(!format!("{token:?}").contains("secret-value"));
    }
}
