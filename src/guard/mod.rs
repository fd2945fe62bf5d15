//! Route guard for the console's page routes.
//!
//! A pure decision over the request path and whether a session cookie is
//! present. The token is never validated here; an expired token is only
//! discovered when the backend answers 401.
//!
//! ```text
//! /dashboard            no cookie  ──▶ 307 /en/admin/login
//! /en/admin/login       cookie     ──▶ 307 /en/dashboard
//! /en/login             no cookie  ──▶ 307 /en/admin/login
//! /reports?page=2       cookie     ──▶ 307 /en/reports?page=2
//! /en/dashboard         cookie     ──▶ pass
//! ```

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::app_state::AppState;
use crate::config::ConsoleConfig;
use crate::session::get_access_cookie;

/// Path prefixes the guard never touches.
const BYPASS_PREFIXES: [&str; 5] = ["/_next", "/api", "/health", "/swagger-ui", "/api-docs"];

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Serve the request as is.
    Pass,
    /// Redirect to this path; the caller re-attaches the query string.
    Redirect(String),
}

/// Locale and login redirect rules.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    locales: Vec<String>,
    default_locale: String,
}

impl RouteGuard {
    /// Creates a guard. `default_locale` is used to rebase paths that carry
    /// none of `locales`.
    #[must_use]
    pub fn new(locales: Vec<String>, default_locale: impl Into<String>) -> Self {
        Self {
            locales,
            default_locale: default_locale.into(),
        }
    }

    /// Builds the guard from the service configuration.
    #[must_use]
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.supported_locales.clone(), config.default_locale.clone())
    }

    /// Decides what to do with a page request.
    #[must_use]
    pub fn decide(&self, path: &str, has_token: bool) -> GuardDecision {
        if BYPASS_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) || path.contains('.') {
            return GuardDecision::Pass;
        }

        let (locale, normalized, rebased) = match self.locale_of(path) {
            Some(locale) => (locale.to_string(), path.to_string(), false),
            None => {
                let locale = self.default_locale.clone();
                let suffix = if path == "/" { "" } else { path };
                let normalized = format!("/{locale}{suffix}");
                (locale, normalized, true)
            }
        };

        let login_path = format!("/{locale}/admin/login");
        let legacy_login_path = format!("/{locale}/login");
        let is_login_route = normalized == login_path || normalized == legacy_login_path;

        if has_token && is_login_route {
            return GuardDecision::Redirect(format!("/{locale}/dashboard"));
        }
        if !has_token && normalized != login_path {
            return GuardDecision::Redirect(login_path);
        }
        if rebased {
            return GuardDecision::Redirect(normalized);
        }
        GuardDecision::Pass
    }

    fn locale_of<'a>(&'a self, path: &str) -> Option<&'a str> {
        self.locales
            .iter()
            .map(String::as_str)
            .find(|locale| {
                path.strip_prefix('/')
                    .and_then(|rest| rest.strip_prefix(locale))
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
    }
}

/// Applies [`RouteGuard`] to every request. Redirects are 307 and keep the
/// query string.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let has_token = get_access_cookie(&CookieJar::from_headers(request.headers())).is_some();
    match state.route_guard.decide(request.uri().path(), has_token) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(path) => {
            let target = match request.uri().query() {
                Some(query) => format!("{path}?{query}"),
                None => path,
            };
            tracing::debug!(from = %request.uri(), to = %target, "route guard redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}
