//! Session endpoints: login, logout, current admin.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use url::form_urlencoded;

use crate::api::dto::{LoginRequest, LogoutForm, OkResponse};
use crate::app_state::AppState;
use crate::error::{BffError, ErrorResponse};
use crate::session::{AccessToken, clear_access_cookie, set_access_cookie};

/// `POST /api/auth/login` — Exchange credentials for a session cookie.
///
/// The body is read leniently: anything that is not a JSON object counts
/// as empty and fails the credential check.
///
/// # Errors
///
/// Returns [`BffError::InvalidRequest`] for missing credentials,
/// [`BffError::MissingAccessToken`] when the backend returns no token, or
/// the backend's own error.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Logs in by email when the identifier contains `@`, by username otherwise. On success the backend token is stored in an HTTP-only `token` cookie.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = OkResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Rejected by the backend", body = ErrorResponse),
        (status = 502, description = "Backend unreachable or returned no token", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<impl IntoResponse, BffError> {
    let request: LoginRequest = serde_json::from_slice(&body).unwrap_or_default();
    let token = state
        .console_service
        .login(&request.identifier(), request.password())
        .await?;
    let jar = set_access_cookie(jar, &token, state.cookie_settings());
    Ok((jar, Json(OkResponse::OK)))
}

/// `POST /api/auth/logout` — Drop the session cookie.
///
/// JSON callers get `{ "ok": true }`; a plain form post is redirected to
/// the login page of the posted `locale`.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "Log out",
    description = "Clears the session cookies. Answers JSON when the request is JSON, otherwise 303 to `/<locale>/admin/login`.",
    request_body(content = String, content_type = "application/x-www-form-urlencoded", description = "Optional `locale=<xx>` form"),
    responses(
        (status = 200, description = "Session cleared", body = OkResponse),
        (status = 303, description = "Session cleared, redirect to login"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let jar = clear_access_cookie(jar, state.cookie_settings());
    tracing::info!("admin logged out");

    if wants_json(&headers) {
        return (jar, Json(OkResponse::OK)).into_response();
    }

    let form = LogoutForm {
        locale: form_urlencoded::parse(&body)
            .find(|(key, _)| key == "locale")
            .map(|(_, value)| value.into_owned()),
    };
    let target = format!("/{}/admin/login", form.locale());
    (jar, Redirect::to(&target)).into_response()
}

/// `GET /api/auth/me` — Current admin profile.
///
/// # Errors
///
/// Returns the backend's error, typically 401 without a session.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current admin",
    description = "Returns the backend's profile of the signed-in admin unchanged.",
    responses(
        (status = 200, description = "Admin profile", body = serde_json::Value),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    token: AccessToken,
) -> Result<Json<Value>, BffError> {
    let profile = state.console_service.me(token.as_deref()).await?;
    Ok(Json(profile))
}

fn wants_json(headers: &HeaderMap) -> bool {
    [ACCEPT, CONTENT_TYPE].iter().any(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"))
    })
}

/// Session routes under `/api/auth`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}
