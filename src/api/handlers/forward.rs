//! Catch-all relay from `/api/admin/<path>` to the backend's
//! `/v1/admin/<path>`.

use axum::body::Bytes;
use axum::extract::{OriginalUri, RawQuery, State};
use axum::http::Method;
use axum::routing::{MethodRouter, get};
use axum::{Json, Router};
use serde_json::Value;

use crate::app_state::AppState;
use crate::error::{BffError, ErrorResponse};
use crate::session::AccessToken;

const ADMIN_ROUTE: &str = "/api/admin";

/// `GET|POST|PATCH|PUT|DELETE /api/admin/{*path}` — Relay to the backend.
///
/// The request body is forwarded when it is valid JSON and the method is
/// not `GET`; anything else goes out without a body. Segments are taken
/// from the raw request path, so an encoded `/` stays inside its segment.
///
/// # Errors
///
/// Returns [`BffError::InvalidRequest`] for an empty path, the backend's
/// error with its status, or 502 when the backend is unreachable.
#[utoipa::path(
    get,
    path = "/api/admin/{path}",
    tag = "Forward",
    summary = "Relay an admin call",
    description = "Forwards the call to `/v1/admin/{path}` with the session token as a bearer token and the query string unchanged. Also accepts POST, PATCH, PUT and DELETE.",
    params(
        ("path" = String, Path, description = "Admin API path, may contain slashes"),
    ),
    request_body(content = Option<serde_json::Value>, description = "JSON body, ignored for GET"),
    responses(
        (status = 200, description = "Backend payload", body = serde_json::Value),
        (status = 400, description = "Empty path", body = ErrorResponse),
        (status = 502, description = "Backend unreachable", body = ErrorResponse),
    )
)]
pub async fn forward(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
    token: AccessToken,
    body: Bytes,
) -> Result<Json<Value>, BffError> {
    let payload = json_body(&method, &body);
    let data = state
        .console_service
        .forward(
            method,
            raw_admin_path(uri.path()),
            query.as_deref(),
            token.as_deref(),
            payload.as_ref(),
        )
        .await?;
    Ok(Json(data))
}

/// Still-encoded remainder after `/api/admin`.
fn raw_admin_path(path: &str) -> &str {
    path.strip_prefix(ADMIN_ROUTE).unwrap_or_default()
}

/// JSON body for non-GET calls; empty or invalid JSON sends nothing.
fn json_body(method: &Method, body: &[u8]) -> Option<Value> {
    if *method == Method::GET || body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

fn rest_verbs<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    get(handler.clone())
        .post(handler.clone())
        .patch(handler.clone())
        .put(handler.clone())
        .delete(handler)
}

/// Relay routes under `/api/admin`. Other methods answer 405.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(ADMIN_ROUTE, rest_verbs(forward))
        .route("/api/admin/", rest_verbs(forward))
        .route("/api/admin/{*path}", rest_verbs(forward))
}
