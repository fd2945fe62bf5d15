//! REST API layer: route handlers, DTOs, OpenAPI, and router composition.
//!
//! Session endpoints live under `/api/auth`, the verbatim relay under
//! `/api/admin`, and normalized console endpoints under `/api/console`.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::{Router, middleware};

use crate::app_state::AppState;
use crate::session::clear_session_on_unauthorized;

/// Builds the complete API router: `/api/*` plus the system routes.
///
/// Any 401 leaving `/api/*` also expires the session cookies.
pub fn build_router(state: &AppState) -> Router<AppState> {
    let api = handlers::routes().layer(middleware::from_fn_with_state(
        state.clone(),
        clear_session_on_unauthorized,
    ));
    Router::new().merge(api).merge(handlers::system::routes())
}
