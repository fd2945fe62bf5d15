//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod console;
pub mod forward;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes every `/api` route: session, relay, and console endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(forward::routes())
        .nest("/api/console", console::routes())
}
