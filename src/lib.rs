//! # admin-console-bff
//!
//! Backend-for-frontend for the platform's admin console.
//!
//! The console talks only to this service. It keeps the backend's bearer
//! token in an HTTP-only cookie, relays admin API calls with that token
//! attached, reshapes backend payloads into the view models the console
//! renders, and guards the console's page routes. All business rules stay
//! in the backend.
//!
//! ## Architecture
//!
//! ```text
//! Browser (console bundle, fetch)
//!     │
//!     ├── Route guard (guard/)           page redirects, cookie presence only
//!     │
//!     ├── /api/auth/*    (api/handlers/auth)     login, logout, me
//!     ├── /api/admin/*   (api/handlers/forward)  verbatim relay
//!     ├── /api/console/* (api/handlers/console)  view models
//!     │        │
//!     │        ├── ConsoleService (service/)
//!     │        ├── Mappers (domain/)
//!     │        │
//!     │        └── BackendClient (backend/) ──▶ backend /v1/admin/*, /v1/auth/*
//!     │
//!     └── Static console bundle (tower-http ServeDir)
//! ```

pub mod api;
pub mod app_state;
pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod guard;
pub mod service;
pub mod session;

use axum::Router;
use axum::middleware;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the full application: API routes, console bundle fallback,
/// route guard, tracing, and CORS.
pub fn build_app(state: AppState) -> Router {
    let console_dir = state.config.console_dir.clone();
    let console = ServeDir::new(&console_dir).fallback(ServeFile::new(console_dir.join("index.html")));

    Router::new()
        .merge(api::build_router(&state))
        .fallback_service(console)
        .layer(middleware::from_fn_with_state(state.clone(), guard::route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
