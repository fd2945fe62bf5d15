//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::ConsoleConfig;
use crate::error::BffError;
use crate::guard::RouteGuard;
use crate::service::ConsoleService;
use crate::session::CookieSettings;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<ConsoleConfig>,
    /// Console service for all backend calls.
    pub console_service: Arc<ConsoleService>,
    /// Page route rules.
    pub route_guard: Arc<RouteGuard>,
}

impl AppState {
    /// Wires the backend client, service, and guard from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BffError::Internal`] when the backend client cannot be
    /// built from the configured origin.
    pub fn from_config(config: ConsoleConfig) -> Result<Self, BffError> {
        let backend = BackendClient::new(&config.backend_base_url, &config.accept_language)?;
        let console_service = Arc::new(ConsoleService::new(backend, config.console_utc_offset));
        let route_guard = Arc::new(RouteGuard::from_config(&config));
        Ok(Self {
            config: Arc::new(config),
            console_service,
            route_guard,
        })
    }

    /// Cookie attributes derived from the configuration.
    #[must_use]
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings::from_config(&self.config)
    }
}
