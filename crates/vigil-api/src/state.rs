//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds the wired enforcement stack, nothing else:
//! - **Service** — the [`TimelineEnforcementService`] every case route
//!   delegates to.
//! - **Monitor** — the [`ComplianceMonitor`] behind the scheduler routes;
//!   the same instance the background loop runs on, so manual checks and
//!   scheduled sweeps share one tick history.
//!
//! Case data itself lives behind the service's `ContextStore`; the API
//! layer never touches the store directly.

use std::sync::Arc;

use vigil_engine::TimelineEnforcementService;
use vigil_monitor::ComplianceMonitor;

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token for operator authentication.
    /// If `None`, authentication is disabled.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The enforcement service all case operations delegate to.
    pub service: Arc<TimelineEnforcementService>,
    /// The monitoring scheduler controlled by the `/v1/scheduler` routes.
    pub monitor: Arc<ComplianceMonitor>,
    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Assemble application state from a wired service and monitor.
    ///
    /// The monitor must be built over the same service instance so manual
    /// checks and background sweeps observe one consistent case set.
    pub fn new(
        service: Arc<TimelineEnforcementService>,
        monitor: Arc<ComplianceMonitor>,
        config: AppConfig,
    ) -> Self {
        Self {
            service,
            monitor,
            config,
        }
    }
}
