//! # vigil-api — Operator API for the Vigil Stack
//!
//! HTTP surface over the enforcement engine. The external case registry
//! registers cases here; operators inspect countdowns, force out-of-cycle
//! checks, control the monitoring scheduler, and pull the audit trail the
//! regulator asks for.
//!
//! ## API Surface
//!
//! | Prefix             | Module                  | Domain                      |
//! |--------------------|-------------------------|-----------------------------|
//! | `/v1/cases/*`      | [`routes::cases`]       | Case lifecycle + audit      |
//! | `/v1/scheduler/*`  | [`routes::scheduler`]   | Monitoring loop control     |
//! | `/v1/openapi.json` | [`openapi`]             | Contract document (no auth) |
//! | `/health/*`        | —                       | Probes (no auth)            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and the OpenAPI document are mounted outside
/// the auth middleware so probes and integrators need no credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::cases::router())
        .merge(routes::scheduler::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .with_state(state.clone());

    // Unauthenticated health probes and contract document.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));
    let contract = openapi::router().with_state(state);

    Router::new().merge(health).merge(contract).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
