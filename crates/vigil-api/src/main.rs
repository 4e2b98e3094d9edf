//! # vigil-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Vigil operator API.
//! Binds to a configurable port (default 8080).

use vigil_api::state::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("VIGIL_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let auth_token = std::env::var("VIGIL_AUTH_TOKEN").ok();
    if auth_token.is_none() {
        tracing::warn!("VIGIL_AUTH_TOKEN not set — authentication disabled");
    }
    let config = AppConfig { port, auth_token };

    // Bootstrap: load the calendar and wire the enforcement stack.
    let state = vigil_api::bootstrap::bootstrap(config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    // The monitoring loop sweeps from the start; operators can stop and
    // restart it over the API.
    state.monitor.start().map_err(|e| {
        tracing::error!("Scheduler start failed: {e}");
        e
    })?;

    let app = vigil_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Vigil API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
