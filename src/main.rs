/// Main application entry point with clean architecture
mod config;
mod domain;
mod ephemeris;
mod errors;
mod handlers;
mod query;
mod responses;
mod routes;
mod services;
mod utils;

use crate::config::AppConfig;
use crate::ephemeris::Almanac;
use crate::handlers::AppState;
use crate::routes::build_router;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        latest = %config.api_version_latest,
        origins = config.cors_allowed_origins.len(),
        "Configuration loaded successfully"
    );

    // Initialize application state
    let state = AppState::new(Arc::new(Almanac::new()), &config.api_version_latest);

    // Build router
    let app = build_router(state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("rust_sky service listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("rust_sky service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
