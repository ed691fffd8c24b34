//! Beacon server binary.

use anyhow::{Context, Result};
use beacon_auth::SessionSigner;
use beacon_core::config::AppConfig;
use beacon_server::{AppState, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Beacon v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env().context("failed to load configuration")?;

    // The session key is loaded exactly once; a missing or unparsable key
    // aborts startup.
    let key_pem = tokio::fs::read_to_string(&config.session_key_path)
        .await
        .with_context(|| {
            format!(
                "failed to read session key: {}",
                config.session_key_path.display()
            )
        })?;
    let sessions = SessionSigner::from_pem(&key_pem).context("failed to parse session key")?;

    let bind = config.bind.clone();
    let state = AppState::new(config, sessions);
    state.initialize().await;

    let addr: SocketAddr = bind.parse().context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, create_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.finalize().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
