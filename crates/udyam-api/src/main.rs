//! # udyam-api: Binary Entry Point
//!
//! Starts the Axum HTTP server on `0.0.0.0:$PORT` (default 5000) and shuts
//! down gracefully on Ctrl-C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use udyam_api::state::{AppConfig, AppState};
use udyam_postal_client::{PostalClient, PostalConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);

    let postal_config = PostalConfig::from_env()?;
    tracing::info!(
        base_url = %postal_config.base_url,
        timeout = ?postal_config.timeout,
        max_retries = postal_config.retry.max_retries,
        "postal lookup client configured"
    );
    let resolver = Arc::new(PostalClient::new(postal_config)?);

    let port = config.port;
    let environment = config.environment;
    let state = AppState::new(config, resolver).map_err(|e| {
        tracing::error!("Failed to initialize application state: {e}");
        e
    })?;
    if state.step_order.is_some() {
        tracing::info!("step-order enforcement enabled");
    }

    let app = udyam_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(environment = environment.as_str(), "Udyam API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
