//! Mini KV - HTTP server
//!
//! Serves a `KvStore` over a small JSON API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_kv::api::{create_router, AppState};
use mini_kv::Config;

/// Main entry point for the Mini KV server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the store, which starts the background reaper
/// 4. Create Axum router with all endpoints
/// 5. Serve until SIGINT/SIGTERM, then stop the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_kv=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini KV server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, cleanup_interval={}ms, shutdown_grace={}ms, port={}",
        config.max_entries, config.cleanup_interval_ms, config.shutdown_grace_ms, config.server_port
    );

    let state = AppState::from_config(&config).context("failed to create store")?;
    let store = state.store.clone();

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
