//! Disk Response Cache - demo server
//!
//! Serves a couple of demo routes through the disk response cache.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use disk_response_cache::api::create_router;
use disk_response_cache::{spawn_sweep_task, AppState, Config};

/// Main entry point for the demo server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the disk cache (fails fast if the directory is unusable)
/// 4. Start the periodic sweep task, if configured
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disk_response_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Disk Response Cache demo server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_dir={}, grace_period={}, cache_ttl={}s, sweep_interval={}s, port={}",
        config.cache_dir.display(),
        config
            .grace_period
            .map_or_else(|| "unset".to_string(), |secs| format!("{}s", secs)),
        config.cache_ttl,
        config.sweep_interval,
        config.server_port
    );

    let state = AppState::from_config(&config).context("Failed to open disk cache")?;

    // Without a periodic sweep, expired files are only removed on writes
    let sweep_handle = if config.sweep_interval > 0 {
        let handle = spawn_sweep_task(
            state.store.clone(),
            Duration::from_secs(config.sweep_interval),
        );
        info!("Periodic sweep task started");
        Some(handle)
    } else {
        info!("Periodic sweep disabled, sweeping on writes only");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Sweep task aborted");
    }
}
