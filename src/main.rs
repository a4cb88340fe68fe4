//! Skin Proxy - A caching edge proxy for Minecraft player data
//!
//! Binary entry point: wires configuration, cache tiers and the router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skin_proxy::cache::{MemoryDurableCache, MemoryEdgeCache};
use skin_proxy::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the durable and edge cache stores
/// 4. Start one expiry sweep per store
/// 5. Build application state and router
/// 6. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skin_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skin Proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, username_ttl={}s, profile_ttl={}s, skin_ttl={}s, whitelisted_origins={}",
        config.server_port,
        config.username_ttl,
        config.profile_ttl,
        config.skin_ttl,
        config.origin_whitelist.len()
    );

    let durable = MemoryDurableCache::new(config.max_entries);
    let edge = MemoryEdgeCache::new(config.max_entries);

    let sweeps = vec![
        spawn_cleanup_task(durable.store(), "durable", config.cleanup_interval),
        spawn_cleanup_task(edge.store(), "edge", config.cleanup_interval),
    ];

    let state = AppState::from_config(&config, Arc::new(durable), Arc::new(edge))
        .context("failed to build application state")?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeps))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the expiry sweeps.
async fn shutdown_signal(sweeps: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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

    for sweep in sweeps {
        sweep.abort();
    }
    warn!("Expiry sweeps aborted");
}
