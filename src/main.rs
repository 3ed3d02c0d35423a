//! Fruit Gateway - REST API for a fruit catalog and ordering service

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fruit_gateway::identity::{bootstrap_admins, JwtIdentityProvider};
use fruit_gateway::store::{MemoryStore, Seed};
use fruit_gateway::{create_router, AppState, Collections, Config};

/// Main entry point for the gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the document store, loading the seed file if one is configured
/// 4. Build the identity provider and grant configured admins their claim
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to info for this crate and tower_http, override with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fruit_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fruit Gateway");

    let config = Config::from_env();
    config.validate()?;
    let collections = Collections::for_mode(config.production);
    info!(
        "Configuration loaded: port={}, production={}, fruits={}, variants={}, token_ttl={}s",
        config.server_port,
        config.production,
        collections.fruits,
        collections.variants,
        config.auth_token_ttl
    );

    let store = match &config.seed_file {
        Some(path) => {
            let seed = Seed::from_path(path)?;
            info!("Loaded {} seed documents from {}", seed.len(), path.display());
            MemoryStore::with_seed(seed)
        }
        None => MemoryStore::new(),
    };

    let identity = JwtIdentityProvider::new(&config.auth_token_secret, config.auth_token_ttl);
    bootstrap_admins(&identity, &config.admin_uids)
        .await
        .context("granting admin claims")?;

    let state = AppState::from_config(&config, Arc::new(store), Arc::new(identity));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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
