//! HTTP server for the affiliate review site: webhook ingestion, the read API
//! consumed by the frontend, and the prebuilt frontend bundle itself.

mod auth;
mod config;
mod error;
mod handlers;
mod request_context;
mod routes;
mod state;

use std::{env, path::PathBuf};

use affiliate_shared::{logging, store};
use anyhow::{Context, Result};
use tokio::signal;

use crate::config::{ApiKeySource, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let log_dir = env::var_os("LOG_DIR").map(PathBuf::from);
    let _log_guard = logging::init_tracing(
        "info",
        log_dir.as_deref(),
        "affiliate-backend",
        std::io::stdout,
    )?;

    let config = Config::from_env()?;

    tracing::info!("Starting affiliate backend server");
    tracing::info!("Storage: {}", config.store);
    tracing::info!("Static directory: {}", config.static_dir.display());
    match config.api_key.source() {
        ApiKeySource::Environment => tracing::info!("Webhook API key loaded from WEBHOOK_API_KEY"),
        ApiKeySource::File(path) => {
            tracing::info!("Webhook API key loaded from {}", path.display())
        },
        ApiKeySource::Generated(path) => tracing::warn!(
            "Generated webhook API key {} and saved it to {}; set WEBHOOK_API_KEY to pin it",
            config.api_key.secret(),
            path.display()
        ),
    }
    if !config.static_dir.join("index.html").exists() {
        tracing::warn!(
            "No index.html in {}; client routes will return 404 until the frontend is built",
            config.static_dir.display()
        );
    }

    let store = store::open_store(&config.store)
        .await
        .context("failed to open content store")?;
    let stats = store.stats().await.context("failed to query content store")?;
    tracing::info!("Loaded {} posts and {} products", stats.posts, stats.products);

    let app_state = state::AppState::new(store, config.api_key.clone());
    let app = routes::create_router(app_state, &config.static_dir);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Webhook endpoint: http://{}/api/receive-post", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
