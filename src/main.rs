use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use food_order_api::config::AppConfig;
use food_order_api::database::{DocumentStore, MemoryStore, PgDocumentStore};
use food_order_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "food-order-api", about = "Food ordering REST backend")]
struct Args {
    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Listen address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Keep documents in process memory instead of PostgreSQL
    #[arg(long, env = "FOOD_API_MEMORY_STORE")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, ACCESS_TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    config.validate()?;
    tracing::info!("Starting food order API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = if args.memory {
        tracing::warn!("Using in-memory document store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let store = PgDocumentStore::connect(&config)
            .await
            .context("failed to connect document store")?;
        store.ping().await.context("document store ping failed")?;
        tracing::info!("Pinged document store, connection is healthy");
        Arc::new(store)
    };

    let router = app(&config, AppState::new(&config, store.clone()));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Food order API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
