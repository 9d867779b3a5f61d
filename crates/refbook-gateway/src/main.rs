//! Refbook HTTP/JSON Gateway binary.

use clap::Parser;
use refbook_core::{local_clock, CatalogStore};
use refbook_gateway::{create_router, AppState, Args, GatewayConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        listen = %config.listen_addr,
        database = ?config.database,
        "Starting Refbook Gateway"
    );

    if config.database.is_none() {
        warn!("no --database given, serving an empty in-memory catalog");
    }

    // Open the catalog store
    let store = CatalogStore::open(config.store_config())?;
    info!(
        max_idle_connections = config.max_idle_connections,
        request_timeout_ms = config.request_timeout.as_millis(),
        "Catalog store ready"
    );

    // Create application state
    let state = AppState::new(store, local_clock(), config.clone());

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
