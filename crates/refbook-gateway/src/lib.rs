//! Refbook HTTP/JSON Gateway.
//!
//! This crate serves the versioned reference-book catalog over HTTP: catalog
//! listings, per-version entry listings and entry existence checks.

pub mod config;
pub mod error;
pub mod json;
pub mod params;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::{AppError, FieldErrors};

use axum::Router;
use refbook_core::{CatalogStore, QueryServices, SharedClock};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Catalog store.
    pub store: CatalogStore,
    /// Read services over the store.
    pub services: QueryServices,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: CatalogStore, clock: SharedClock, config: GatewayConfig) -> Self {
        Self {
            services: QueryServices::new(store.clone(), clock),
            store,
            config,
        }
    }

    /// Run a blocking read against the services on the blocking thread pool,
    /// bounded by the configured request timeout.
    pub async fn execute_read<T, F>(&self, read: F) -> Result<T, AppError>
    where
        F: FnOnce(&QueryServices) -> refbook_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let services = self.services.clone();
        let task = tokio::task::spawn_blocking(move || read(&services));

        match tokio::time::timeout(self.config.request_timeout, task).await {
            Err(_) => Err(AppError::Timeout),
            Ok(Err(join_error)) => Err(AppError::Internal(join_error.to_string())),
            Ok(Ok(result)) => Ok(result?),
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::refbooks::routes())
        .merge(routes::openapi::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
