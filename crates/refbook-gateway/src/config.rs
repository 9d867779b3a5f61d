//! Gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use refbook_core::StoreConfig;

/// Refbook HTTP/JSON gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "refbook-gateway")]
#[command(about = "HTTP/JSON API for the versioned reference-book catalog")]
#[command(version)]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Path to the catalog database. An empty in-memory database is used when omitted.
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Maximum number of idle store connections kept for reuse.
    #[arg(long, default_value_t = 8)]
    pub max_idle_connections: usize,

    /// Time (ms) a store connection waits on a locked database.
    #[arg(long, default_value_t = 5_000)]
    pub busy_timeout_ms: u64,

    /// Per-request timeout (ms) enforced at the gateway.
    #[arg(long, default_value_t = 30_000)]
    pub request_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Catalog database file; in-memory when `None`.
    pub database: Option<PathBuf>,
    /// Maximum number of idle store connections.
    pub max_idle_connections: usize,
    /// Busy timeout for store connections.
    pub busy_timeout: Duration,
    /// Per-request timeout enforced at the gateway.
    pub request_timeout: Duration,
    /// Default log filter directive.
    pub log_level: String,
}

impl GatewayConfig {
    /// Store configuration derived from the gateway settings.
    pub fn store_config(&self) -> StoreConfig {
        let config = match &self.database {
            Some(path) => StoreConfig::file(path),
            None => StoreConfig::memory(),
        };
        config
            .with_max_idle(self.max_idle_connections)
            .with_busy_timeout(self.busy_timeout)
    }

    /// Tracing filter used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> String {
        format!(
            "refbook_gateway={level},refbook_core={level},tower_http=info",
            level = self.log_level
        )
    }
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            database: args.database.clone(),
            max_idle_connections: args.max_idle_connections,
            busy_timeout: Duration::from_millis(args.busy_timeout_ms),
            request_timeout: Duration::from_millis(args.request_timeout_ms),
            log_level: args.log_level.clone(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database: None,
            max_idle_connections: 8,
            busy_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
        }
    }
}
