//! Catalog store configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default number of idle connections kept in the pool.
pub const DEFAULT_MAX_IDLE: usize = 8;

/// Default SQLite busy timeout.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the catalog database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Database file on disk, created if missing.
    File(PathBuf),
    /// Private in-memory database, dropped with the store.
    ///
    /// Connections share one cache with table-level locking: a read of a
    /// table that an open write transaction has modified fails with
    /// `SQLITE_LOCKED` instead of waiting out the busy timeout. Use a file
    /// database when admin writes run alongside readers.
    Memory,
}

/// Configuration for opening a [`CatalogStore`](super::CatalogStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database location.
    pub location: StoreLocation,
    /// Maximum number of idle connections retained for reuse.
    pub max_idle: usize,
    /// How long a connection waits on a locked database file.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Configuration for a database file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            ..Self::memory()
        }
    }

    /// Configuration for a private in-memory database.
    pub fn memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            max_idle: DEFAULT_MAX_IDLE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Set the idle connection limit.
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Set the busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}
