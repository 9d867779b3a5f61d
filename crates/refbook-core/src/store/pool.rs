//! Connection pooling for the catalog store.
//!
//! Every checkout hands out a dedicated SQLite connection, so concurrent
//! readers never share one. The pool lock is only held while popping or
//! pushing an idle connection.
//!
//! In-memory databases use SQLite's shared cache, where table locks are
//! reported as `SQLITE_LOCKED` at once and the busy timeout does not apply.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use tracing::trace;

use super::config::{StoreConfig, StoreLocation};
use crate::error::{Error, Result};

/// Distinguishes in-memory databases opened by the same process.
static MEMORY_DB_SEQ: AtomicU64 = AtomicU64::new(1);

/// Internal pool state.
struct PoolInner {
    config: StoreConfig,
    /// Path or URI handed to `Connection::open_with_flags`.
    target: String,
    flags: OpenFlags,
    idle: Mutex<Vec<Connection>>,
    /// Keeps a shared-cache in-memory database alive between checkouts.
    _anchor: Option<Mutex<Connection>>,
}

impl PoolInner {
    fn open_connection(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(&self.target, self.flags)?;
        conn.busy_timeout(self.config.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    fn acquire(&self) -> Result<Connection> {
        if let Some(conn) = self.idle.lock().pop() {
            return Ok(conn);
        }
        trace!(target = %self.target, "opening new store connection");
        self.open_connection()
    }

    fn release(&self, conn: Connection) {
        let mut idle = self.idle.lock();
        if idle.len() < self.config.max_idle {
            idle.push(conn);
        }
        // Pool is full, the connection is closed on drop.
    }
}

/// A pooled connection that returns itself to the pool when dropped.
pub struct PooledConnection {
    connection: Option<Connection>,
    pool: Arc<PoolInner>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only taken in `drop`.
        self.connection
            .as_ref()
            .unwrap_or_else(|| unreachable!("pooled connection used after release"))
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.connection.take() {
            self.pool.release(conn);
        }
    }
}

/// A pool of SQLite connections to one catalog database.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Create a pool for the configured location.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let base_flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let (target, flags) = match &config.location {
            StoreLocation::File(path) => {
                let target = path
                    .to_str()
                    .ok_or_else(|| {
                        Error::Pool(format!("database path is not valid UTF-8: {}", path.display()))
                    })?
                    .to_string();
                (target, base_flags)
            }
            StoreLocation::Memory => {
                let seq = MEMORY_DB_SEQ.fetch_add(1, Ordering::Relaxed);
                let target = format!(
                    "file:refbook-{}-{}?mode=memory&cache=shared",
                    std::process::id(),
                    seq
                );
                (target, base_flags | OpenFlags::SQLITE_OPEN_URI)
            }
        };

        let mut inner = PoolInner {
            config,
            target,
            flags,
            idle: Mutex::new(Vec::new()),
            _anchor: None,
        };

        match inner.config.location {
            StoreLocation::Memory => {
                let anchor = inner.open_connection()?;
                inner._anchor = Some(Mutex::new(anchor));
            }
            StoreLocation::File(_) => {
                // WAL lets readers proceed while the admin process writes.
                let conn = inner.open_connection()?;
                let mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                trace!(journal_mode = %mode, "configured store journal");
                inner.release(conn);
            }
        }

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Check out a connection.
    pub fn get(&self) -> Result<PooledConnection> {
        let conn = self.inner.acquire()?;
        Ok(PooledConnection {
            connection: Some(conn),
            pool: self.inner.clone(),
        })
    }

    /// Number of idle connections currently held.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().len()
    }
}
