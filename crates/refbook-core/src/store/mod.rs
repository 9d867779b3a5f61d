//! Durable catalog storage on SQLite.
//!
//! The store owns the relational schema and a connection pool. Read methods
//! here are single statements; administrative writes live in `admin`.

mod admin;
pub mod config;
mod day;
pub mod pool;
pub mod schema;

pub use config::{StoreConfig, StoreLocation};
pub use pool::{ConnectionPool, PooledConnection};

use day::DayNumber;

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use crate::error::Result;
use crate::model::{CatalogId, CatalogSummary, CatalogVersion, EntryView, VersionId};
use crate::query::criteria::CatalogCriteria;

const VERSION_COLUMNS: &str = "id, catalog_id, version, effective_date";

/// Handle to the catalog database. Cheap to clone.
#[derive(Clone)]
pub struct CatalogStore {
    pool: ConnectionPool,
}

impl CatalogStore {
    /// Open the store and bring its schema up to date.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let location = config.location.clone();
        let pool = ConnectionPool::new(config)?;
        let conn = pool.get()?;
        schema::migrate(&conn)?;
        info!(?location, "catalog store opened");
        Ok(Self { pool })
    }

    /// Open a private in-memory store.
    pub fn in_memory() -> Result<Self> {
        Self::open(StoreConfig::memory())
    }

    /// Check out a pooled connection.
    pub fn connection(&self) -> Result<PooledConnection> {
        self.pool.get()
    }

    /// Verify the database answers a trivial query.
    pub fn ping(&self) -> Result<()> {
        self.connection()?.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    /// Catalog summaries matching `criteria`, ascending by id.
    pub fn catalogs(&self, criteria: &CatalogCriteria) -> Result<Vec<CatalogSummary>> {
        let conn = self.connection()?;
        let rows = match criteria.effective_on_or_before {
            None => {
                let mut stmt =
                    conn.prepare_cached("SELECT id, code, name FROM catalog ORDER BY id")?;
                let rows = stmt.query_map([], summary_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            Some(date) => {
                // EXISTS keeps one row per catalog however many versions qualify.
                let mut stmt = conn.prepare_cached(
                    "SELECT c.id, c.code, c.name FROM catalog c \
                     WHERE EXISTS ( \
                         SELECT 1 FROM catalog_version v \
                         WHERE v.catalog_id = c.id AND v.effective_date <= ?1 \
                     ) \
                     ORDER BY c.id",
                )?;
                let rows = stmt.query_map(params![DayNumber(date)], summary_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(rows)
    }

    /// The version of `catalog_id` labelled exactly `label`.
    pub fn version_by_label(
        &self,
        catalog_id: CatalogId,
        label: &str,
    ) -> Result<Option<CatalogVersion>> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM catalog_version WHERE catalog_id = ?1 AND version = ?2"
        );
        let version = conn
            .prepare_cached(&sql)?
            .query_row(params![catalog_id, label], version_from_row)
            .optional()?;
        Ok(version)
    }

    /// The version of `catalog_id` with the latest effective date not after `as_of`.
    pub fn latest_version(
        &self,
        catalog_id: CatalogId,
        as_of: NaiveDate,
    ) -> Result<Option<CatalogVersion>> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM catalog_version \
             WHERE catalog_id = ?1 AND effective_date <= ?2 \
             ORDER BY effective_date DESC LIMIT 1"
        );
        let version = conn
            .prepare_cached(&sql)?
            .query_row(params![catalog_id, DayNumber(as_of)], version_from_row)
            .optional()?;
        Ok(version)
    }

    /// Every version in the store, grouped by catalog and oldest first.
    pub fn all_versions(&self) -> Result<Vec<CatalogVersion>> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT {VERSION_COLUMNS} FROM catalog_version ORDER BY catalog_id, effective_date"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], version_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Entries of one version in insertion order.
    pub fn entries(&self, version_id: VersionId) -> Result<Vec<EntryView>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare_cached("SELECT code, value FROM catalog_entry WHERE version_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![version_id], |row| {
            Ok(EntryView {
                code: row.get(0)?,
                value: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Whether the version holds an entry with exactly this code and value.
    pub fn entry_exists(&self, version_id: VersionId, code: &str, value: &str) -> Result<bool> {
        let conn = self.connection()?;
        let exists: bool = conn.prepare_cached(
            "SELECT EXISTS ( \
                 SELECT 1 FROM catalog_entry \
                 WHERE version_id = ?1 AND code = ?2 AND value = ?3 \
             )",
        )?
        .query_row(params![version_id, code, value], |row| row.get(0))?;
        Ok(exists)
    }
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogSummary> {
    Ok(CatalogSummary {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
    })
}

fn version_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogVersion> {
    Ok(CatalogVersion {
        id: row.get(0)?,
        catalog_id: row.get(1)?,
        version: row.get(2)?,
        effective_date: row.get::<_, DayNumber>(3)?.0,
    })
}
