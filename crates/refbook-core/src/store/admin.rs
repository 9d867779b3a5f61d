//! Administrative writes.
//!
//! Catalog data is maintained by an external administrative process; these
//! operations are its entry points and are never reached from the read API.

use rusqlite::params;
use tracing::debug;

use super::day::DayNumber;
use super::CatalogStore;
use crate::error::Result;
use crate::model::{
    Catalog, CatalogEntry, CatalogId, CatalogVersion, NewCatalog, NewEntry, NewVersion, VersionId,
};

impl CatalogStore {
    /// Insert a catalog. Fails with `Duplicate` if the code is taken.
    pub fn create_catalog(&self, new: NewCatalog) -> Result<Catalog> {
        new.validate()?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO catalog (code, name, description) VALUES (?1, ?2, ?3)",
            params![new.code, new.name, new.description],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, code = %new.code, "created catalog");

        Ok(Catalog {
            id,
            code: new.code,
            name: new.name,
            description: new.description,
        })
    }

    /// Insert a version of `catalog_id`.
    ///
    /// Fails with `Duplicate` when the catalog already has a version with the
    /// same label or the same effective date.
    pub fn create_version(&self, catalog_id: CatalogId, new: NewVersion) -> Result<CatalogVersion> {
        new.validate()?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO catalog_version (catalog_id, version, effective_date) VALUES (?1, ?2, ?3)",
            params![catalog_id, new.version, DayNumber(new.effective_date)],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, catalog_id, version = %new.version, effective_date = %new.effective_date, "created catalog version");

        Ok(CatalogVersion {
            id,
            catalog_id,
            version: new.version,
            effective_date: new.effective_date,
        })
    }

    /// Insert an entry into `version_id`. Fails with `Duplicate` if the code is taken.
    pub fn create_entry(&self, version_id: VersionId, new: NewEntry) -> Result<CatalogEntry> {
        new.validate()?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO catalog_entry (version_id, code, value) VALUES (?1, ?2, ?3)",
            params![version_id, new.code, new.value],
        )?;

        Ok(CatalogEntry {
            id: conn.last_insert_rowid(),
            version_id,
            code: new.code,
            value: new.value,
        })
    }

    /// Delete a catalog with its versions and entries.
    pub fn delete_catalog(&self, id: CatalogId) -> Result<bool> {
        let deleted = self
            .connection()?
            .execute("DELETE FROM catalog WHERE id = ?1", params![id])?;
        debug!(id, deleted, "deleted catalog");
        Ok(deleted > 0)
    }

    /// Delete a version with its entries.
    pub fn delete_version(&self, id: VersionId) -> Result<bool> {
        let deleted = self
            .connection()?
            .execute("DELETE FROM catalog_version WHERE id = ?1", params![id])?;
        debug!(id, deleted, "deleted catalog version");
        Ok(deleted > 0)
    }
}
