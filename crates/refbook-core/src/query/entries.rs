//! Entry listing and existence checks.

use tracing::debug;

use super::criteria::{apply_entry_filters, EntryCriteria, EntryFilters};
use crate::error::Result;
use crate::model::{CatalogId, CatalogVersion, EntryView};
use crate::resolve::VersionResolver;
use crate::store::CatalogStore;

/// Reads entries of the version that applies to a request.
#[derive(Clone)]
pub struct EntryQueryService {
    store: CatalogStore,
    resolver: VersionResolver,
}

impl EntryQueryService {
    pub fn new(store: CatalogStore, resolver: VersionResolver) -> Self {
        Self { store, resolver }
    }

    /// Entries of `catalog_id` at `version`, or at the current version when
    /// no label is given. Empty when no version applies.
    pub fn list_entries(&self, catalog_id: CatalogId, version: Option<&str>) -> Result<Vec<EntryView>> {
        let criteria = self.criteria(catalog_id, version);
        let Some(resolved) = self.resolve(&criteria)? else {
            return Ok(Vec::new());
        };

        let entries = self.store.entries(resolved.id)?;
        debug!(
            catalog_id,
            version = %resolved.version,
            count = entries.len(),
            "listed catalog entries"
        );
        Ok(entries)
    }

    /// Whether the applicable version holds exactly `code` with `value`.
    /// False when no version applies.
    pub fn exists_entry(
        &self,
        catalog_id: CatalogId,
        code: &str,
        value: &str,
        version: Option<&str>,
    ) -> Result<bool> {
        let criteria = self.criteria(catalog_id, version);
        match self.resolve(&criteria)? {
            Some(resolved) => self.store.entry_exists(resolved.id, code, value),
            None => Ok(false),
        }
    }

    fn resolve(&self, criteria: &EntryCriteria) -> Result<Option<CatalogVersion>> {
        self.resolver
            .resolve_selector(criteria.catalog_id, &criteria.selector)
    }

    fn criteria(&self, catalog_id: CatalogId, version: Option<&str>) -> EntryCriteria {
        apply_entry_filters(
            EntryCriteria::current(catalog_id, self.resolver.today()),
            EntryFilters {
                version: version.map(str::to_string),
            },
        )
    }
}
