//! Catalog listings.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use super::criteria::{apply_catalog_filters, CatalogCriteria, CatalogFilters};
use crate::clock::SharedClock;
use crate::error::Result;
use crate::model::{CatalogId, CatalogOverview, CatalogSummary, CatalogVersion};
use crate::resolve::current_version;
use crate::store::CatalogStore;

/// Lists catalogs, optionally limited to those with data by a date.
#[derive(Clone)]
pub struct CatalogQueryService {
    store: CatalogStore,
    clock: SharedClock,
}

impl CatalogQueryService {
    pub fn new(store: CatalogStore, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// All catalogs ascending by id. With `as_of`, only catalogs that have
    /// at least one version effective on or before it, each listed once.
    pub fn list_catalogs(&self, as_of: Option<NaiveDate>) -> Result<Vec<CatalogSummary>> {
        let criteria =
            apply_catalog_filters(CatalogCriteria::default(), &CatalogFilters { date: as_of });
        let catalogs = self.store.catalogs(&criteria)?;
        debug!(?as_of, count = catalogs.len(), "listed catalogs");
        Ok(catalogs)
    }

    /// Every catalog with the version current on `as_of` (default today).
    pub fn overview(&self, as_of: Option<NaiveDate>) -> Result<Vec<CatalogOverview>> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        let catalogs = self.store.catalogs(&CatalogCriteria::default())?;

        let mut by_catalog: HashMap<CatalogId, Vec<CatalogVersion>> = HashMap::new();
        for version in self.store.all_versions()? {
            by_catalog.entry(version.catalog_id).or_default().push(version);
        }

        let overview = catalogs
            .into_iter()
            .map(|catalog| {
                let current = by_catalog
                    .get(&catalog.id)
                    .and_then(|versions| current_version(versions, as_of));
                CatalogOverview {
                    id: catalog.id,
                    code: catalog.code,
                    name: catalog.name,
                    current_version: current.map(|v| v.version.clone()),
                    version_date: current.map(|v| v.effective_date),
                }
            })
            .collect();
        Ok(overview)
    }
}
