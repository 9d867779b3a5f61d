//! Read-side services over the catalog store.

pub mod catalogs;
pub mod criteria;
pub mod entries;

pub use catalogs::CatalogQueryService;
pub use criteria::{
    apply_catalog_filters, apply_entry_filters, CatalogCriteria, CatalogFilters, EntryCriteria,
    EntryFilters,
};
pub use entries::EntryQueryService;

use crate::clock::SharedClock;
use crate::resolve::VersionResolver;
use crate::store::CatalogStore;

/// The read services sharing one store and one clock.
#[derive(Clone)]
pub struct QueryServices {
    pub resolver: VersionResolver,
    pub entries: EntryQueryService,
    pub catalogs: CatalogQueryService,
}

impl QueryServices {
    pub fn new(store: CatalogStore, clock: SharedClock) -> Self {
        let resolver = VersionResolver::new(store.clone(), clock.clone());
        Self {
            entries: EntryQueryService::new(store.clone(), resolver.clone()),
            catalogs: CatalogQueryService::new(store, clock),
            resolver,
        }
    }
}
