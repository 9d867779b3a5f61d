//! Request-scoped query criteria.
//!
//! Criteria are plain values. Each request starts from a base value and
//! refines it with its parameters before a single store read, so nothing is
//! shared between requests.

use chrono::NaiveDate;

use crate::model::CatalogId;
use crate::resolve::VersionSelector;

/// Filters applied to the catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogCriteria {
    /// Keep only catalogs with a version effective on or before this day.
    pub effective_on_or_before: Option<NaiveDate>,
}

/// Optional listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    pub date: Option<NaiveDate>,
}

/// Refine catalog criteria with request parameters.
pub fn apply_catalog_filters(base: CatalogCriteria, filters: &CatalogFilters) -> CatalogCriteria {
    match filters.date {
        Some(date) => CatalogCriteria {
            effective_on_or_before: Some(date),
        },
        None => base,
    }
}

/// Which version's entries to read: one catalog, one version selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCriteria {
    pub catalog_id: CatalogId,
    pub selector: VersionSelector,
}

impl EntryCriteria {
    /// Entries of the version of `catalog_id` current on `today`.
    pub fn current(catalog_id: CatalogId, today: NaiveDate) -> Self {
        Self {
            catalog_id,
            selector: VersionSelector::AsOf(today),
        }
    }
}

/// Optional entry parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilters {
    /// Explicit version label; replaces date-based selection.
    pub version: Option<String>,
}

/// Refine entry criteria with request parameters.
pub fn apply_entry_filters(base: EntryCriteria, filters: EntryFilters) -> EntryCriteria {
    let selector = match filters.version {
        Some(label) => VersionSelector::Label(label),
        None => base.selector,
    };
    EntryCriteria {
        catalog_id: base.catalog_id,
        selector,
    }
}
