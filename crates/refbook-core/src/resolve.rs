//! Version resolution.
//!
//! Resolution picks the single version of a catalog that applies to a
//! request: the version with an exact label, or the version current on an
//! as-of date (latest effective date not after it). Resolution is always
//! scoped to one catalog.

use chrono::NaiveDate;
use tracing::debug;

use crate::clock::SharedClock;
use crate::error::Result;
use crate::model::{CatalogId, CatalogVersion};
use crate::store::CatalogStore;

/// How to pick a version of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The version with exactly this label.
    Label(String),
    /// The version current on this day.
    AsOf(NaiveDate),
}

impl VersionSelector {
    /// Build a selector from optional inputs; an explicit label wins, then
    /// the as-of date, then `today`.
    pub fn from_inputs(
        explicit_version: Option<&str>,
        as_of: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        match explicit_version {
            Some(label) => VersionSelector::Label(label.to_string()),
            None => VersionSelector::AsOf(as_of.unwrap_or(today)),
        }
    }
}

/// The version current on `as_of` among `versions`.
///
/// Versions after `as_of` are ignored; of the rest the one with the latest
/// effective date wins. Callers pass versions of a single catalog, whose
/// effective dates are unique.
pub fn current_version<'a, I>(versions: I, as_of: NaiveDate) -> Option<&'a CatalogVersion>
where
    I: IntoIterator<Item = &'a CatalogVersion>,
{
    versions
        .into_iter()
        .filter(|v| v.effective_date <= as_of)
        .max_by_key(|v| v.effective_date)
}

/// Resolves catalog versions against the store.
#[derive(Clone)]
pub struct VersionResolver {
    store: CatalogStore,
    clock: SharedClock,
}

impl VersionResolver {
    pub fn new(store: CatalogStore, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// Today according to the resolver's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Resolve the version of `catalog_id` for an optional label or date.
    ///
    /// `Ok(None)` means no version applies, which readers treat as "no data".
    pub fn resolve(
        &self,
        catalog_id: CatalogId,
        explicit_version: Option<&str>,
        as_of: Option<NaiveDate>,
    ) -> Result<Option<CatalogVersion>> {
        let selector = VersionSelector::from_inputs(explicit_version, as_of, self.today());
        self.resolve_selector(catalog_id, &selector)
    }

    /// Resolve the version of `catalog_id` picked by `selector`.
    pub fn resolve_selector(
        &self,
        catalog_id: CatalogId,
        selector: &VersionSelector,
    ) -> Result<Option<CatalogVersion>> {
        let resolved = match selector {
            VersionSelector::Label(label) => self.store.version_by_label(catalog_id, label)?,
            VersionSelector::AsOf(date) => self.store.latest_version(catalog_id, *date)?,
        };
        debug!(
            catalog_id,
            ?selector,
            resolved = ?resolved.as_ref().map(|v| v.version.as_str()),
            "resolved catalog version"
        );
        Ok(resolved)
    }
}
