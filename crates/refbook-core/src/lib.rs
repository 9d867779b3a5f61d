//! Refbook Core - versioned reference-book catalog.
//!
//! This crate stores catalogs, their dated versions and per-version entries,
//! resolves which version of a catalog applies to a request, and answers the
//! read queries served by the gateway.

pub mod clock;
pub mod error;
pub mod model;
pub mod query;
pub mod resolve;
pub mod store;

pub use clock::{local_clock, Clock, FixedClock, LocalClock, SharedClock};
pub use error::{Error, Result};
pub use model::{
    limits, Catalog, CatalogEntry, CatalogId, CatalogOverview, CatalogSummary, CatalogVersion,
    EntryView, NewCatalog, NewEntry, NewVersion, VersionId,
};
pub use query::{CatalogQueryService, EntryQueryService, QueryServices};
pub use resolve::{current_version, VersionResolver, VersionSelector};
pub use store::{CatalogStore, StoreConfig, StoreLocation};
