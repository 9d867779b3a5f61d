//! JSON response types for the HTTP gateway.
//!
//! Collections are returned whole under a named key, never in a paginated
//! `results` envelope.

use chrono::NaiveDate;
use refbook_core::{CatalogOverview, CatalogSummary, EntryView};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Gateway version.
    pub version: String,
    /// Whether the catalog store answers queries.
    pub store_connected: bool,
}

/// `GET /refbooks` response.
#[derive(Debug, Serialize)]
pub struct RefbookListResponse {
    pub refbooks: Vec<RefbookJson>,
}

/// Catalog in a listing.
#[derive(Debug, Serialize)]
pub struct RefbookJson {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl From<CatalogSummary> for RefbookJson {
    fn from(summary: CatalogSummary) -> Self {
        Self {
            id: summary.id,
            code: summary.code,
            name: summary.name,
        }
    }
}

/// `GET /refbooks/{id}/elements` response.
#[derive(Debug, Serialize)]
pub struct ElementListResponse {
    pub elements: Vec<ElementJson>,
}

/// Entry in a listing.
#[derive(Debug, Serialize)]
pub struct ElementJson {
    pub code: String,
    pub value: String,
}

impl From<EntryView> for ElementJson {
    fn from(entry: EntryView) -> Self {
        Self {
            code: entry.code,
            value: entry.value,
        }
    }
}

/// `GET /refbooks/{id}/check_element` response.
#[derive(Debug, Serialize)]
pub struct CheckElementResponse {
    pub exists: bool,
}

/// `GET /refbooks/overview` response.
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub refbooks: Vec<OverviewJson>,
}

/// Catalog with its current version.
#[derive(Debug, Serialize)]
pub struct OverviewJson {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub current_version: Option<String>,
    pub version_date: Option<NaiveDate>,
}

impl From<CatalogOverview> for OverviewJson {
    fn from(overview: CatalogOverview) -> Self {
        Self {
            id: overview.id,
            code: overview.code,
            name: overview.name,
            current_version: overview.current_version,
            version_date: overview.version_date,
        }
    }
}
