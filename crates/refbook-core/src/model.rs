//! Catalog data model.
//!
//! A [`Catalog`] owns dated [`CatalogVersion`]s, and every version owns its
//! [`CatalogEntry`] rows. The projection types at the bottom of this module
//! are what the query services hand out.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};

/// Database identifier of a catalog.
pub type CatalogId = i64;

/// Database identifier of a catalog version.
pub type VersionId = i64;

/// Maximum field lengths, counted in characters.
pub mod limits {
    /// Catalog code.
    pub const CATALOG_CODE: usize = 100;
    /// Catalog display name.
    pub const CATALOG_NAME: usize = 300;
    /// Version label.
    pub const VERSION_LABEL: usize = 50;
    /// Entry code.
    pub const ENTRY_CODE: usize = 100;
    /// Entry value.
    pub const ENTRY_VALUE: usize = 300;
}

/// A coded reference/lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub id: CatalogId,
    /// Globally unique external identifier.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// A dated snapshot of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogVersion {
    pub id: VersionId,
    pub catalog_id: CatalogId,
    /// Label, unique within the owning catalog.
    pub version: String,
    /// Day the version becomes active, unique within the owning catalog.
    pub effective_date: NaiveDate,
}

/// A code/value pair owned by one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub version_id: VersionId,
    pub code: String,
    pub value: String,
}

/// Input for creating a catalog.
#[derive(Debug, Clone)]
pub struct NewCatalog {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl NewCatalog {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_length("catalog code", &self.code, limits::CATALOG_CODE)?;
        check_length("catalog name", &self.name, limits::CATALOG_NAME)
    }
}

/// Input for creating a catalog version.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub version: String,
    pub effective_date: NaiveDate,
}

impl NewVersion {
    pub fn new(version: impl Into<String>, effective_date: NaiveDate) -> Self {
        Self {
            version: version.into(),
            effective_date,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_length("version label", &self.version, limits::VERSION_LABEL)
    }
}

/// Input for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub code: String,
    pub value: String,
}

impl NewEntry {
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_length("entry code", &self.code, limits::ENTRY_CODE)?;
        check_length("entry value", &self.value, limits::ENTRY_VALUE)
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidData(format!("{field} may not be blank")));
    }
    if value.chars().count() > max {
        return Err(Error::InvalidData(format!(
            "{field} exceeds {max} characters"
        )));
    }
    Ok(())
}

/// Catalog listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub id: CatalogId,
    pub code: String,
    pub name: String,
}

/// Entry as exposed to readers, without internal identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub code: String,
    pub value: String,
}

/// A catalog together with the version current on some date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOverview {
    pub id: CatalogId,
    pub code: String,
    pub name: String,
    pub current_version: Option<String>,
    pub version_date: Option<NaiveDate>,
}
