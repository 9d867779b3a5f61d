//! Core error types.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Catalog store and query errors.
///
/// Absent data (unknown catalog, unknown version, no matching entry) is not
/// an error: queries answer with empty collections, `false` or `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[source] rusqlite::Error),

    /// A uniqueness constraint rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// The owning catalog or version does not exist.
    #[error("missing parent record: {0}")]
    MissingParent(String),

    /// A field violates the model limits.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Connection pool error.
    #[error("pool error: {0}")]
    Pool(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
                    Error::MissingParent(detail)
                } else {
                    Error::Duplicate(detail)
                }
            }
            _ => Error::Storage(err),
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_failure(extended_code: i32, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: ErrorCode::ConstraintViolation,
                extended_code,
            },
            Some(message.to_string()),
        )
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate() {
        let err: Error = constraint_failure(
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            "UNIQUE constraint failed: catalog_version.catalog_id",
        )
        .into();
        assert!(matches!(err, Error::Duplicate(msg) if msg.contains("catalog_version")));
    }

    #[test]
    fn test_foreign_key_violation_maps_to_missing_parent() {
        let err: Error = constraint_failure(
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            "FOREIGN KEY constraint failed",
        )
        .into();
        assert!(matches!(err, Error::MissingParent(_)));
    }

    #[test]
    fn test_other_errors_stay_storage() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(err.to_string(), "storage error: Query returned no rows");
    }
}
