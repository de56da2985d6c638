//! Typed error enum for the storage layer.
//!
//! Lets callers match on specific failure modes (not found, duplicate URL,
//! transient DB errors) instead of downcasting opaque boxes.

use thiserror::Error;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation (duplicate event URL).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Row data could not be converted into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)))
    }

    /// Whether this error is a unique-constraint violation.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Custom `From<sqlx::Error>` rather than a blanket `#[from]`:
///
/// - `RowNotFound` becomes `NotFound` (callers remap with entity context)
/// - SQLSTATE 23505 becomes `Duplicate`
/// - everything else becomes `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            sqlx::Error::Database(db_err)
                if db_err.code().is_some_and(|c| c == UNIQUE_VIOLATION) =>
            {
                Self::Duplicate(db_err.message().to_owned())
            },
            _ => Self::Database(err),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON serialization/deserialization".to_owned(),
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(!err.is_duplicate());
    }

    #[test]
    fn pool_timeout_is_transient() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_transient());
    }

    #[test]
    fn duplicate_is_not_transient() {
        let err = StorageError::Duplicate("events_url_key".to_owned());
        assert!(err.is_duplicate());
        assert!(!err.is_transient());
    }

    #[test]
    fn json_error_is_data_corruption() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(StorageError::from(json_err), StorageError::DataCorruption { .. }));
    }
}
