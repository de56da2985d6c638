//! Typed error enum for the service layer.
//!
//! Unifies storage and collector failures into a single error type so
//! callers can match on specific failure modes.

use nashville_collectors::CollectorError;
use nashville_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying storage and collector failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// A collector could not produce captures.
    #[error("collector: {0}")]
    Collector(#[from] CollectorError),

    /// Caller provided invalid input (blank label, page 0).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Required backend (database, API credentials) is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Serialization/deserialization failed in the service layer.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Collector(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_classification_passes_through() {
        let err = ServiceError::from(StorageError::Duplicate("events_url_key".to_owned()));
        assert!(err.is_duplicate());
        assert!(!err.is_not_found());
        let err = ServiceError::from(StorageError::NotFound { entity: "event", id: "9".to_owned() });
        assert!(err.is_not_found());
    }

    #[test]
    fn missing_credential_is_not_transient() {
        let err = ServiceError::from(CollectorError::MissingCredential("seatgeek_client_id"));
        assert!(!err.is_transient());
    }
}
