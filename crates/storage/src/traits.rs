//! Storage trait abstraction
//!
//! Async domain traits for storage operations. `PgStorage` implements all of
//! them; services depend on the narrowest trait they need.

use async_trait::async_trait;
use nashville_core::{Event, EventFilter, EventPage, NewEvent, PipelineStats, RawRecord, UpsertOutcome};

use crate::StorageError;

/// Append-only access to the `raw_data` staging table.
#[async_trait]
pub trait RawDataStore: Send + Sync {
    /// Append one capture. Returns the assigned id.
    async fn append_raw(&self, source_spider: &str, raw_json: &str) -> Result<i64, StorageError>;

    /// Append many captures under one label in a single transaction.
    async fn append_raw_batch(
        &self,
        source_spider: &str,
        payloads: &[String],
    ) -> Result<usize, StorageError>;

    /// Captures with `id > after_id`, in id order.
    async fn raw_after(&self, after_id: i64, limit: usize) -> Result<Vec<RawRecord>, StorageError>;

    /// Get one capture by id.
    async fn get_raw(&self, id: i64) -> Result<Option<RawRecord>, StorageError>;
}

/// Writes and point lookups on `events`.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Plain insert. A URL that already exists fails with `StorageError::Duplicate`.
    async fn insert_event(&self, event: &NewEvent) -> Result<i64, StorageError>;

    /// Insert, or update every non-key field of the row with the same URL.
    async fn upsert_event(&self, event: &NewEvent) -> Result<UpsertOutcome, StorageError>;

    /// Get event by id.
    async fn get_event(&self, id: i64) -> Result<Option<Event>, StorageError>;

    /// Get event by its unique URL.
    async fn get_event_by_url(&self, url: &str) -> Result<Option<Event>, StorageError>;
}

/// Listing and full-text search over `events`.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// One page of events matching `filter`.
    async fn list_events(&self, filter: &EventFilter) -> Result<EventPage, StorageError>;

    /// Ranked keyword search (prefix matching on every word).
    async fn search_events(&self, query: &str, limit: usize) -> Result<Vec<Event>, StorageError>;

    /// Distinct non-null sources, sorted.
    async fn list_sources(&self) -> Result<Vec<String>, StorageError>;

    /// Distinct non-null categories, sorted.
    async fn list_categories(&self) -> Result<Vec<String>, StorageError>;
}

/// Maintenance operations.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Row counts for both tables.
    async fn stats(&self) -> Result<PipelineStats, StorageError>;

    /// Empty both tables and restart their id sequences.
    async fn clear_all(&self) -> Result<(), StorageError>;
}
