//! Storage layer for the nashville pipeline
//!
//! PostgreSQL via sqlx: the append-only `raw_data` staging table, the
//! `events` table keyed by URL, and full-text search over `search_vector`.

pub mod error;
mod pg_migrations;
mod pg_storage;
pub mod traits;

pub use error::StorageError;
pub use pg_migrations::{SCHEMA_INDEXES, run_pg_migrations};
pub use pg_storage::PgStorage;
pub use traits::{AdminStore, EventStore, RawDataStore, SearchStore};
