//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by table and concern.

#![allow(
    clippy::arithmetic_side_effects,
    reason = "DB row counts and pagination are bounded by PostgreSQL limits"
)]

mod admin;
mod events;
mod raw_data;
mod search;

use std::time::Duration;

use nashville_core::{Event, NewEvent, PoolSettings, RawRecord};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect and bring the schema up to date.
    pub async fn new(database_url: &str, pool: PoolSettings) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(pool.max_connections)
            .acquire_timeout(Duration::from_secs(pool.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(pool.idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        let storage = Self::from_pool(pool);
        storage.migrate().await?;
        tracing::info!("PgStorage initialized");
        Ok(storage)
    }

    /// Wrap an existing pool without touching the schema.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the idempotent schema migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        run_pg_migrations(&self.pool).await.map_err(|e| StorageError::Migration(e.to_string()))
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) const EVENT_COLUMNS: &str = "id, name, url, event_date, venue_name, venue_address,
     description, source, category, genre, season, latitude, longitude";

/// Convert `usize` to `i64` for SQL LIMIT/OFFSET binds.
/// Saturates to `i64::MAX` on overflow.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

/// Convert a non-negative SQL count to `usize`, clamping negatives to 0.
pub(crate) fn i64_to_usize(val: i64) -> usize {
    usize::try_from(val).unwrap_or(0)
}

pub(crate) fn row_to_event(row: &PgRow) -> Result<Event, StorageError> {
    let url: Option<String> = row.try_get("url")?;
    let id: i32 = row.try_get("id")?;
    let url = url.ok_or_else(|| StorageError::DataCorruption {
        context: format!("event {id} has NULL url"),
        source: "url is the event key".into(),
    })?;
    Ok(Event {
        id: i64::from(id),
        fields: NewEvent {
            url,
            name: row.try_get("name")?,
            event_date: row.try_get("event_date")?,
            venue_name: row.try_get("venue_name")?,
            venue_address: row.try_get("venue_address")?,
            description: row.try_get("description")?,
            source: row.try_get("source")?,
            category: row.try_get("category")?,
            genre: row.try_get("genre")?,
            season: row.try_get("season")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
        },
    })
}

pub(crate) fn row_to_raw(row: &PgRow) -> Result<RawRecord, StorageError> {
    let id: i32 = row.try_get("id")?;
    let source_spider: Option<String> = row.try_get("source_spider")?;
    let raw_json: Option<String> = row.try_get("raw_json")?;
    Ok(RawRecord::new(
        i64::from(id),
        source_spider.unwrap_or_default(),
        raw_json.unwrap_or_default(),
    ))
}
