//! EventStore implementation for PgStorage.

use async_trait::async_trait;
use nashville_core::{Event, MAX_UPSERT_ATTEMPTS, NewEvent, UpsertOutcome};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{Postgres, Row};

use super::{EVENT_COLUMNS, PgStorage, row_to_event};
use crate::error::StorageError;
use crate::traits::EventStore;

const INSERT_SQL: &str = "INSERT INTO events
       (url, name, event_date, venue_name, venue_address, description,
        source, category, genre, season, latitude, longitude)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)";

const UPSERT_CONFLICT_SQL: &str = "ON CONFLICT (url) DO UPDATE SET
       name = EXCLUDED.name,
       event_date = EXCLUDED.event_date,
       venue_name = EXCLUDED.venue_name,
       venue_address = EXCLUDED.venue_address,
       description = EXCLUDED.description,
       source = EXCLUDED.source,
       category = EXCLUDED.category,
       genre = EXCLUDED.genre,
       season = EXCLUDED.season,
       latitude = EXCLUDED.latitude,
       longitude = EXCLUDED.longitude
     RETURNING (xmax = 0) AS inserted";

const UPDATE_BY_URL_SQL: &str = "UPDATE events SET
       name = $2, event_date = $3, venue_name = $4, venue_address = $5,
       description = $6, source = $7, category = $8, genre = $9, season = $10,
       latitude = $11, longitude = $12
     WHERE url = $1";

/// Bind the twelve event columns in `INSERT_SQL` / `UPDATE_BY_URL_SQL` order.
fn bind_event<'q>(
    query: Query<'q, Postgres, PgArguments>,
    event: &'q NewEvent,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(&event.url)
        .bind(&event.name)
        .bind(&event.event_date)
        .bind(&event.venue_name)
        .bind(&event.venue_address)
        .bind(&event.description)
        .bind(&event.source)
        .bind(&event.category)
        .bind(&event.genre)
        .bind(&event.season)
        .bind(event.latitude)
        .bind(event.longitude)
}

impl PgStorage {
    async fn upsert_once(&self, event: &NewEvent) -> Result<UpsertOutcome, StorageError> {
        let sql = format!("{INSERT_SQL} {UPSERT_CONFLICT_SQL}");
        let row = bind_event(sqlx::query(&sql), event).fetch_one(&self.pool).await?;
        let inserted: bool = row.try_get("inserted")?;
        Ok(if inserted { UpsertOutcome::Inserted } else { UpsertOutcome::Updated })
    }

    /// Returns `true` if a row with the event's URL was rewritten.
    async fn update_by_url(&self, event: &NewEvent) -> Result<bool, StorageError> {
        let result = bind_event(sqlx::query(UPDATE_BY_URL_SQL), event).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EventStore for PgStorage {
    async fn insert_event(&self, event: &NewEvent) -> Result<i64, StorageError> {
        let sql = format!("{INSERT_SQL} RETURNING id");
        let row = bind_event(sqlx::query(&sql), event).fetch_one(&self.pool).await?;
        let id: i32 = row.try_get("id")?;
        Ok(i64::from(id))
    }

    async fn upsert_event(&self, event: &NewEvent) -> Result<UpsertOutcome, StorageError> {
        let mut last_error = None;
        for attempt in 1..=MAX_UPSERT_ATTEMPTS {
            match self.upsert_once(event).await {
                Ok(outcome) => return Ok(outcome),
                // A concurrent writer won the race on this URL: the row exists,
                // so the write becomes an update.
                Err(e) if e.is_duplicate() => {
                    tracing::debug!(url = %event.url, attempt, "upsert conflict, retrying as update");
                    if self.update_by_url(event).await? {
                        return Ok(UpsertOutcome::Updated);
                    }
                    last_error = Some(e);
                },
                Err(e) if e.is_transient() => {
                    tracing::warn!(url = %event.url, attempt, error = %e, "transient upsert failure");
                    last_error = Some(e);
                },
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or_else(|| StorageError::Duplicate(event.url.clone())))
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, StorageError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND url IS NOT NULL");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_event).transpose()
    }

    async fn get_event_by_url(&self, url: &str) -> Result<Option<Event>, StorageError> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE url = $1"))
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_event).transpose()
    }
}
