//! RawDataStore implementation for PgStorage.

use async_trait::async_trait;
use nashville_core::RawRecord;

use super::{PgStorage, row_to_raw, usize_to_i64};
use crate::error::StorageError;
use crate::traits::RawDataStore;

#[async_trait]
impl RawDataStore for PgStorage {
    async fn append_raw(&self, source_spider: &str, raw_json: &str) -> Result<i64, StorageError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO raw_data (source_spider, raw_json) VALUES ($1, $2) RETURNING id",
        )
        .bind(source_spider)
        .bind(raw_json)
        .fetch_one(&self.pool)
        .await?;
        Ok(i64::from(id))
    }

    async fn append_raw_batch(
        &self,
        source_spider: &str,
        payloads: &[String],
    ) -> Result<usize, StorageError> {
        if payloads.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        // UNNEST keeps this one round trip regardless of batch size.
        let result = sqlx::query(
            "INSERT INTO raw_data (source_spider, raw_json)
             SELECT $1, payload FROM UNNEST($2::text[]) AS payload",
        )
        .bind(source_spider)
        .bind(payloads)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn raw_after(&self, after_id: i64, limit: usize) -> Result<Vec<RawRecord>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, source_spider, raw_json FROM raw_data
             WHERE id > $1
             ORDER BY id ASC
             LIMIT $2",
        )
        .bind(after_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_raw).collect()
    }

    async fn get_raw(&self, id: i64) -> Result<Option<RawRecord>, StorageError> {
        let row = sqlx::query("SELECT id, source_spider, raw_json FROM raw_data WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_raw).transpose()
    }
}
