//! AdminStore implementation for PgStorage.

use async_trait::async_trait;
use nashville_core::PipelineStats;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::AdminStore;

#[async_trait]
impl AdminStore for PgStorage {
    async fn stats(&self) -> Result<PipelineStats, StorageError> {
        let raw_records: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM raw_data").fetch_one(&self.pool).await?;
        let events: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM events").fetch_one(&self.pool).await?;
        Ok(PipelineStats { raw_records, events })
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        sqlx::query("TRUNCATE TABLE events, raw_data RESTART IDENTITY")
            .execute(&self.pool)
            .await?;
        tracing::warn!("events and raw_data truncated");
        Ok(())
    }
}
