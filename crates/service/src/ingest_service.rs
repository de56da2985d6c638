use std::sync::Arc;

use nashville_collectors::Collector;
use nashville_storage::traits::RawDataStore;

use crate::ServiceError;

/// Writes raw captures to the staging table, one row per capture.
pub struct IngestService {
    raw: Arc<dyn RawDataStore>,
}

fn validate_label(source_spider: &str) -> Result<&str, ServiceError> {
    let label = source_spider.trim();
    if label.is_empty() {
        return Err(ServiceError::InvalidInput("source_spider must not be empty".to_owned()));
    }
    Ok(label)
}

impl IngestService {
    #[must_use]
    pub fn new(raw: Arc<dyn RawDataStore>) -> Self {
        Self { raw }
    }

    /// Append one capture. `raw_json` is stored verbatim, well-formed or not.
    pub async fn record(&self, source_spider: &str, raw_json: &str) -> Result<i64, ServiceError> {
        let label = validate_label(source_spider)?;
        let id = self.raw.append_raw(label, raw_json).await?;
        tracing::debug!(source_spider = %label, id, "raw capture recorded");
        Ok(id)
    }

    /// Append many captures under one label in a single transaction.
    pub async fn record_batch(
        &self,
        source_spider: &str,
        payloads: &[String],
    ) -> Result<usize, ServiceError> {
        let label = validate_label(source_spider)?;
        let count = self.raw.append_raw_batch(label, payloads).await?;
        tracing::info!(source_spider = %label, count, "raw captures recorded");
        Ok(count)
    }

    /// Run `collector` and stage everything it returns.
    pub async fn run_collector(&self, collector: &dyn Collector) -> Result<usize, ServiceError> {
        let label = collector.label().to_owned();
        let items = collector.collect().await?;
        let payloads =
            items.iter().map(serde_json::to_string).collect::<Result<Vec<_>, _>>()?;
        self.record_batch(&label, &payloads).await
    }
}
