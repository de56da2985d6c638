use std::sync::Arc;

use nashville_core::{NORMALIZE_BATCH_SIZE, UpsertOutcome};
use nashville_normalize::normalize_record;
use nashville_storage::traits::{EventStore, RawDataStore};
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Counters for one normalization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub scanned: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Resume point: pass it back as `after_id`. Stops just before the first
    /// capture whose upsert failed, so a later run retries it.
    pub last_raw_id: i64,
}

/// Maps staged captures into `events`.
///
/// Each run reads `raw_data` rows after a watermark in id order, so a row is
/// normalized once per run no matter how many batches the run takes.
pub struct NormalizeService {
    raw: Arc<dyn RawDataStore>,
    events: Arc<dyn EventStore>,
    batch_size: usize,
}

impl NormalizeService {
    #[must_use]
    pub fn new(raw: Arc<dyn RawDataStore>, events: Arc<dyn EventStore>) -> Self {
        Self { raw, events, batch_size: NORMALIZE_BATCH_SIZE }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Normalize every capture with `id > after_id`.
    ///
    /// Rejected captures are skipped and a failed upsert is counted; neither
    /// stops the run. Failing to read `raw_data` does.
    pub async fn run(&self, after_id: i64) -> Result<NormalizeReport, ServiceError> {
        let mut report = NormalizeReport::default();
        let mut cursor = after_id;
        let mut retry_from: Option<i64> = None;

        loop {
            let batch = self.raw.raw_after(cursor, self.batch_size).await?;
            if batch.is_empty() {
                break;
            }

            for record in &batch {
                let previous = cursor;
                cursor = record.id;
                report.scanned += 1;
                let event = match normalize_record(record) {
                    Ok(event) => event,
                    Err(reason) => {
                        report.skipped += 1;
                        tracing::debug!(
                            raw_id = record.id,
                            source_spider = %record.source_spider,
                            %reason,
                            "raw record skipped"
                        );
                        continue;
                    },
                };
                match self.events.upsert_event(&event).await {
                    Ok(UpsertOutcome::Inserted) => report.inserted += 1,
                    Ok(UpsertOutcome::Updated) => report.updated += 1,
                    Err(e) => {
                        report.failed += 1;
                        retry_from.get_or_insert(previous);
                        tracing::warn!(raw_id = record.id, url = %event.url, error = %e, "event upsert failed");
                    },
                }
            }

            if batch.len() < self.batch_size {
                break;
            }
        }

        report.last_raw_id = retry_from.unwrap_or(cursor);
        tracing::info!(
            scanned = report.scanned,
            inserted = report.inserted,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            last_raw_id = report.last_raw_id,
            "normalization finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;

    async fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::default());
        let captures = [
            ("generic", r#"{"name": "Jazz Night", "url": "https://x/1", "venue_name": "The Basement"}"#),
            ("generic", "not json {"),
            ("generic", r#"{"name": "No Url Show"}"#),
            ("ticketmaster", r#"{"name": "Opry", "url": "https://x/2", "venue_name": "Grand Ole Opry House", "event_date": "2025-06-01 19:00:00"}"#),
            ("generic", r#"{"name": "Jazz Night Late", "url": "https://x/1"}"#),
        ];
        for (label, json) in captures {
            store.append_raw(label, json).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn run_counts_every_outcome() {
        let store = seeded().await;
        let service = NormalizeService::new(store.clone(), store.clone()).with_batch_size(2);

        let report = service.run(0).await.unwrap();
        assert_eq!(
            report,
            NormalizeReport {
                scanned: 5,
                inserted: 2,
                updated: 1,
                skipped: 2,
                failed: 0,
                last_raw_id: 5
            }
        );
        let jazz = store.event_by_url_sync("https://x/1").unwrap();
        assert_eq!(jazz.fields.name.as_deref(), Some("Jazz Night Late"));
        let opry = store.event_by_url_sync("https://x/2").unwrap();
        assert_eq!(opry.fields.event_date.as_deref(), Some("2025-06-01T19:00:00"));
    }

    #[tokio::test]
    async fn run_resumes_after_watermark() {
        let store = seeded().await;
        let service = NormalizeService::new(store.clone(), store.clone());

        let first = service.run(0).await.unwrap();
        let second = service.run(first.last_raw_id).await.unwrap();
        assert_eq!(second.scanned, 0);
        assert_eq!(second.last_raw_id, first.last_raw_id);

        let partial = service.run(3).await.unwrap();
        assert_eq!(partial.scanned, 2);
    }

    #[tokio::test]
    async fn upsert_failure_is_counted_not_fatal() {
        let store = seeded().await;
        store.fail_upserts_for("https://x/2");
        let service = NormalizeService::new(store.clone(), store.clone());

        let report = service.run(0).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.scanned, 5);
        assert_eq!(report.inserted, 1);
    }

    #[tokio::test]
    async fn failed_upsert_is_retried_from_resume_point() {
        let store = seeded().await;
        store.fail_upserts_for("https://x/2");
        let service = NormalizeService::new(store.clone(), store.clone()).with_batch_size(2);

        let first = service.run(0).await.unwrap();
        assert_eq!(first.failed, 1);
        // Capture 4 failed; resume right after capture 3.
        assert_eq!(first.last_raw_id, 3);
        assert!(store.event_by_url_sync("https://x/2").is_none());

        store.heal_upserts_for("https://x/2");
        let second = service.run(first.last_raw_id).await.unwrap();
        assert_eq!(second.scanned, 2);
        assert_eq!(second.failed, 0);
        assert_eq!(second.inserted, 1);
        assert_eq!(second.last_raw_id, 5);
        assert!(store.event_by_url_sync("https://x/2").is_some());
    }

    #[tokio::test]
    async fn failure_on_first_capture_keeps_start() {
        let store = seeded().await;
        store.fail_upserts_for("https://x/1");
        let service = NormalizeService::new(store.clone(), store.clone());

        let report = service.run(0).await.unwrap();
        assert_eq!(report.failed, 2);
        assert_eq!(report.last_raw_id, 0);
    }
}
