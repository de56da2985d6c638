//! Periodic collect-then-normalize loop.

use std::sync::Arc;
use std::time::Duration;

use nashville_service::{NormalizeReport, ServiceError};

use crate::AppState;

/// Spawns the ETL loop: every `interval`, run each configured collector and
/// then normalize from the watermark.
///
/// Errors are logged and do not stop the loop; the next tick retries.
pub fn start_etl_pipeline(state: Arc<AppState>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let cycle_state = Arc::clone(&state);
            let result = tokio::spawn(async move { run_etl_cycle(&cycle_state).await }).await;
            match result {
                Ok(Ok(report)) => {
                    if report.scanned > 0 {
                        tracing::info!(
                            inserted = report.inserted,
                            updated = report.updated,
                            skipped = report.skipped,
                            "ETL cycle complete"
                        );
                    }
                },
                Ok(Err(e)) => tracing::warn!(error = %e, "ETL cycle failed"),
                Err(e) => tracing::warn!(error = ?e, "ETL cycle panicked"),
            }
        }
    });
}

/// One collect-then-normalize pass. A failing collector is logged and skipped.
pub async fn run_etl_cycle(state: &AppState) -> Result<NormalizeReport, ServiceError> {
    for collector in state.collectors.iter() {
        match state.run_collector(collector.as_ref()).await {
            Ok(count) => tracing::info!(source_spider = %collector.label(), count, "collected"),
            Err(e) => {
                tracing::warn!(source_spider = %collector.label(), error = %e, "collector failed");
            },
        }
    }
    state.normalize(None).await
}
