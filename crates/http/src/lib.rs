//! HTTP API server for the nashville pipeline.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod etl;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::routing::{get, post};
use axum::{Json, Router};
use nashville_collectors::Collector;
use nashville_service::{
    EventService, IngestService, NormalizeReport, NormalizeService, ServiceError,
};
use nashville_storage::PgStorage;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use etl::{run_etl_cycle, start_etl_pipeline};
pub use response_types::VersionResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub ingest_service: Arc<IngestService>,
    pub normalize_service: Arc<NormalizeService>,
    pub event_service: Arc<EventService>,
    /// API collectors run by the ETL loop.
    pub collectors: Vec<Box<dyn Collector>>,
    /// Highest `raw_data.id` normalized by this process.
    watermark: AtomicI64,
    /// Appends hold it shared; normalization runs and resets hold it
    /// exclusively, so no in-flight append can commit below the watermark.
    pipeline_lock: RwLock<()>,
}

impl AppState {
    #[must_use]
    pub fn new(
        ingest_service: Arc<IngestService>,
        normalize_service: Arc<NormalizeService>,
        event_service: Arc<EventService>,
        collectors: Vec<Box<dyn Collector>>,
    ) -> Self {
        Self {
            ingest_service,
            normalize_service,
            event_service,
            collectors,
            watermark: AtomicI64::new(0),
            pipeline_lock: RwLock::new(()),
        }
    }

    /// Wire every service to one Postgres store.
    #[must_use]
    pub fn from_storage(storage: &Arc<PgStorage>, collectors: Vec<Box<dyn Collector>>) -> Self {
        Self::new(
            Arc::new(IngestService::new(storage.clone())),
            Arc::new(NormalizeService::new(storage.clone(), storage.clone())),
            Arc::new(EventService::new(storage.clone(), storage.clone(), storage.clone())),
            collectors,
        )
    }

    pub fn watermark(&self) -> i64 {
        self.watermark.load(Ordering::Acquire)
    }

    /// Stage one capture.
    pub async fn record_raw(
        &self,
        source_spider: &str,
        raw_json: &str,
    ) -> Result<i64, ServiceError> {
        let _guard = self.pipeline_lock.read().await;
        self.ingest_service.record(source_spider, raw_json).await
    }

    /// Stage everything one collector returns.
    pub async fn run_collector(&self, collector: &dyn Collector) -> Result<usize, ServiceError> {
        let _guard = self.pipeline_lock.read().await;
        self.ingest_service.run_collector(collector).await
    }

    /// Normalize from `after_id`, or from the watermark when absent.
    ///
    /// The watermark moves to the run's resume point. An explicit `after_id`
    /// run only advances it when nothing failed, and pulls it back to the
    /// resume point when something did, so the next run retries those rows.
    pub async fn normalize(&self, after_id: Option<i64>) -> Result<NormalizeReport, ServiceError> {
        let _guard = self.pipeline_lock.write().await;
        let start = after_id.unwrap_or_else(|| self.watermark());
        let report = self.normalize_service.run(start).await?;
        match (after_id, report.failed) {
            (None, _) => self.watermark.store(report.last_raw_id, Ordering::Release),
            (Some(_), 0) => {
                self.watermark.fetch_max(report.last_raw_id, Ordering::AcqRel);
            },
            (Some(_), _) => {
                self.watermark.fetch_min(report.last_raw_id, Ordering::AcqRel);
            },
        }
        Ok(report)
    }

    /// Truncate both tables. Ids restart, so the watermark does too.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        let _guard = self.pipeline_lock.write().await;
        self.event_service.clear().await?;
        self.watermark.store(0, Ordering::Release);
        Ok(())
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/events", get(handlers::events::list_events))
        .route("/api/events/search", get(handlers::events::search_events))
        .route("/api/events/{id}", get(handlers::events::get_event))
        .route("/api/sources", get(handlers::events::list_sources))
        .route("/api/categories", get(handlers::events::list_categories))
        .route("/api/stats", get(handlers::events::stats))
        .route("/api/raw", post(handlers::pipeline::record_raw))
        .route("/api/pipeline/normalize", post(handlers::pipeline::run_normalize))
        .route("/api/admin/clear", post(handlers::pipeline::clear))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
