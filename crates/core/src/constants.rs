//! Shared constants for the nashville pipeline.
//!
//! Centralizes magic numbers used by storage, services and the HTTP layer.

/// Events shown per listing page.
pub const EVENTS_PER_PAGE: usize = 25;

/// Maximum number of results for any query (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Default number of results when limit is not specified by the caller.
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Raw rows read per normalization round trip.
pub const NORMALIZE_BATCH_SIZE: usize = 500;

/// Attempts for one event upsert before the failure is reported.
pub const MAX_UPSERT_ATTEMPTS: usize = 3;

/// Port the HTTP server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8000;

/// Per-request timeout for collector API calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
