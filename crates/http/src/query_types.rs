//! Request/query types (Deserialize)

use nashville_core::{DEFAULT_QUERY_LIMIT, EventFilter, MAX_QUERY_LIMIT};
use serde::Deserialize;
use serde_json::Value;

const fn default_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

const fn default_page() -> usize {
    1
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    pub source: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

impl EventsQuery {
    /// Listing filter; blank parameters are treated as absent.
    pub fn into_filter(self) -> Result<EventFilter, String> {
        if self.page == 0 {
            return Err("page must be at least 1".to_owned());
        }
        Ok(EventFilter {
            source: non_blank(self.source),
            category: non_blank(self.category),
            search: non_blank(self.q),
            page: self.page,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SearchQuery {
    /// Cap limit to prevent DoS via unbounded queries.
    pub fn capped_limit(&self) -> usize {
        self.limit.min(MAX_QUERY_LIMIT)
    }
}

/// One raw capture posted by an external scraper.
#[derive(Debug, Deserialize)]
pub struct RawCaptureRequest {
    pub source_spider: String,
    pub raw_json: Value,
}

impl RawCaptureRequest {
    /// Text stored in `raw_data.raw_json`: strings verbatim, other JSON serialized.
    pub fn payload(&self) -> String {
        match &self.raw_json {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NormalizeRequest {
    pub after_id: Option<i64>,
}
