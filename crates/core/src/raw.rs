use serde::{Deserialize, Serialize};

/// One unprocessed capture staged in `raw_data`.
///
/// Rows are append-only: the pipeline inserts them and reads them back for
/// normalization, but never rewrites an existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    pub source_spider: String,
    pub raw_json: String,
}

impl RawRecord {
    #[must_use]
    pub fn new(id: i64, source_spider: impl Into<String>, raw_json: impl Into<String>) -> Self {
        Self { id, source_spider: source_spider.into(), raw_json: raw_json.into() }
    }
}

/// Row counts for both pipeline tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub raw_records: i64,
    pub events: i64,
}
