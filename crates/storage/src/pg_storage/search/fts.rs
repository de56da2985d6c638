use nashville_core::{Event, MAX_QUERY_LIMIT};

use super::super::{EVENT_COLUMNS, PgStorage, row_to_event, usize_to_i64};
use super::utils::build_tsquery;
use crate::error::StorageError;

/// Prefix-matching keyword search ranked by `ts_rank`.
pub(crate) async fn search(
    storage: &PgStorage,
    query: &str,
    limit: usize,
) -> Result<Vec<Event>, StorageError> {
    let Some(tsquery) = build_tsquery(query) else {
        return Ok(Vec::new());
    };
    let sql = format!(
        "SELECT {EVENT_COLUMNS},
                ts_rank(search_vector, to_tsquery('english', $1))::float8 AS score
           FROM events
           WHERE search_vector @@ to_tsquery('english', $1) AND url IS NOT NULL
           ORDER BY score DESC, event_date ASC NULLS LAST, id ASC
           LIMIT $2"
    );
    let rows = sqlx::query(&sql)
        .bind(&tsquery)
        .bind(usize_to_i64(limit.min(MAX_QUERY_LIMIT)))
        .fetch_all(&storage.pool)
        .await?;
    rows.iter().map(row_to_event).collect::<Result<_, StorageError>>()
}
