use nashville_core::{EVENTS_PER_PAGE, EventFilter, EventPage};

use super::super::{EVENT_COLUMNS, PgStorage, i64_to_usize, row_to_event, usize_to_i64};
use crate::error::StorageError;

pub(crate) async fn list_events(
    storage: &PgStorage,
    filter: &EventFilter,
) -> Result<EventPage, StorageError> {
    // Rows predating the url key are not addressable events.
    let mut conditions = vec!["url IS NOT NULL".to_owned()];
    let mut param_idx: usize = 1;
    let mut bind_strings: Vec<String> = Vec::new();

    if let Some(source) = &filter.source {
        conditions.push(format!("source = ${param_idx}"));
        param_idx += 1;
        bind_strings.push(source.clone());
    }
    if let Some(category) = &filter.category {
        conditions.push(format!("category = ${param_idx}"));
        param_idx += 1;
        bind_strings.push(category.clone());
    }
    let order_by = if let Some(term) = filter.search_term() {
        conditions.push(format!("search_vector @@ plainto_tsquery('english', ${param_idx})"));
        let order = format!(
            "ts_rank(search_vector, plainto_tsquery('english', ${param_idx})) DESC, \
             event_date ASC, name ASC"
        );
        param_idx += 1;
        bind_strings.push(term.to_owned());
        order
    } else {
        "event_date ASC, name ASC".to_owned()
    };

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    let count_sql = format!("SELECT COUNT(*) FROM events {where_clause}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for val in &bind_strings {
        count_query = count_query.bind(val);
    }
    let total = i64_to_usize(count_query.fetch_one(&storage.pool).await?);

    let sql = format!(
        "SELECT {EVENT_COLUMNS}
           FROM events {where_clause}
           ORDER BY {order_by}
           LIMIT ${} OFFSET ${}",
        param_idx,
        param_idx + 1
    );
    let mut q = sqlx::query(&sql);
    for val in &bind_strings {
        q = q.bind(val);
    }
    q = q.bind(usize_to_i64(EVENTS_PER_PAGE));
    q = q.bind(usize_to_i64(filter.offset()));
    let rows = q.fetch_all(&storage.pool).await?;
    let events = rows.iter().map(row_to_event).collect::<Result<Vec<_>, StorageError>>()?;

    Ok(EventPage::new(events, total, filter.page.max(1)))
}

/// Sorted distinct non-null values of one text column.
///
/// `column` is always a compile-time constant from this crate.
pub(crate) async fn distinct_values(
    storage: &PgStorage,
    column: &'static str,
) -> Result<Vec<String>, StorageError> {
    let sql = format!(
        "SELECT DISTINCT {column} FROM events WHERE {column} IS NOT NULL ORDER BY {column}"
    );
    let values: Vec<String> = sqlx::query_scalar(&sql).fetch_all(&storage.pool).await?;
    Ok(values)
}
