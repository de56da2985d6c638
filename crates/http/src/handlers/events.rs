use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use nashville_core::{Event, EventPage, PipelineStats};

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{EventsQuery, SearchQuery};

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventPage>, ApiError> {
    let filter = query.into_filter().map_err(ApiError::BadRequest)?;
    Ok(Json(state.event_service.list(&filter).await?))
}

pub async fn search_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.event_service.search(&query.q, query.capped_limit()).await?))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
    state
        .event_service
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("event '{id}' not found")))
}

pub async fn list_sources(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.event_service.sources().await?))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.event_service.categories().await?))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<PipelineStats>, ApiError> {
    Ok(Json(state.event_service.stats().await?))
}
