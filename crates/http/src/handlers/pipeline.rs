use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use nashville_service::NormalizeReport;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{NormalizeRequest, RawCaptureRequest};
use crate::response_types::{ClearResponse, RawCreatedResponse};

pub async fn record_raw(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RawCaptureRequest>,
) -> Result<(StatusCode, Json<RawCreatedResponse>), ApiError> {
    let id = state.record_raw(&req.source_spider, &req.payload()).await?;
    Ok((StatusCode::CREATED, Json(RawCreatedResponse { id })))
}

/// Without `after_id` the run resumes from the server's watermark.
pub async fn run_normalize(
    State(state): State<Arc<AppState>>,
    req: Option<Json<NormalizeRequest>>,
) -> Result<Json<NormalizeReport>, ApiError> {
    let after_id = req.and_then(|Json(req)| req.after_id);
    Ok(Json(state.normalize(after_id).await?))
}

pub async fn clear(State(state): State<Arc<AppState>>) -> Result<Json<ClearResponse>, ApiError> {
    state.clear().await?;
    Ok(Json(ClearResponse { cleared: true }))
}
