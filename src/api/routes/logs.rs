//! Day-Log Routes
//!
//! - GET /api/v1/logs?start=&end= - History rows, newest first
//! - GET /api/v1/logs/:date - One day (blank if nothing logged)
//! - PUT /api/v1/logs/:date - Replace a day
//! - DELETE /api/v1/logs/:date - Remove a day

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    DayLogRequest, DeleteLogResponse, HistoryResponse, RangeParams, SaveLogResponse,
};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::model::{parse_date, DayLog};

/// GET /api/v1/logs
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<HistoryResponse>> {
    let range = state
        .tracker
        .resolve_range(params.start.as_deref(), params.end.as_deref())?;
    let entries = state.tracker.history(&range).await;

    Ok(Json(HistoryResponse { range, entries }))
}

/// GET /api/v1/logs/:date
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult<Json<DayLog>> {
    parse_date(&date)?;

    let log = state
        .tracker
        .log(&date)
        .await
        .unwrap_or_else(|| DayLog::empty(&date));
    Ok(Json(log))
}

/// PUT /api/v1/logs/:date
///
/// The path date wins over any `date` in the body.
pub async fn put_log(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    body: Result<Json<DayLogRequest>, JsonRejection>,
) -> ApiResult<Json<SaveLogResponse>> {
    parse_date(&date)?;
    let Json(request) = body?;
    let log = request.into_log(date);

    let sync = state.tracker.save_log(log.clone()).await?;
    Ok(Json(SaveLogResponse { log, sync }))
}

/// DELETE /api/v1/logs/:date
pub async fn delete_log(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult<Json<DeleteLogResponse>> {
    let sync = state.tracker.delete_log(&date).await?;
    Ok(Json(DeleteLogResponse { date, sync }))
}
