//! Dashboard Route
//!
//! - GET /api/v1/dashboard?start=&end= - Aggregated totals, balances and series

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::RangeParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::engine::AggregationResult;

/// GET /api/v1/dashboard
///
/// Missing bounds default to the configured window ending today.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<AggregationResult>> {
    let range = state
        .tracker
        .resolve_range(params.start.as_deref(), params.end.as_deref())?;

    Ok(Json(state.tracker.dashboard(&range).await))
}
