//! Insight Routes
//!
//! - POST /api/v1/insights - Written summary of a date range

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{InsightRequest, InsightResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/v1/insights
///
/// Always answers 200 for a valid range; service problems come back as
/// the insight text.
pub async fn generate_insight(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InsightRequest>,
) -> ApiResult<Json<InsightResponse>> {
    let range = state
        .tracker
        .resolve_range(req.start.as_deref(), req.end.as_deref())?;

    let insight = state.tracker.generate_insight(&range).await;
    Ok(Json(InsightResponse { range, insight }))
}
