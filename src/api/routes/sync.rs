//! Sync Routes
//!
//! - POST /api/v1/sync - Reload from the remote store
//! - GET /api/v1/sync/status - Online flag, sync indicator, last error

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::tracker::{LoadOutcome, TrackerStatus};

/// POST /api/v1/sync
///
/// An unreachable store is reported in the body, not as an error status.
pub async fn trigger_sync(State(state): State<Arc<AppState>>) -> Json<LoadOutcome> {
    let outcome = state.tracker.load().await;
    tracing::info!(online = outcome.online, "Manual sync completed");
    Json(outcome)
}

/// GET /api/v1/sync/status
pub async fn get_sync_status(State(state): State<Arc<AppState>>) -> Json<TrackerStatus> {
    Json(state.tracker.status().await)
}
