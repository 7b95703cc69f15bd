//! Identity Routes
//!
//! - GET /api/v1/identity - Current user id
//! - PUT /api/v1/identity - Adopt another device's id and reload

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{IdentityRequest, IdentityResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/identity
pub async fn get_identity(State(state): State<Arc<AppState>>) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        user_id: state.tracker.user_id().await,
        load: None,
    })
}

/// PUT /api/v1/identity
pub async fn put_identity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdentityRequest>,
) -> ApiResult<Json<IdentityResponse>> {
    let load = state.tracker.set_user_id(&req.user_id).await?;

    Ok(Json(IdentityResponse {
        user_id: state.tracker.user_id().await,
        load: Some(load),
    }))
}
