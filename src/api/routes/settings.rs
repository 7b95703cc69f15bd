//! Settings Routes
//!
//! - GET /api/v1/settings - Current BMR and name
//! - PUT /api/v1/settings - Replace settings

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{SaveSettingsResponse, SettingsRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::model::UserSettings;

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<UserSettings> {
    Json(state.tracker.settings().await)
}

/// PUT /api/v1/settings
pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SettingsRequest>, JsonRejection>,
) -> ApiResult<Json<SaveSettingsResponse>> {
    let Json(request) = body?;
    let settings = UserSettings::from(request);
    let sync = state.tracker.save_settings(settings.clone()).await?;
    Ok(Json(SaveSettingsResponse { settings, sync }))
}
