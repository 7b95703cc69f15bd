//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not model
//! types themselves.

use serde::{Deserialize, Serialize};

use crate::model::{DateRange, DayLog, Macros, Meals, UserSettings};
use crate::tracker::{LoadOutcome, WriteOutcome};

/// `?start=&end=` query parameters; either bound may be omitted
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// PUT /settings body
///
/// Fields are plain numbers and strings; nothing is coerced.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub tmb: f64,
    #[serde(default)]
    pub name: String,
}

impl From<SettingsRequest> for UserSettings {
    fn from(request: SettingsRequest) -> Self {
        UserSettings::new(request.tmb, request.name)
    }
}

/// Macros in a request body; omitted fields are zero
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MacrosRequest {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<MacrosRequest> for Macros {
    fn from(m: MacrosRequest) -> Self {
        Macros::new(m.calories, m.protein, m.carbs, m.fat)
    }
}

/// Meal slots in a request body; omitted slots are zero
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MealsRequest {
    #[serde(alias = "Café da Manhã")]
    pub breakfast: Option<MacrosRequest>,
    #[serde(alias = "Almoço")]
    pub lunch: Option<MacrosRequest>,
    #[serde(alias = "Jantar")]
    pub dinner: Option<MacrosRequest>,
    #[serde(alias = "Lanche")]
    pub snack: Option<MacrosRequest>,
}

impl From<MealsRequest> for Meals {
    fn from(m: MealsRequest) -> Self {
        Meals {
            breakfast: m.breakfast.map(Into::into).unwrap_or_default(),
            lunch: m.lunch.map(Into::into).unwrap_or_default(),
            dinner: m.dinner.map(Into::into).unwrap_or_default(),
            snack: m.snack.map(Into::into).unwrap_or_default(),
        }
    }
}

/// PUT /logs/:date body
///
/// Any `date` in the body is ignored; the path decides.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DayLogRequest {
    pub meals: MealsRequest,
    pub exercise_calories: f64,
}

impl DayLogRequest {
    pub fn into_log(self, date: String) -> DayLog {
        DayLog {
            date,
            meals: self.meals.into(),
            exercise_calories: self.exercise_calories,
        }
    }
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub range: DateRange,
    pub entries: Vec<crate::engine::HistoryEntry>,
}

/// Saved day-log with the outcome of the remote write
#[derive(Debug, Serialize)]
pub struct SaveLogResponse {
    pub log: DayLog,
    pub sync: WriteOutcome,
}

/// Saved settings with the outcome of the remote write
#[derive(Debug, Serialize)]
pub struct SaveSettingsResponse {
    pub settings: UserSettings,
    pub sync: WriteOutcome,
}

/// Deleted date with the outcome of the remote delete
#[derive(Debug, Serialize)]
pub struct DeleteLogResponse {
    pub date: String,
    pub sync: WriteOutcome,
}

/// Insight request body
#[derive(Debug, Default, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Insight response
#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub range: DateRange,
    pub insight: String,
}

/// Identity request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRequest {
    pub user_id: String,
}

/// Identity response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub user_id: String,
    /// Present after a switch, describing the reload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadOutcome>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy", "degraded", or "unhealthy"
    pub status: String,
    /// Mirror status: "ok" or "error"
    pub mirror: String,
    /// Remote store status: "online" or "offline"
    pub store: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
