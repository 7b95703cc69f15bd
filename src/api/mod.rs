//! NutriTrack REST API
//!
//! HTTP API layer for NutriTrack, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard?start=&end=` - Totals, balances and daily series
//!
//! ## Logs
//! - `GET /api/v1/logs?start=&end=` - History rows, newest first
//! - `GET /api/v1/logs/:date` - One day's log
//! - `PUT /api/v1/logs/:date` - Save a day's log
//! - `DELETE /api/v1/logs/:date` - Delete a day's log
//!
//! ## Settings
//! - `GET /api/v1/settings` / `PUT /api/v1/settings`
//!
//! ## Insights
//! - `POST /api/v1/insights` - Written summary of a range
//!
//! ## Sync and identity
//! - `POST /api/v1/sync` - Reload from the remote store
//! - `GET /api/v1/sync/status` - Sync indicator and online flag
//! - `GET /api/v1/identity` / `PUT /api/v1/identity`
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use nutritrack::api::{serve, AppState};
//! use nutritrack::{Config, Tracker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let tracker = Arc::new(Tracker::from_config(&config)?);
//!     tracker.load().await;
//!
//!     let state = AppState::new(tracker, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/logs", get(routes::logs::list_logs))
        .route(
            "/logs/:date",
            get(routes::logs::get_log)
                .put(routes::logs::put_log)
                .delete(routes::logs::delete_log),
        )
        .route(
            "/settings",
            get(routes::settings::get_settings).put(routes::settings::put_settings),
        )
        .route("/insights", post(routes::insights::generate_insight))
        .route("/sync", post(routes::sync::trigger_sync))
        .route("/sync/status", get(routes::sync::get_sync_status))
        .route(
            "/identity",
            get(routes::identity::get_identity).put(routes::identity::put_identity),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("NutriTrack API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("NutriTrack API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InsightConfig, TrackerConfig};
    use crate::insight::{InsightClient, NOT_CONFIGURED_MESSAGE};
    use crate::mirror::LocalMirror;
    use crate::store::MemoryStore;
    use crate::tracker::Tracker;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn create_test_app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mirror = Arc::new(LocalMirror::open_in_memory().unwrap());
        let insight = Arc::new(InsightClient::new(&InsightConfig::default()).unwrap());
        let tracker = Arc::new(Tracker::new(
            store.clone(),
            mirror,
            insight,
            "api-user".to_string(),
            TrackerConfig::default(),
        ));
        tracker.load().await;

        let state = AppState::new(tracker, ApiConfig::default());
        (build_router(state), store)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (app, _store) = create_test_app().await;

        let (status, _) = send(&app, "GET", "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_log_roundtrip() {
        let (app, store) = create_test_app().await;

        let (status, body) = send(
            &app,
            "PUT",
            "/api/v1/logs/2024-01-02",
            Some(
                r#"{"date": "1999-01-01",
                    "meals": {"lunch": {"calories": 650, "protein": 40, "carbs": 70, "fat": 20}},
                    "exerciseCalories": 300}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["log"]["date"], "2024-01-02");
        assert_eq!(body["sync"]["status"], "synced");
        assert!(store.get_log("api-user", "2024-01-02").await.is_some());

        let (status, body) = send(&app, "GET", "/api/v1/logs/2024-01-02", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meals"]["lunch"]["calories"], 650.0);
        assert_eq!(body["exerciseCalories"], 300.0);

        let (status, body) = send(&app, "DELETE", "/api/v1/logs/2024-01-02", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2024-01-02");

        let (_, body) = send(&app, "GET", "/api/v1/logs/2024-01-02", None).await;
        assert_eq!(body["meals"]["lunch"]["calories"], 0.0);
    }

    #[tokio::test]
    async fn test_invalid_date_rejected() {
        let (app, _store) = create_test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/logs/2024-13-40", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());

        let (status, _) = send(&app, "PUT", "/api/v1/logs/tomorrow", Some("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let (app, _store) = create_test_app().await;

        send(
            &app,
            "PUT",
            "/api/v1/settings",
            Some(r#"{"tmb": 2000, "name": "Ana"}"#),
        )
        .await;
        send(
            &app,
            "PUT",
            "/api/v1/logs/2024-01-01",
            Some(r#"{"meals": {"dinner": {"calories": 2500}}}"#),
        )
        .await;

        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/dashboard?start=2024-01-01&end=2024-01-07",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["daysCount"], 7);
        assert_eq!(body["logCount"], 1);
        assert_eq!(body["totals"]["calories"], 2500.0);
        assert_eq!(body["totalBasalBurn"], 14000.0);
        assert_eq!(body["calorieBalance"], -11500.0);
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let (app, _store) = create_test_app().await;

        let (status, _) = send(
            &app,
            "GET",
            "/api/v1/dashboard?start=2024-01-07&end=2024-01-01",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/v1/logs?start=garbage", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_default_range() {
        let (app, _store) = create_test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["daysCount"], 11);
    }

    #[tokio::test]
    async fn test_settings_validation() {
        let (app, _store) = create_test_app().await;

        let (status, _) = send(
            &app,
            "PUT",
            "/api/v1/settings",
            Some(r#"{"tmb": 9000, "name": "Ana"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/api/v1/settings", None).await;
        assert_eq!(body["tmb"], 2700.0);
        assert_eq!(body["name"], "User");
    }

    #[tokio::test]
    async fn test_settings_body_is_strict() {
        let (app, _store) = create_test_app().await;

        for body in [
            r#"{"tmb": 0, "name": "Ana"}"#,
            r#"{"tmb": -300, "name": "Ana"}"#,
            r#"{"tmb": "abc", "name": "Ana"}"#,
            r#"{"tmb": "2000", "name": "Ana"}"#,
            r#"{"name": "Ana"}"#,
            r#"{"tmb": 2000, "name": "  "}"#,
        ] {
            let (status, response) = send(&app, "PUT", "/api/v1/settings", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
        }

        let (_, body) = send(&app, "GET", "/api/v1/settings", None).await;
        assert_eq!(body["tmb"], 2700.0);
    }

    #[tokio::test]
    async fn test_log_body_is_strict() {
        let (app, store) = create_test_app().await;

        for body in [
            r#"{"exerciseCalories": "lots"}"#,
            r#"{"meals": {"lunch": {"calories": "x"}}}"#,
            r#"{"meals": {"lunch": {"calories": -10}}}"#,
            r#"{"exerciseCalories": -1}"#,
            r#"{"meals": {"lunch": "big"}}"#,
        ] {
            let (status, _) = send(&app, "PUT", "/api/v1/logs/2024-01-01", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        }
        assert!(store.get_log("api-user", "2024-01-01").await.is_none());

        let (status, body) = send(
            &app,
            "PUT",
            "/api/v1/logs/2024-01-01",
            Some(r#"{"meals": {"Almoço": {"calories": 500}}}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["log"]["meals"]["lunch"]["calories"], 500.0);
    }

    #[tokio::test]
    async fn test_offline_write_still_succeeds() {
        let (app, store) = create_test_app().await;
        store.set_available(false);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/v1/logs/2024-01-03",
            Some(r#"{"exerciseCalories": 200}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sync"]["status"], "localOnly");

        let (_, body) = send(&app, "GET", "/api/v1/sync/status", None).await;
        assert_eq!(body["online"], false);
        assert_eq!(body["logCount"], 1);

        let (_, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_sync_and_identity() {
        let (app, _store) = create_test_app().await;

        let (_, body) = send(&app, "GET", "/api/v1/identity", None).await;
        assert_eq!(body["userId"], "api-user");

        let (status, body) = send(
            &app,
            "PUT",
            "/api/v1/identity",
            Some(r#"{"userId": "phone-1234"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], "phone-1234");
        assert_eq!(body["load"]["online"], true);

        let (status, _) = send(&app, "PUT", "/api/v1/identity", Some(r#"{"userId": " "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "POST", "/api/v1/sync", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["online"], true);
    }

    #[tokio::test]
    async fn test_insight_without_key() {
        let (app, _store) = create_test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/insights",
            Some(r#"{"start": "2024-01-01", "end": "2024-01-07"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["insight"], NOT_CONFIGURED_MESSAGE);
        assert_eq!(body["range"]["startDate"], "2024-01-01");
    }
}
