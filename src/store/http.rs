//! HTTP document store client
//!
//! Documents live at:
//!
//! ```text
//! GET    {base}/users/{user}              settings (404 = none saved)
//! PUT    {base}/users/{user}
//! GET    {base}/users/{user}/logs         array of day-logs
//! PUT    {base}/users/{user}/logs/{date}
//! DELETE {base}/users/{user}/logs/{date}
//! ```

use crate::config::StoreConfig;
use crate::model::lenient::log_collection;
use crate::model::{DayLog, UserSettings};
use crate::store::{DayLogStore, StoreError, UserData};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Day-log store backed by a JSON document service
pub struct HttpDocumentStore {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl HttpDocumentStore {
    /// Create a store client; an unset `base_url` yields a store that always
    /// reports [`StoreError::NotConfigured`]
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn user_url(&self, user_id: &str) -> Result<String, StoreError> {
        let base = self.base_url.as_ref().ok_or(StoreError::NotConfigured)?;
        Ok(format!("{}/users/{}", base, urlencoding::encode(user_id)))
    }

    fn logs_url(&self, user_id: &str) -> Result<String, StoreError> {
        Ok(format!("{}/logs", self.user_url(user_id)?))
    }

    fn log_url(&self, user_id: &str, date: &str) -> Result<String, StoreError> {
        Ok(format!(
            "{}/{}",
            self.logs_url(user_id)?,
            urlencoding::encode(date)
        ))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        self.authorize(request)
            .send()
            .await
            .map_err(StoreError::from_transport)
    }

    /// GET a document; 404 maps to `None`
    async fn get_document<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, StoreError> {
        let response = self.send(self.client.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let document = response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        Ok(Some(document))
    }
}

#[async_trait]
impl DayLogStore for HttpDocumentStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_user_data(&self, user_id: &str) -> Result<UserData, StoreError> {
        let settings: Option<UserSettings> = self.get_document(&self.user_url(user_id)?).await?;
        let logs = match self
            .get_document::<serde_json::Value>(&self.logs_url(user_id)?)
            .await?
        {
            Some(value) => log_collection(value).ok_or_else(|| {
                StoreError::InvalidDocument("logs collection is not an array".to_string())
            })?,
            None => Vec::new(),
        };

        tracing::debug!(
            user_id = %user_id,
            has_settings = settings.is_some(),
            logs = logs.len(),
            "Fetched user data"
        );

        Ok(UserData { settings, logs })
    }

    async fn save_user_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<(), StoreError> {
        let url = self.user_url(user_id)?;
        let response = self.send(self.client.put(&url).json(settings)).await?;
        check_status(response).await?;
        Ok(())
    }

    async fn save_day_log(&self, user_id: &str, log: &DayLog) -> Result<(), StoreError> {
        let url = self.log_url(user_id, &log.date)?;
        let response = self.send(self.client.put(&url).json(log)).await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_day_log(&self, user_id: &str, date: &str) -> Result<(), StoreError> {
        let url = self.log_url(user_id, date)?;
        let response = self.send(self.client.delete(&url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::ApiError {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        routing::{get, put},
        Json, Router,
    };
    use serde_json::{json, Value};

    fn store(base_url: Option<&str>) -> HttpDocumentStore {
        store_with_key(base_url, None)
    }

    fn store_with_key(base_url: Option<&str>, api_key: Option<&str>) -> HttpDocumentStore {
        HttpDocumentStore::new(&StoreConfig {
            base_url: base_url.map(str::to_string),
            api_key: api_key.map(str::to_string),
            request_timeout_ms: 2000,
        })
        .unwrap()
    }

    /// Serve `router` on an ephemeral local port and return its base URL
    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// A document service whose responses are fixed per route
    fn fake_service(logs: Value) -> Router {
        Router::new()
            .route("/users/:user", get(|| async { StatusCode::NOT_FOUND }).put(
                |headers: HeaderMap, Json(_body): Json<Value>| async move {
                    let authorized = headers
                        .get(AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer secret");
                    if authorized {
                        StatusCode::NO_CONTENT
                    } else {
                        StatusCode::UNAUTHORIZED
                    }
                },
            ))
            .route(
                "/users/:user/logs",
                get(move || {
                    let logs = logs.clone();
                    async move { Json(logs) }
                }),
            )
            .route(
                "/users/:user/logs/:date",
                put(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") })
                    .delete(|| async { StatusCode::NOT_FOUND }),
            )
    }

    #[test]
    fn test_document_urls() {
        let store = store(Some("http://docs.local/api/"));
        assert!(store.is_configured());
        assert_eq!(store.user_url("abc").unwrap(), "http://docs.local/api/users/abc");
        assert_eq!(
            store.log_url("my id", "2024-01-02").unwrap(),
            "http://docs.local/api/users/my%20id/logs/2024-01-02"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_store() {
        let store = store(None);
        assert!(!store.is_configured());

        let err = store.fetch_user_data("abc").await.unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured));

        let err = store.delete_day_log("abc", "2024-01-01").await.unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured));
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        // Nothing listens on the discard port
        let store = store(Some("http://127.0.0.1:9"));
        let result = store
            .save_user_settings("abc", &UserSettings::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_skips_malformed_logs() {
        let base = spawn_server(fake_service(json!([
            { "date": "2024-01-01", "meals": { "Almoço": { "calories": "500" } } },
            "junk",
            null,
            { "date": "2024-01-02", "exerciseCalories": 250 }
        ])))
        .await;

        let data = store(Some(&base)).fetch_user_data("abc").await.unwrap();

        assert_eq!(data.settings, None);
        assert_eq!(data.logs.len(), 2);
        assert_eq!(data.logs[0].meals.lunch.calories, 500.0);
        assert_eq!(data.logs[1].exercise_calories, 250.0);
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_array_logs() {
        let base = spawn_server(fake_service(json!({ "date": "2024-01-01" }))).await;

        let err = store(Some(&base)).fetch_user_data("abc").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_log_succeeds() {
        let base = spawn_server(fake_service(json!([]))).await;

        store(Some(&base))
            .delete_day_log("abc", "2024-01-01")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bearer_key_sent() {
        let base = spawn_server(fake_service(json!([]))).await;
        let settings = UserSettings::new(2000.0, "Ana");

        store_with_key(Some(&base), Some("secret"))
            .save_user_settings("abc", &settings)
            .await
            .unwrap();

        let err = store(Some(&base))
            .save_user_settings("abc", &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ApiError { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let base = spawn_server(fake_service(json!([]))).await;

        let err = store(Some(&base))
            .save_day_log("abc", &DayLog::empty("2024-01-01"))
            .await
            .unwrap_err();

        match err {
            StoreError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
