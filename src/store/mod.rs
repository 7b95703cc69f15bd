//! Day-Log Store
//!
//! Remote persistence for settings and day-logs, keyed by user id and date.
//!
//! - **HttpDocumentStore**: JSON document service over HTTP
//! - **MemoryStore**: in-process store for tests and offline runs
//!
//! Writes are whole-document upserts; the last writer wins. Callers treat
//! every error the same way: the remote copy is unavailable, keep going
//! locally.

mod http;
mod memory;

pub use http::HttpDocumentStore;
pub use memory::MemoryStore;

use crate::model::{DayLog, UserSettings};
use async_trait::async_trait;
use thiserror::Error;

/// Everything the store holds for one user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserData {
    /// `None` when the user has never saved settings
    pub settings: Option<UserSettings>,
    pub logs: Vec<DayLog>,
}

/// Remote document store for a user's settings and logs
#[async_trait]
pub trait DayLogStore: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &str;

    /// Fetch settings and every day-log for `user_id`
    async fn fetch_user_data(&self, user_id: &str) -> Result<UserData, StoreError>;

    /// Overwrite the settings document
    async fn save_user_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<(), StoreError>;

    /// Upsert the log keyed by `(user_id, log.date)`
    async fn save_day_log(&self, user_id: &str, log: &DayLog) -> Result<(), StoreError>;

    /// Remove the log for `date`; removing a missing log succeeds
    async fn delete_day_log(&self, user_id: &str, date: &str) -> Result<(), StoreError>;
}

/// Errors that can occur when talking to the remote store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Remote store not configured")]
    NotConfigured,

    #[error("Remote store unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl StoreError {
    /// Classify a transport failure
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_connect() {
            StoreError::Unavailable
        } else {
            StoreError::Request(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::NotConfigured.to_string(), "Remote store not configured");
        let err = StoreError::ApiError {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "API error 403: forbidden");
    }
}
