//! Session orchestration

use crate::config::{Config, TrackerConfig};
use crate::engine::{self, AggregationResult, HistoryEntry};
use crate::insight::InsightClient;
use crate::mirror::{LocalMirror, MirrorError, USER_ID_KEY};
use crate::model::{parse_date, DateRange, DayLog, UserSettings, ValidationError};
use crate::store::{DayLogStore, HttpDocumentStore, StoreError};
use crate::tracker::status::{SyncIndicator, SyncStatus};
use crate::tracker::TrackerError;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory view of the user's data
#[derive(Debug, Clone)]
struct SessionState {
    settings: UserSettings,
    /// Sorted by date, one entry per date
    logs: Vec<DayLog>,
    online: bool,
    last_error: Option<String>,
    last_sync: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            logs: Vec::new(),
            online: false,
            last_error: None,
            last_sync: None,
        }
    }
}

/// What a load (or reload) ended up using
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    pub online: bool,
    pub settings_from_remote: bool,
    pub logs_from_remote: bool,
}

/// Result of a local-then-remote write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WriteOutcome {
    /// Saved locally and remotely
    Synced,
    /// Saved locally; the remote write failed
    LocalOnly { error: String },
}

impl WriteOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, WriteOutcome::Synced)
    }
}

/// Snapshot for status displays
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStatus {
    pub user_id: String,
    pub online: bool,
    pub sync: SyncStatus,
    pub store: String,
    pub log_count: usize,
    pub last_error: Option<String>,
    pub last_sync: Option<DateTime<Utc>>,
}

/// A user's tracking session
pub struct Tracker {
    store: Arc<dyn DayLogStore>,
    mirror: Arc<LocalMirror>,
    insight: Arc<InsightClient>,
    user_id: RwLock<String>,
    state: RwLock<SessionState>,
    indicator: SyncIndicator,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new(
        store: Arc<dyn DayLogStore>,
        mirror: Arc<LocalMirror>,
        insight: Arc<InsightClient>,
        user_id: String,
        config: TrackerConfig,
    ) -> Self {
        Self {
            store,
            mirror,
            insight,
            user_id: RwLock::new(user_id),
            state: RwLock::new(SessionState::default()),
            indicator: SyncIndicator::new(Duration::from_millis(config.status_display_ms)),
            config,
        }
    }

    /// Wire up the HTTP store, the on-disk mirror and the insight client
    ///
    /// The user id comes from the mirror, created on first run. Call
    /// [`Tracker::load`] before use.
    pub fn from_config(config: &Config) -> Result<Self, TrackerError> {
        let store = HttpDocumentStore::new(&config.store)?;
        if !store.is_configured() {
            tracing::info!("No remote store configured, running local-only");
        }
        let mirror = LocalMirror::open(&config.mirror.path)?;
        let insight = InsightClient::new(&config.insight)?;
        let user_id = mirror.user_id()?;

        Ok(Self::new(
            Arc::new(store),
            Arc::new(mirror),
            Arc::new(insight),
            user_id,
            config.tracker.clone(),
        ))
    }

    pub async fn user_id(&self) -> String {
        self.user_id.read().await.clone()
    }

    /// Read the mirror, then refresh from the remote store
    ///
    /// Remote settings replace local ones when present; remote logs replace
    /// local ones only when the remote collection is non-empty.
    pub async fn load(&self) -> LoadOutcome {
        let user_id = self.user_id().await;

        {
            let mut state = self.state.write().await;
            match self.mirror.load_settings() {
                Ok(Some(settings)) => state.settings = settings,
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to read mirrored settings"),
            }
            match self.mirror.load_logs() {
                Ok(Some(logs)) => state.logs = normalize(logs),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to read mirrored logs"),
            }
        }

        let data = match self.store.fetch_user_data(&user_id).await {
            Ok(data) => data,
            Err(e) => {
                log_remote_failure("load", &e);
                let mut state = self.state.write().await;
                state.online = false;
                state.last_error = Some(e.to_string());
                return LoadOutcome {
                    online: false,
                    settings_from_remote: false,
                    logs_from_remote: false,
                };
            }
        };

        let mut state = self.state.write().await;
        let settings_from_remote = data.settings.is_some();
        let logs_from_remote = !data.logs.is_empty();

        if let Some(settings) = data.settings {
            self.mirror_settings(&settings);
            state.settings = settings;
        }
        if logs_from_remote {
            state.logs = normalize(data.logs);
            self.mirror_logs(&state.logs);
        }

        state.online = true;
        state.last_error = None;
        state.last_sync = Some(Utc::now());

        tracing::info!(
            user_id = %user_id,
            settings_from_remote,
            logs_from_remote,
            logs = state.logs.len(),
            "Loaded user data"
        );

        LoadOutcome {
            online: true,
            settings_from_remote,
            logs_from_remote,
        }
    }

    pub async fn save_settings(&self, settings: UserSettings) -> Result<WriteOutcome, TrackerError> {
        settings.validate()?;

        {
            let mut state = self.state.write().await;
            state.settings = settings.clone();
            self.mirror_settings(&state.settings);
        }

        let token = self.indicator.begin().await;
        let user_id = self.user_id().await;
        let result = self.store.save_user_settings(&user_id, &settings).await;
        Ok(self.record_write("save_settings", token, result).await)
    }

    /// Replace the log for `log.date`
    pub async fn save_log(&self, log: DayLog) -> Result<WriteOutcome, TrackerError> {
        log.validate()?;

        {
            let mut state = self.state.write().await;
            match state.logs.binary_search_by(|l| l.date.cmp(&log.date)) {
                Ok(i) => state.logs[i] = log.clone(),
                Err(i) => state.logs.insert(i, log.clone()),
            }
            self.mirror_logs(&state.logs);
        }

        let token = self.indicator.begin().await;
        let user_id = self.user_id().await;
        let result = self.store.save_day_log(&user_id, &log).await;
        Ok(self.record_write("save_log", token, result).await)
    }

    /// Remove the log for `date`
    ///
    /// A date that is not a valid `YYYY-MM-DD` is accepted only when a stored
    /// log carries exactly that key.
    pub async fn delete_log(&self, date: &str) -> Result<WriteOutcome, TrackerError> {
        {
            let mut state = self.state.write().await;
            if !state.logs.iter().any(|l| l.date == date) {
                parse_date(date)?;
            }
            state.logs.retain(|l| l.date != date);
            self.mirror_logs(&state.logs);
        }

        let token = self.indicator.begin().await;
        let user_id = self.user_id().await;
        let result = self.store.delete_day_log(&user_id, date).await;
        Ok(self.record_write("delete_log", token, result).await)
    }

    /// Switch to another identity (linking a second device) and reload
    pub async fn set_user_id(&self, user_id: &str) -> Result<LoadOutcome, TrackerError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }

        self.mirror.set_user_id(user_id)?;
        *self.user_id.write().await = user_id.to_string();
        tracing::info!(user_id = %user_id, "Switched user identity");

        Ok(self.load().await)
    }

    pub async fn dashboard(&self, range: &DateRange) -> AggregationResult {
        let state = self.state.read().await;
        engine::aggregate(&state.logs, &state.settings, range)
    }

    pub async fn history(&self, range: &DateRange) -> Vec<HistoryEntry> {
        let state = self.state.read().await;
        engine::history(&state.logs, range)
    }

    pub async fn log(&self, date: &str) -> Option<DayLog> {
        let state = self.state.read().await;
        state.logs.iter().find(|l| l.date == date).cloned()
    }

    pub async fn settings(&self) -> UserSettings {
        self.state.read().await.settings.clone()
    }

    /// Every log, oldest first
    pub async fn logs(&self) -> Vec<DayLog> {
        self.state.read().await.logs.clone()
    }

    pub async fn status(&self) -> TrackerStatus {
        let sync = self.indicator.current().await;
        let user_id = self.user_id().await;
        let state = self.state.read().await;

        TrackerStatus {
            user_id,
            online: state.online,
            sync,
            store: self.store.name().to_string(),
            log_count: state.logs.len(),
            last_error: state.last_error.clone(),
            last_sync: state.last_sync,
        }
    }

    /// Verify the mirror database still answers
    pub fn check_mirror(&self) -> Result<(), MirrorError> {
        self.mirror.get(USER_ID_KEY).map(|_| ())
    }

    /// Aggregate `range` and ask the insight service to summarise it
    pub async fn generate_insight(&self, range: &DateRange) -> String {
        let (filtered, settings, result) = {
            let state = self.state.read().await;
            let filtered: Vec<DayLog> = engine::filter_by_range(&state.logs, range)
                .into_iter()
                .cloned()
                .collect();
            let result = engine::aggregate(&state.logs, &state.settings, range);
            (filtered, state.settings.clone(), result)
        };

        let logs: Vec<&DayLog> = filtered.iter().collect();
        self.insight
            .generate_insight(&logs, &settings, &result.totals, result.weight_change_kg)
            .await
    }

    /// Range from optional bounds, defaulting to the configured window
    /// ending today
    pub fn resolve_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<DateRange, ValidationError> {
        DateRange::resolve(
            start,
            end,
            Local::now().date_naive(),
            self.config.default_range_days,
        )
    }

    async fn record_write(
        &self,
        operation: &str,
        token: u64,
        result: Result<(), StoreError>,
    ) -> WriteOutcome {
        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                state.online = true;
                state.last_error = None;
                state.last_sync = Some(Utc::now());
                drop(state);
                self.indicator.finish(token, SyncStatus::Saved).await;
                tracing::debug!(operation, "Remote write succeeded");
                WriteOutcome::Synced
            }
            Err(e) => {
                log_remote_failure(operation, &e);
                let error = e.to_string();
                state.online = false;
                state.last_error = Some(error.clone());
                drop(state);
                self.indicator.finish(token, SyncStatus::Error).await;
                WriteOutcome::LocalOnly { error }
            }
        }
    }

    fn mirror_settings(&self, settings: &UserSettings) {
        if let Err(e) = self.mirror.save_settings(settings) {
            tracing::warn!(error = %e, "Failed to mirror settings");
        }
    }

    fn mirror_logs(&self, logs: &[DayLog]) {
        if let Err(e) = self.mirror.save_logs(logs) {
            tracing::warn!(error = %e, "Failed to mirror logs");
        }
    }
}

fn log_remote_failure(operation: &str, error: &StoreError) {
    match error {
        StoreError::NotConfigured => {
            tracing::debug!(operation, "Remote store not configured, keeping local copy")
        }
        _ => tracing::warn!(operation, error = %error, "Remote store unavailable, keeping local copy"),
    }
}

/// Sort by date and keep the last entry for each date
fn normalize(mut logs: Vec<DayLog>) -> Vec<DayLog> {
    logs.reverse();
    logs.sort_by(|a, b| a.date.cmp(&b.date));
    logs.dedup_by(|a, b| a.date == b.date);
    logs
}
