//! Sync status indicator
//!
//! `Saved` and `Error` are transient: after the display period they fall
//! back to `Idle`, unless a newer operation has started in the meantime.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// What the last remote write is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Idle,
    Syncing,
    Saved,
    Error,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Saved => "saved",
            SyncStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct IndicatorState {
    status: SyncStatus,
    generation: u64,
}

/// Shared, self-reverting status flag
#[derive(Debug, Clone)]
pub struct SyncIndicator {
    state: Arc<RwLock<IndicatorState>>,
    display: Duration,
}

impl SyncIndicator {
    pub fn new(display: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(IndicatorState {
                status: SyncStatus::Idle,
                generation: 0,
            })),
            display,
        }
    }

    pub async fn current(&self) -> SyncStatus {
        self.state.read().await.status
    }

    /// Mark a new operation as in flight; returns its token
    pub async fn begin(&self) -> u64 {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.status = SyncStatus::Syncing;
        state.generation
    }

    /// Record the outcome of the operation started with `token`
    ///
    /// Ignored if a newer operation has begun since.
    pub async fn finish(&self, token: u64, status: SyncStatus) {
        {
            let mut state = self.state.write().await;
            if state.generation != token {
                return;
            }
            state.status = status;
        }

        if !matches!(status, SyncStatus::Saved | SyncStatus::Error) {
            return;
        }

        let state = Arc::clone(&self.state);
        let display = self.display;
        tokio::spawn(async move {
            tokio::time::sleep(display).await;
            let mut state = state.write().await;
            if state.generation == token && state.status == status {
                state.status = SyncStatus::Idle;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_saved_reverts_to_idle() {
        let indicator = SyncIndicator::new(Duration::from_millis(20));

        let token = indicator.begin().await;
        assert_eq!(indicator.current().await, SyncStatus::Syncing);

        indicator.finish(token, SyncStatus::Saved).await;
        assert_eq!(indicator.current().await, SyncStatus::Saved);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(indicator.current().await, SyncStatus::Idle);
    }

    #[tokio::test]
    async fn test_newer_operation_is_not_reverted() {
        let indicator = SyncIndicator::new(Duration::from_millis(20));

        let first = indicator.begin().await;
        indicator.finish(first, SyncStatus::Error).await;
        let second = indicator.begin().await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(indicator.current().await, SyncStatus::Syncing);

        indicator.finish(second, SyncStatus::Saved).await;
        assert_eq!(indicator.current().await, SyncStatus::Saved);
    }

    #[tokio::test]
    async fn test_stale_finish_is_ignored() {
        let indicator = SyncIndicator::new(Duration::from_secs(60));

        let first = indicator.begin().await;
        let _second = indicator.begin().await;
        indicator.finish(first, SyncStatus::Error).await;

        assert_eq!(indicator.current().await, SyncStatus::Syncing);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&SyncStatus::Saved).unwrap(), "\"saved\"");
        assert_eq!(SyncStatus::Syncing.to_string(), "syncing");
    }
}
