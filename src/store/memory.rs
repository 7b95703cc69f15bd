//! In-process store
//!
//! Holds documents in a map behind an async lock. `set_available(false)`
//! makes every call fail with [`StoreError::Unavailable`], which is how the
//! offline paths of the tracker are exercised.

use crate::model::{DayLog, UserSettings};
use crate::store::{DayLogStore, StoreError, UserData};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct UserDocuments {
    settings: Option<UserSettings>,
    logs: BTreeMap<String, DayLog>,
}

/// Day-log store kept in memory
#[derive(Debug)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserDocuments>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the remote going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Seed a user's documents directly
    pub async fn insert(&self, user_id: &str, data: UserData) {
        let mut users = self.users.write().await;
        let docs = users.entry(user_id.to_string()).or_default();
        docs.settings = data.settings;
        docs.logs = data
            .logs
            .into_iter()
            .map(|log| (log.date.clone(), log))
            .collect();
    }

    /// Stored log for `(user_id, date)`, if any
    pub async fn get_log(&self, user_id: &str, date: &str) -> Option<DayLog> {
        let users = self.users.read().await;
        users.get(user_id)?.logs.get(date).cloned()
    }

    /// Stored settings for `user_id`, if any
    pub async fn get_settings(&self, user_id: &str) -> Option<UserSettings> {
        let users = self.users.read().await;
        users.get(user_id)?.settings.clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

#[async_trait]
impl DayLogStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_user_data(&self, user_id: &str) -> Result<UserData, StoreError> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|docs| UserData {
                settings: docs.settings.clone(),
                logs: docs.logs.values().cloned().collect(),
            })
            .unwrap_or_default())
    }

    async fn save_user_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().settings = Some(settings.clone());
        Ok(())
    }

    async fn save_day_log(&self, user_id: &str, log: &DayLog) -> Result<(), StoreError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        users
            .entry(user_id.to_string())
            .or_default()
            .logs
            .insert(log.date.clone(), log.clone());
        Ok(())
    }

    async fn delete_day_log(&self, user_id: &str, date: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        if let Some(docs) = users.get_mut(user_id) {
            docs.logs.remove(date);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_delete() {
        let store = MemoryStore::new();
        let log = DayLog::empty("2024-01-01").exercise(200.0);

        store.save_day_log("u1", &log).await.unwrap();
        store
            .save_day_log("u1", &log.clone().exercise(350.0))
            .await
            .unwrap();

        let data = store.fetch_user_data("u1").await.unwrap();
        assert_eq!(data.logs.len(), 1);
        assert_eq!(data.logs[0].exercise_calories, 350.0);
        assert!(data.settings.is_none());

        store.delete_day_log("u1", "2024-01-01").await.unwrap();
        store.delete_day_log("u1", "2024-01-01").await.unwrap();
        assert!(store.get_log("u1", "2024-01-01").await.is_none());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = MemoryStore::new();
        store
            .save_user_settings("u1", &UserSettings::new(1800.0, "A"))
            .await
            .unwrap();

        assert!(store.get_settings("u2").await.is_none());
        assert_eq!(store.fetch_user_data("u2").await.unwrap(), UserData::default());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let store = MemoryStore::new();
        store.set_available(false);

        assert!(matches!(
            store.fetch_user_data("u1").await,
            Err(StoreError::Unavailable)
        ));
        assert!(store
            .save_day_log("u1", &DayLog::empty("2024-01-01"))
            .await
            .is_err());

        store.set_available(true);
        assert!(store.fetch_user_data("u1").await.is_ok());
    }
}
