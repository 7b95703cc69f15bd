//! SQLite-backed key/value mirror

use crate::mirror::{MirrorError, LOGS_KEY, SETTINGS_KEY, USER_ID_KEY};
use crate::model::lenient::log_collection;
use crate::model::{DayLog, UserSettings};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// On-device snapshot of settings, logs and identity
///
/// The connection sits behind a `std::sync::Mutex`; every call is a short
/// synchronous statement.
pub struct LocalMirror {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl LocalMirror {
    /// Create or open a mirror database at `path`
    ///
    /// A leading `~/` is expanded to the home directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MirrorError> {
        let path = expand_home(path.as_ref());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened local mirror");
        Self::init(conn, Some(path))
    }

    /// A mirror that lives only as long as the process
    pub fn open_in_memory() -> Result<Self, MirrorError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, MirrorError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS mirror (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file, `None` for in-memory mirrors
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, MirrorError> {
        self.conn
            .lock()
            .map_err(|e| MirrorError::Lock(e.to_string()))
    }

    /// Raw value stored under `key`
    pub fn get(&self, key: &str) -> Result<Option<String>, MirrorError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM mirror WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set(&self, key: &str, value: &str) -> Result<(), MirrorError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO mirror (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), MirrorError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM mirror WHERE key = ?", params![key])?;
        Ok(())
    }

    /// Last mirrored settings; a corrupt blob reads as absent
    pub fn load_settings(&self) -> Result<Option<UserSettings>, MirrorError> {
        self.load_json(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &UserSettings) -> Result<(), MirrorError> {
        self.set(SETTINGS_KEY, &serde_json::to_string(settings)?)
    }

    /// Last mirrored log collection
    ///
    /// Unreadable elements are skipped; a blob that is not a JSON array reads
    /// as absent.
    pub fn load_logs(&self) -> Result<Option<Vec<DayLog>>, MirrorError> {
        let Some(value) = self.load_json::<serde_json::Value>(LOGS_KEY)? else {
            return Ok(None);
        };

        let logs = log_collection(value);
        if logs.is_none() {
            tracing::warn!(key = LOGS_KEY, "Ignoring mirrored logs that are not a list");
        }
        Ok(logs)
    }

    /// Replace the whole mirrored collection
    pub fn save_logs(&self, logs: &[DayLog]) -> Result<(), MirrorError> {
        self.set(LOGS_KEY, &serde_json::to_string(logs)?)
    }

    /// The persisted user id, creating and storing a random one on first use
    pub fn user_id(&self) -> Result<String, MirrorError> {
        if let Some(id) = self.get(USER_ID_KEY)? {
            let id = id.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.set(USER_ID_KEY, &id)?;
        tracing::info!(user_id = %id, "Created new user identity");
        Ok(id)
    }

    pub fn set_user_id(&self, user_id: &str) -> Result<(), MirrorError> {
        self.set(USER_ID_KEY, user_id)
    }

    fn load_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, MirrorError> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring corrupt mirror entry");
                Ok(None)
            }
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Macros, MealSlot};
    use tempfile::tempdir;

    #[test]
    fn test_get_set_remove() {
        let mirror = LocalMirror::open_in_memory().unwrap();
        assert_eq!(mirror.get("k").unwrap(), None);

        mirror.set("k", "one").unwrap();
        mirror.set("k", "two").unwrap();
        assert_eq!(mirror.get("k").unwrap().as_deref(), Some("two"));

        mirror.remove("k").unwrap();
        assert_eq!(mirror.get("k").unwrap(), None);
    }

    #[test]
    fn test_settings_and_logs_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("mirror.db");

        let logs = vec![
            DayLog::empty("2024-01-01").meal(MealSlot::Lunch, Macros::new(700.0, 40.0, 80.0, 20.0)),
            DayLog::empty("2024-01-02").exercise(300.0),
        ];
        {
            let mirror = LocalMirror::open(&path).unwrap();
            mirror.save_settings(&UserSettings::new(1850.0, "Rui")).unwrap();
            mirror.save_logs(&logs).unwrap();
        }

        let mirror = LocalMirror::open(&path).unwrap();
        assert_eq!(mirror.path(), Some(path.as_path()));
        assert_eq!(
            mirror.load_settings().unwrap(),
            Some(UserSettings::new(1850.0, "Rui"))
        );
        assert_eq!(mirror.load_logs().unwrap(), Some(logs));
    }

    #[test]
    fn test_corrupt_entries_read_as_absent() {
        let mirror = LocalMirror::open_in_memory().unwrap();
        mirror.set(SETTINGS_KEY, "{not json").unwrap();
        mirror.set(LOGS_KEY, "42").unwrap();

        assert_eq!(mirror.load_settings().unwrap(), None);
        assert_eq!(mirror.load_logs().unwrap(), None);
    }

    #[test]
    fn test_partially_corrupt_logs_keep_valid_entries() {
        let mirror = LocalMirror::open_in_memory().unwrap();
        mirror
            .set(
                LOGS_KEY,
                r#"[{"date":"2024-01-01","exerciseCalories":100},null,"x",{"date":"2024-01-02"}]"#,
            )
            .unwrap();

        let logs = mirror.load_logs().unwrap().unwrap();
        let dates: Vec<&str> = logs.iter().map(|l| l.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_user_id_created_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mirror.db");

        let first = LocalMirror::open(&path).unwrap().user_id().unwrap();
        let second = LocalMirror::open(&path).unwrap().user_id().unwrap();

        assert_eq!(first, second);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_set_user_id() {
        let mirror = LocalMirror::open_in_memory().unwrap();
        mirror.set_user_id("shared-device-id").unwrap();
        assert_eq!(mirror.user_id().unwrap(), "shared-device-id");
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/tmp/m.db")), PathBuf::from("/tmp/m.db"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(Path::new("~/data/m.db")),
                home.join("data").join("m.db")
            );
        }
    }
}
