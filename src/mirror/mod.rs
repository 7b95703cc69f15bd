//! Local Mirror
//!
//! A small on-device key/value store that keeps the last known settings,
//! the full day-log collection and the user's identity. It is written before
//! every remote call so the tracker keeps working while the remote store is
//! unreachable.
//!
//! Values are JSON blobs under fixed keys:
//!
//! | key                   | value                    |
//! |-----------------------|--------------------------|
//! | `nutritrack_settings` | `UserSettings` object    |
//! | `nutritrack_logs`     | array of `DayLog`        |
//! | `nutritrack_userid`   | plain user id string     |

mod error;
mod local;

pub use error::MirrorError;
pub use local::LocalMirror;

pub const SETTINGS_KEY: &str = "nutritrack_settings";
pub const LOGS_KEY: &str = "nutritrack_logs";
pub const USER_ID_KEY: &str = "nutritrack_userid";
