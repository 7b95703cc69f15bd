//! Tracker
//!
//! Owns a user's session: settings, day-logs and identity. Reads come from
//! memory; writes go to memory, then the local mirror, then the remote
//! store. A remote failure never undoes a local change. It flips the session
//! to offline and is reported once through [`WriteOutcome`] and the sync
//! status.

mod session;
mod status;

pub use session::{LoadOutcome, Tracker, TrackerStatus, WriteOutcome};
pub use status::{SyncIndicator, SyncStatus};

use crate::mirror::MirrorError;
use crate::model::ValidationError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by tracker operations
///
/// Remote failures are not errors here; see [`WriteOutcome::LocalOnly`].
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Local mirror error: {0}")]
    Mirror(#[from] MirrorError),

    #[error("Store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}
