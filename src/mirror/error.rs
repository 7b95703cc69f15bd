//! Local mirror error types

use thiserror::Error;

/// Errors that can occur in the local mirror
#[derive(Error, Debug)]
pub enum MirrorError {
    /// I/O operation failed (creating the database directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite rejected the operation
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A value could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for MirrorError {
    fn from(e: serde_json::Error) -> Self {
        MirrorError::Serialization(e.to_string())
    }
}
