// ABOUTME: The key/value storage port every persisted value flows through, and its error type.
// ABOUTME: Backends: in-memory with an optional quota, one-file-per-key on disk, and a SQLite table.

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Errors a storage backend can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the write for lack of space. Data may be lost if
    /// this is swallowed, so it is always surfaced to the caller.
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}

/// A flat namespace of string values addressed by string keys. Every write
/// replaces the whole value at a key; writes to one key are atomic, writes
/// across keys are independent.
pub trait KvStore: Send + Sync {
    /// Raw value at `key`, or None if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value at `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Keys become file names and table rows, so keep them to a safe alphabet.
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
