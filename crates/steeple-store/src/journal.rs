// ABOUTME: Write-ahead journal for multi-key batches (admin publish, backup import).
// ABOUTME: Persists after-images only, writes concurrently, rolls back on failure, rolls forward on restart.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ulid::Ulid;

use crate::backend::StoreError;
use crate::persisted::PersistedStore;

/// Storage key holding the journal of the batch in flight, if any.
pub const JOURNAL_KEY: &str = "steeple_publish_journal";

/// Errors from journaled batch writes and their recovery.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("could not read current value of {key}: {source}")]
    Snapshot {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The journal itself could not be written; no key was touched.
    #[error("could not record publish journal: {0}")]
    Record(#[source] StoreError),

    /// One write failed; every key in the batch was restored to its prior value.
    #[error("write to {key} failed and the batch was rolled back: {source}")]
    RolledBack {
        key: String,
        #[source]
        source: StoreError,
    },

    /// One write failed and some keys could not be restored either. The
    /// journal is kept so startup recovery completes the batch.
    #[error(
        "write to {key} failed and {} could not be rolled back; the batch will be completed on next startup: {source}",
        .unrestored.join(", ")
    )]
    Incomplete {
        key: String,
        unrestored: Vec<String>,
        #[source]
        source: StoreError,
    },

    #[error("write task failed and the batch was rolled back: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("publish journal is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl JournalError {
    /// The storage failure underneath, if this error came from the backend.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            JournalError::Snapshot { source, .. }
            | JournalError::RolledBack { source, .. }
            | JournalError::Incomplete { source, .. } => Some(source),
            JournalError::Record(source) | JournalError::Store(source) => Some(source),
            JournalError::Task(_) | JournalError::Corrupt(_) => None,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.store_error().is_some_and(StoreError::is_quota_exceeded)
    }
}

/// One key of a batch and the value it must end up holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub key: String,
    pub after: Value,
}

/// The batch in flight. Its presence in storage means "not yet committed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub batch_id: String,
    pub started_at: DateTime<Utc>,
    pub entries: Vec<JournalEntry>,
}

/// What startup recovery did with a leftover journal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryReport {
    pub batch_id: String,
    pub started_at: DateTime<Utc>,
    pub keys_rolled_forward: Vec<String>,
}

/// A key the batch will rewrite, with its prior raw text held in memory for rollback.
struct PendingWrite {
    key: String,
    before: Option<String>,
    after: String,
}

/// Write every `(key, value)` pair as one journaled batch.
///
/// Sequence:
/// 1. Read every key; keys already holding their new value are left out
/// 2. Record the journal of after-images; if that fails, nothing else is written
/// 3. Issue all writes concurrently
/// 4. On any failure, restore the before-images kept in memory and drop the
///    journal. If a restore fails too, the journal stays for startup recovery
/// 5. On success, drop the journal
///
/// Returns the batch id.
pub async fn commit_batch(
    store: &PersistedStore,
    writes: Vec<(String, Value)>,
) -> Result<String, JournalError> {
    let batch_id = Ulid::new().to_string();

    // Step 1: before-images
    let mut pending = Vec::with_capacity(writes.len());
    let mut entries = Vec::with_capacity(writes.len());
    for (key, after) in writes {
        let before = store
            .read_raw(&key)
            .map_err(|source| JournalError::Snapshot {
                key: key.clone(),
                source,
            })?;
        let unchanged = before
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .is_some_and(|current| current == after);
        if unchanged {
            continue;
        }
        pending.push(PendingWrite {
            key: key.clone(),
            before,
            after: serde_json::to_string(&after).map_err(StoreError::from)?,
        });
        entries.push(JournalEntry { key, after });
    }

    if pending.is_empty() {
        tracing::debug!(batch_id = %batch_id, "batch changes nothing");
        return Ok(batch_id);
    }

    let journal = Journal {
        batch_id: batch_id.clone(),
        started_at: Utc::now(),
        entries,
    };

    // Step 2: write-ahead record
    if store.read_raw(JOURNAL_KEY).ok().flatten().is_some() {
        tracing::warn!("overwriting a publish journal that was never recovered");
    }
    store.write(JOURNAL_KEY, &journal).map_err(JournalError::Record)?;

    // Step 3: concurrent writes
    let tasks = pending.iter().map(|write| {
        let store = store.clone();
        let key = write.key.clone();
        let after = write.after.clone();
        tokio::task::spawn_blocking(move || store.write_raw(&key, &after).map_err(|e| (key, e)))
    });
    let results = join_all(tasks).await;

    let mut failure: Option<JournalError> = None;
    let mut untouched: Vec<String> = Vec::new();
    for result in results {
        let err = match result {
            Ok(Ok(())) => continue,
            Ok(Err((key, source))) => {
                untouched.push(key.clone());
                JournalError::RolledBack { key, source }
            }
            Err(join_err) => JournalError::Task(join_err),
        };
        if failure.is_none() {
            failure = Some(err);
        }
    }

    // Step 4: roll back
    if let Some(err) = failure {
        tracing::error!(batch_id = %batch_id, "batch write failed, rolling back: {}", err);
        let unrestored = rollback(store, &pending, &untouched);
        if unrestored.is_empty() {
            drop_journal(store);
            return Err(err);
        }
        tracing::error!(
            batch_id = %batch_id,
            "rollback incomplete, keeping journal for recovery: {}",
            unrestored.join(", ")
        );
        return Err(match err {
            JournalError::RolledBack { key, source } => JournalError::Incomplete {
                key,
                unrestored,
                source,
            },
            other => other,
        });
    }

    // Step 5: commit
    drop_journal(store);
    tracing::info!(batch_id = %batch_id, "committed batch of {} keys", pending.len());
    Ok(batch_id)
}

/// Restore every key whose write may have landed. A failed write is atomic
/// per key, so keys in `untouched` still hold their before-image. Returns the
/// keys that could not be restored.
fn rollback(store: &PersistedStore, pending: &[PendingWrite], untouched: &[String]) -> Vec<String> {
    let mut unrestored = Vec::new();
    for write in pending.iter().filter(|w| !untouched.contains(&w.key)) {
        let restored = match &write.before {
            Some(raw) => store.write_raw(&write.key, raw),
            None => store.remove(&write.key),
        };
        if let Err(e) = restored {
            tracing::error!(key = %write.key, "failed to restore before-image: {}", e);
            unrestored.push(write.key.clone());
        }
    }
    unrestored
}

fn drop_journal(store: &PersistedStore) {
    if let Err(e) = store.remove(JOURNAL_KEY) {
        tracing::warn!("failed to remove publish journal: {}", e);
    }
}

/// Finish a batch interrupted by a crash by writing every after-image, then
/// dropping the journal. Returns None when no journal was left behind.
pub fn recover_interrupted_batch(
    store: &PersistedStore,
) -> Result<Option<RecoveryReport>, JournalError> {
    let Some(raw) = store.read_raw(JOURNAL_KEY)? else {
        tracing::info!("no interrupted batch to recover");
        return Ok(None);
    };

    let journal: Journal = serde_json::from_str(&raw)?;
    tracing::info!(
        batch_id = %journal.batch_id,
        "rolling forward interrupted batch of {} keys started at {}",
        journal.entries.len(),
        journal.started_at
    );

    for entry in &journal.entries {
        store.write(&entry.key, &entry.after)?;
    }
    store.remove(JOURNAL_KEY)?;

    Ok(Some(RecoveryReport {
        batch_id: journal.batch_id,
        started_at: journal.started_at,
        keys_rolled_forward: journal.entries.into_iter().map(|e| e.key).collect(),
    }))
}
