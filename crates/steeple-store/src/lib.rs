// ABOUTME: Persistence layer for steeple: the key/value storage port and its backends.
// ABOUTME: Provides the persisted store, async collection repository, publish journal, backups, and admin workspace.

pub mod admin;
pub mod backend;
pub mod backup;
pub mod journal;
pub mod persisted;
pub mod repository;

pub use admin::{AdminWorkspace, ChangedItem, PublishError, PublishReport, WorkspaceEdit};
pub use backend::{FileStore, KvStore, MemoryStore, SqliteStore, StoreError};
pub use backup::{
    BackupDocument, BackupError, BackupTimestamp, export_backup, import_backup, parse_backup,
    validate_backup,
};
pub use journal::{JOURNAL_KEY, JournalError, RecoveryReport, recover_interrupted_batch};
pub use persisted::PersistedStore;
pub use repository::{DEFAULT_LATENCY, Repository, RepositoryError};
