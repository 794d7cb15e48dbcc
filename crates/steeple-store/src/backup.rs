// ABOUTME: Backup document export and validated, destructive import of configuration plus every collection.
// ABOUTME: Import validates the whole document before writing, then replaces everything in one journaled batch.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use steeple_core::{CONFIG_KEY, CollectionKey, Collections, StoredConfig};
use thiserror::Error;

use crate::repository::{Repository, RepositoryError};

/// Errors that can occur while reading or applying a backup.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The document is structurally wrong; nothing was written.
    #[error("invalid backup format: {0}")]
    InvalidFormat(String),

    #[error("backup is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// When a backup was taken. Exports write RFC 3339 text; older documents
/// carry milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackupTimestamp {
    Text(String),
    Millis(i64),
}

impl BackupTimestamp {
    pub fn now() -> Self {
        BackupTimestamp::Text(Utc::now().to_rfc3339())
    }

    /// The instant, if the stored form can be interpreted.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            BackupTimestamp::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            BackupTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
        }
    }
}

impl std::fmt::Display for BackupTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.to_datetime(), self) {
            (Some(dt), _) => write!(f, "{}", dt.to_rfc3339()),
            (None, BackupTimestamp::Text(s)) => f.write_str(s),
            (None, BackupTimestamp::Millis(ms)) => write!(f, "{}ms", ms),
        }
    }
}

/// A self-describing snapshot of the whole site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: String,
    pub timestamp: BackupTimestamp,
    pub config: Map<String, Value>,
    /// Storage key to item array, one entry per registered collection.
    pub data: Map<String, Value>,
}

/// Snapshot the merged configuration and every registered collection.
pub async fn export_backup(repo: &Repository) -> BackupDocument {
    let (config, collections) = futures::join!(
        repo.get_site_config(),
        join_all(CollectionKey::ALL.iter().map(|key| repo.load_value(*key)))
    );

    let data: Map<String, Value> = CollectionKey::ALL
        .iter()
        .zip(collections)
        .map(|(key, value)| (key.storage_key().to_string(), value))
        .collect();

    tracing::info!("exported backup with {} collections", data.len());

    BackupDocument {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: BackupTimestamp::now(),
        config: StoredConfig::from(&config).0,
        data,
    }
}

/// Parse and validate a backup document from text.
pub fn parse_backup(text: &str) -> Result<BackupDocument, BackupError> {
    let value: Value = serde_json::from_str(text)?;
    validate_backup(&value)
}

/// Check a candidate document without writing anything.
///
/// `config` and `data` must both be objects, and every registered collection
/// present in `data` must be an array whose items fit the collection's type.
/// Unrecognised `data` keys are dropped with a warning.
pub fn validate_backup(doc: &Value) -> Result<BackupDocument, BackupError> {
    let invalid = |msg: &str| BackupError::InvalidFormat(msg.to_string());

    let obj = doc
        .as_object()
        .ok_or_else(|| invalid("backup is not a JSON object"))?;

    let config = match obj.get("config") {
        None => return Err(invalid("missing `config`")),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(invalid("`config` must be an object")),
    };

    let raw_data = match obj.get("data") {
        None => return Err(invalid("missing `data`")),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(invalid("`data` must be an object")),
    };

    let mut data = Map::new();
    for (name, value) in raw_data {
        let Some(key) = CollectionKey::from_storage_key(name) else {
            tracing::warn!(key = %name, "ignoring unknown collection in backup");
            continue;
        };
        if !value.is_array() {
            return Err(BackupError::InvalidFormat(format!(
                "`data.{}` must be an array",
                name
            )));
        }
        Collections::default()
            .set_value(key, value.clone())
            .map_err(|e| BackupError::InvalidFormat(format!("`data.{}`: {}", name, e)))?;
        data.insert(name.clone(), value.clone());
    }

    let version = match obj.get("version") {
        Some(Value::String(v)) => v.clone(),
        _ => "unknown".to_string(),
    };
    let timestamp = match obj.get("timestamp") {
        Some(Value::String(s)) => BackupTimestamp::Text(s.clone()),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(ms) => BackupTimestamp::Millis(ms),
            None => return Err(invalid("`timestamp` must be whole milliseconds")),
        },
        _ => BackupTimestamp::Text(String::new()),
    };

    Ok(BackupDocument {
        version,
        timestamp,
        config,
        data,
    })
}

/// Replace the configuration and every collection with the document's
/// contents. Collections the document lacks are emptied. Returns the batch id.
pub async fn import_backup(repo: &Repository, doc: &BackupDocument) -> Result<String, BackupError> {
    let mut writes = Vec::with_capacity(CollectionKey::ALL.len() + 1);
    writes.push((CONFIG_KEY.to_string(), Value::Object(doc.config.clone())));
    for key in CollectionKey::ALL {
        let items = doc
            .data
            .get(key.storage_key())
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        writes.push((key.storage_key().to_string(), items));
    }

    let batch_id = repo.write_batch(writes).await?;
    tracing::info!(
        batch_id = %batch_id,
        version = %doc.version,
        taken_at = %doc.timestamp,
        "restored backup"
    );
    Ok(batch_id)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::backend::MemoryStore;
    use serde_json::json;
    use steeple_core::{Announcement, Book, Priority, SiteConfig};

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStore::new())).with_latency(Duration::from_millis(1))
    }

    async fn seeded() -> Repository {
        let repo = repo();
        let mut stored = StoredConfig::new();
        stored.insert("churchName", "Test Church");
        repo.set_config(&stored).await.unwrap();
        repo.save(&[Book {
            id: "b1".to_string(),
            title: "Romans".to_string(),
            ..Book::default()
        }])
        .await
        .unwrap();
        repo.save(&[Announcement {
            id: "a1".to_string(),
            priority: Priority::Urgent,
            timestamp: 100,
            ..Announcement::default()
        }])
        .await
        .unwrap();
        repo
    }

    async fn snapshot(repo: &Repository) -> (SiteConfig, Vec<Value>) {
        let config = repo.get_site_config().await;
        let mut collections = Vec::new();
        for key in CollectionKey::ALL {
            collections.push(repo.load_value(*key).await);
        }
        (config, collections)
    }

    #[tokio::test]
    async fn export_lists_every_collection() {
        let repo = seeded().await;
        let doc = export_backup(&repo).await;

        assert_eq!(doc.version, env!("CARGO_PKG_VERSION"));
        assert!(doc.timestamp.to_datetime().is_some());
        assert_eq!(doc.data.len(), CollectionKey::ALL.len());
        assert_eq!(doc.config["churchName"], "Test Church");
        assert_eq!(doc.data["jcbc_books"][0]["id"], "b1");
    }

    #[tokio::test]
    async fn import_of_export_is_a_no_op() {
        let repo = seeded().await;
        let before = snapshot(&repo).await;

        let doc = export_backup(&repo).await;
        let text = serde_json::to_string(&doc).unwrap();
        import_backup(&repo, &parse_backup(&text).unwrap()).await.unwrap();

        assert_eq!(snapshot(&repo).await, before);
    }

    #[tokio::test]
    async fn restoring_an_export_fits_in_nearly_full_storage() {
        let repo = Repository::new(Arc::new(MemoryStore::with_quota(26_000)))
            .with_latency(Duration::from_millis(1));
        let mut stored = StoredConfig::new();
        stored.insert("churchName", "Test Church");
        repo.set_config(&stored).await.unwrap();
        repo.save(&[Book {
            id: "b1".to_string(),
            description: "x".repeat(9_000),
            ..Book::default()
        }])
        .await
        .unwrap();

        let doc = export_backup(&repo).await;
        import_backup(&repo, &doc).await.unwrap();
        import_backup(&repo, &doc).await.unwrap();

        assert_eq!(repo.load::<Book>().await[0].description.len(), 9_000);
        assert_eq!(repo.get_site_config().await.church_name, "Test Church");
        assert!(repo.store().read_raw(crate::journal::JOURNAL_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn import_restores_corrupted_config() {
        let repo = seeded().await;
        let doc = export_backup(&repo).await;

        let mut corrupted = StoredConfig::new();
        corrupted.insert("churchName", "Vandalized");
        repo.set_config(&corrupted).await.unwrap();
        repo.save::<Book>(&[]).await.unwrap();

        import_backup(&repo, &doc).await.unwrap();

        assert_eq!(repo.get_site_config().await.church_name, "Test Church");
        assert_eq!(repo.load::<Book>().await.len(), 1);
    }

    #[tokio::test]
    async fn missing_sections_fail_before_any_write() {
        let repo = seeded().await;
        let before = snapshot(&repo).await;

        for doc in [
            json!({"version": "1", "timestamp": 0, "data": {}}),
            json!({"version": "1", "timestamp": 0, "config": {}}),
            json!({"config": [], "data": {}}),
            json!("not a document"),
        ] {
            let err = validate_backup(&doc).unwrap_err();
            assert!(matches!(err, BackupError::InvalidFormat(_)), "{:?}", doc);
        }

        assert_eq!(snapshot(&repo).await, before);
    }

    #[test]
    fn non_array_collection_is_rejected() {
        let err = validate_backup(&json!({
            "config": {},
            "data": {"jcbc_books": {"id": "b1"}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("jcbc_books"));
    }

    #[test]
    fn mistyped_items_are_rejected() {
        let err = validate_backup(&json!({
            "config": {},
            "data": {"jcbc_staff": [{"id": "s1", "order": "first"}]}
        }))
        .unwrap_err();
        assert!(matches!(err, BackupError::InvalidFormat(_)));
    }

    #[test]
    fn unknown_collections_are_dropped_and_millis_accepted() {
        let doc = validate_backup(&json!({
            "version": "1.0",
            "timestamp": 1_700_000_000_000_i64,
            "config": {"churchName": "X"},
            "data": {"jcbc_books": [], "jcbc_future_thing": [1, 2]}
        }))
        .unwrap();

        assert_eq!(doc.timestamp, BackupTimestamp::Millis(1_700_000_000_000));
        assert!(doc.timestamp.to_datetime().is_some());
        assert!(doc.data.contains_key("jcbc_books"));
        assert!(!doc.data.contains_key("jcbc_future_thing"));
    }

    #[tokio::test]
    async fn missing_collections_are_emptied_on_import() {
        let repo = seeded().await;
        let doc = validate_backup(&json!({
            "config": {"churchName": "Restored"},
            "data": {}
        }))
        .unwrap();

        import_backup(&repo, &doc).await.unwrap();

        assert!(repo.load::<Book>().await.is_empty());
        assert!(repo.load::<Announcement>().await.is_empty());
        assert_eq!(repo.get_site_config().await.church_name, "Restored");
    }

    #[test]
    fn unparseable_text_is_a_parse_error() {
        assert!(matches!(parse_backup("{oops"), Err(BackupError::Parse(_))));
    }
}
