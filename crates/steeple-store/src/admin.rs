// ABOUTME: The admin panel's in-memory working copy of configuration and every collection.
// ABOUTME: Loads everything concurrently, tracks a baseline, and publishes only what changed as one batch.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use steeple_core::{CONFIG_KEY, CollectionKey, Collections, SiteConfig, StoredConfig};
use thiserror::Error;

use crate::repository::{Repository, RepositoryError};

/// Errors from publishing the workspace.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Nothing from this publish was kept; the user should retry.
    #[error("publish failed and no changes were saved, please retry: {0}")]
    Failed(#[source] RepositoryError),

    /// The collection was edited but its stored data could not be read at
    /// load time, so publishing would replace data nobody has seen.
    #[error("stored {0} could not be read when the workspace loaded; repair or restore it before publishing")]
    Unreadable(CollectionKey),

    #[error("could not serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PublishError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, PublishError::Failed(e) if e.is_quota_exceeded())
    }
}

/// One unit the publish step may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "lowercase")]
pub enum ChangedItem {
    Config,
    Collection(CollectionKey),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishReport {
    /// None when there was nothing to write.
    pub batch_id: Option<String>,
    pub changed: Vec<ChangedItem>,
}

/// The edited state a client sends back for publishing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceEdit {
    pub config: SiteConfig,
    pub collections: Collections,
}

/// Editable copies of everything the admin panel manages, plus the state they
/// were loaded from.
#[derive(Debug, Clone, Serialize)]
pub struct AdminWorkspace {
    pub config: SiteConfig,
    pub collections: Collections,
    /// Collections whose stored data did not decode. They load as empty and
    /// are never published.
    pub unreadable: Vec<CollectionKey>,
    #[serde(skip)]
    baseline_config: SiteConfig,
    #[serde(skip)]
    baseline: Collections,
}

impl AdminWorkspace {
    /// Load the merged configuration and every collection at once.
    pub async fn load(repo: &Repository) -> Self {
        let (config, values) = futures::join!(
            repo.get_site_config(),
            join_all(CollectionKey::ALL.iter().map(|key| repo.try_load_value(*key)))
        );

        let mut collections = Collections::default();
        let mut unreadable = Vec::new();
        for (key, value) in CollectionKey::ALL.iter().zip(values) {
            let loaded = value.and_then(|value| {
                collections
                    .set_value(*key, value)
                    .map_err(|source| RepositoryError::Unreadable { key: *key, source })
            });
            if let Err(e) = loaded {
                tracing::warn!(%key, "collection cannot be edited, publishing it is blocked: {}", e);
                unreadable.push(*key);
            }
        }

        tracing::info!(unreadable = unreadable.len(), "admin workspace loaded");
        let mut workspace = Self::from_parts(config, collections);
        workspace.unreadable = unreadable;
        workspace
    }

    pub fn from_parts(config: SiteConfig, collections: Collections) -> Self {
        Self {
            baseline_config: config.clone(),
            baseline: collections.clone(),
            config,
            collections,
            unreadable: Vec::new(),
        }
    }

    /// Replace the working copies with a client's edits. The baseline stays.
    pub fn apply(&mut self, edit: WorkspaceEdit) {
        self.config = edit.config;
        self.collections = edit.collections;
    }

    /// Throw away unpublished edits.
    pub fn revert(&mut self) {
        self.config = self.baseline_config.clone();
        self.collections = self.baseline.clone();
    }

    /// Everything that differs from the baseline, configuration first.
    pub fn changed(&self) -> Vec<ChangedItem> {
        let mut changed = Vec::new();
        if self.config != self.baseline_config {
            changed.push(ChangedItem::Config);
        }
        for key in CollectionKey::ALL {
            let current = self.collections.to_value(*key).ok();
            let baseline = self.baseline.to_value(*key).ok();
            if current.is_none() || current != baseline {
                changed.push(ChangedItem::Collection(*key));
            }
        }
        changed
    }

    pub fn is_dirty(&self) -> bool {
        !self.changed().is_empty()
    }

    /// Write every changed part as one journaled batch. On failure nothing is
    /// kept and the baseline is unchanged, so a retry publishes the same set.
    pub async fn publish(&mut self, repo: &Repository) -> Result<PublishReport, PublishError> {
        let changed = self.changed();
        if changed.is_empty() {
            tracing::info!("publish: nothing changed");
            return Ok(PublishReport {
                batch_id: None,
                changed,
            });
        }

        let blocked = changed.iter().find_map(|item| match item {
            ChangedItem::Collection(key) if self.unreadable.contains(key) => Some(*key),
            _ => None,
        });
        if let Some(key) = blocked {
            tracing::warn!(%key, "publish refused: collection was unreadable at load");
            return Err(PublishError::Unreadable(key));
        }

        let mut writes = Vec::with_capacity(changed.len());
        for item in &changed {
            let write = match item {
                ChangedItem::Config => (
                    CONFIG_KEY.to_string(),
                    Value::Object(StoredConfig::from(&self.config).0),
                ),
                ChangedItem::Collection(key) => {
                    let value = self.collections.to_value(*key).map_err(|source| {
                        PublishError::Serialize {
                            key: key.storage_key().to_string(),
                            source,
                        }
                    })?;
                    (key.storage_key().to_string(), value)
                }
            };
            writes.push(write);
        }

        let batch_id = repo.write_batch(writes).await.map_err(|e| {
            tracing::error!("publish failed: {}", e);
            PublishError::Failed(e)
        })?;

        self.baseline_config = self.config.clone();
        self.baseline = self.collections.clone();
        tracing::info!(batch_id = %batch_id, "published {} changed items", changed.len());

        Ok(PublishReport {
            batch_id: Some(batch_id),
            changed,
        })
    }
}
