// ABOUTME: In-process key/value store mirroring a browser's origin storage, including its quota.
// ABOUTME: Usage is counted as key bytes plus value bytes across all keys.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{KvStore, StoreError, check_key};

/// Volatile storage held in a map. With a quota set, a write that would push
/// total usage past it fails with `QuotaExceeded` and leaves the old value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently used by all keys and values.
    pub fn usage_bytes(&self) -> Result<usize, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.iter().map(|(k, v)| k.len() + v.len()).sum())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
