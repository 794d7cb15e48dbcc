// ABOUTME: Typed JSON read/write over the storage port: tolerant reads for display, strict reads for updates.
// ABOUTME: Tolerant reads fall back to the caller's default; strict reads and writes surface every error.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{KvStore, StoreError};

/// Shared handle to one storage namespace.
#[derive(Clone)]
pub struct PersistedStore {
    backend: Arc<dyn KvStore>,
}

impl std::fmt::Debug for PersistedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore").finish_non_exhaustive()
    }
}

impl PersistedStore {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self { backend }
    }

    /// Decode the value at `key`, or return `default` if it is absent, is not
    /// valid JSON for `T`, or the backend cannot be read. Never fails.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.backend.get(key) {
            Ok(None) => default,
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, "malformed stored data, using default: {}", e);
                    default
                }
            },
            Err(e) => {
                tracing::error!(key, "storage read failed, using default: {}", e);
                default
            }
        }
    }

    /// Decode the value at `key` for a read-modify-write. Absent is `None`;
    /// unlike `read`, an undecodable value or backend failure is an error, so
    /// a fallback can never be written back over data that merely failed to parse.
    pub fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    /// Serialize `value` and replace whatever is stored at `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.write_raw(key, &json)
    }

    /// Raw stored text at `key`. Unlike `read`, backend failures are returned.
    pub fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key)
    }

    pub fn write_raw(&self, key: &str, raw: &str) -> Result<(), StoreError> {
        self.backend.set(key, raw).inspect_err(|e| {
            tracing::error!(key, "storage write failed: {}", e);
        })
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    /// The stored JSON at `key` as an untyped value, with the same fallback
    /// rules as `read`.
    pub fn read_value(&self, key: &str, default: Value) -> Value {
        self.read(key, default)
    }
}
