// ABOUTME: Durable key/value store keeping one JSON file per key in a directory.
// ABOUTME: Each write goes to its own uniquely named temp file, is fsynced, then renamed over the target.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{KvStore, StoreError, check_key};

/// Directory-backed storage. A key `k` lives at `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn map_write_error(key: &str, err: std::io::Error) -> StoreError {
    if err.kind() == ErrorKind::StorageFull {
        StoreError::QuotaExceeded {
            key: key.to_string(),
        }
    } else {
        StoreError::Io(err)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        // Per-write temp name: concurrent writers of one key must not share a file.
        let tmp_path = self.dir.join(format!("{}.{}.tmp", key, ulid::Ulid::new()));
        let final_path = self.path_for(key);

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            drop(file);
            fs::rename(&tmp_path, &final_path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            map_write_error(key, e)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
