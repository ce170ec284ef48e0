//! Key-value store implementations.

use crate::storage::AtomicFile;
use roast_core::error::{Result, RoastError};
use roast_core::storage::KeyValueStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// One `<key>.json` file per key under a directory.
///
/// Keys are restricted to `[A-Za-z0-9_-]` so they map to plain file names.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RoastError::storage(format!("Invalid storage key: '{}'", key)));
        }
        Ok(AtomicFile::new(self.dir.join(format!("{}.json", key))))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.file_for(key)?.read()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.file_for(key)?.write(value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.file_for(key)?.remove()
    }
}

/// Process-local store, used by tests and `--no-persist` runs.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| RoastError::internal(format!("Store lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RoastError::internal(format!("Store lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RoastError::internal(format!("Store lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}
