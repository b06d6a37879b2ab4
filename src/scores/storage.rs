//! Key-value storage behind the score keeper
//!
//! The game only needs string values stored under string keys. Two backends
//! are provided: an in-memory map for tests and throwaway sessions, and a
//! single JSON file on disk for real play.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Get/set-by-key capability over strings
pub trait Storage {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// Storage that forgets everything when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage kept as one JSON object in a file
///
/// The file is read once when opened and rewritten in full on every `set`.
/// A missing or unreadable file opens as empty storage.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file at `path`
    pub fn open(path: &Path) -> Self {
        let values = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                tracing::warn!(path = ?path, error = %err, "ignoring corrupt storage file");
                BTreeMap::new()
            }),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = ?path, error = %err, "could not read storage file");
                }
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize storage")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write storage to {:?}", self.path))?;

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("a"), None);

        storage.set("a", "1".to_string()).unwrap();
        storage.set("a", "2".to_string()).unwrap();
        assert_eq!(storage.get("a"), Some("2".to_string()));
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = FileStorage::open(&path);
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v".to_string()).unwrap();
        assert!(path.exists());

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("k"), Some("v".to_string()));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let mut storage = FileStorage::open(&path);
        assert_eq!(storage.get("k"), None);

        // Writing replaces the corrupt file with a valid one
        storage.set("k", "v".to_string()).unwrap();
        assert_eq!(FileStorage::open(&path).get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_unwritable_path_reports_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();

        let mut storage = FileStorage::open(&path);
        assert!(storage.set("k", "v".to_string()).is_err());
    }
}
