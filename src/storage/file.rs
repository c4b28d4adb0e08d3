//! File-backed slot storage
//!
//! One file per slot inside a data directory. The directory is created
//! lazily on the first write so a read-only session never touches disk.

use super::error::{validate_key, StorageResult};
use super::KeyValueStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Durable slot storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Readers only ever see a complete value
        let tmp = self.dir.join(format!(".{}.tmp", key));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;

        tracing::trace!(key, path = ?path, "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("state"));
        (store, dir)
    }

    #[test]
    fn test_missing_slot_reads_none() {
        let (store, _dir) = create_test_store();
        assert_eq!(store.get("auth_token").unwrap(), None);
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_write_and_read_back() {
        let (store, _dir) = create_test_store();
        store.set("auth_token", "abc123").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("abc123"));

        // A second handle on the same directory sees the value
        let reopened = FileStore::new(store.dir());
        assert_eq!(reopened.get("auth_token").unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (store, _dir) = create_test_store();
        store.set("auth_token", "abc123").unwrap();
        store.remove("auth_token").unwrap();
        store.remove("auth_token").unwrap();
        assert_eq!(store.get("auth_token").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_traversal() {
        let (store, _dir) = create_test_store();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("nested/key").is_err());
    }
}
