use super::{StorageBackend, StorageError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File-backed storage: one JSON object per tab
///
/// The whole file is read and rewritten on every call; the records are a
/// few hundred bytes each.
#[derive(Debug)]
pub struct FileStorage {
    /// {storage_dir}/session.json
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Load for a write; a corrupt file is replaced rather than blocking writes
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Json(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Storage file corrupted, starting fresh");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut items = self.load_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut items = self.load_for_write()?;
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tab/session.json");

        let storage = FileStorage::new(&path);
        assert!(storage.get_item("tenant_info").unwrap().is_none());
        storage.set_item("tenant_info", r#"{"name":"Sari"}"#).unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get_item("tenant_info").unwrap().as_deref(),
            Some(r#"{"name":"Sari"}"#)
        );

        reopened.remove_item("tenant_info").unwrap();
        assert!(storage.get_item("tenant_info").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_fails_reads_but_not_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get_item("k"), Err(StorageError::Json(_))));

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
