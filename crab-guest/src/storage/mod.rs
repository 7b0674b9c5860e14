//! Tab-scoped key-value storage backends
//!
//! The session store talks to storage only through [`StorageBackend`], so
//! the medium can be swapped:
//!
//! - [`MemoryStorage`]: plain in-process map, for tests
//! - [`FileStorage`]: one JSON file per tab, used by the CLI
//! - [`SharedStorageArea`] / [`TabStorage`]: several tabs over one area,
//!   with the platform's cross-tab change signal
//! - [`UnavailableStorage`]: no storage at all (server-side rendering,
//!   storage disabled by the browser)

mod file;
mod memory;
mod shared_area;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use shared_area::{SharedStorageArea, StorageEvent, StorageEventReceiver, TabId, TabStorage};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage bound to one browser tab
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Native change signal from writes made in *other* tabs
    ///
    /// Never carries this tab's own writes. Backends without a notion of
    /// other tabs return `None`.
    fn storage_events(&self) -> Option<StorageEventReceiver> {
        None
    }
}

/// Backend for contexts with no storage; every call fails with
/// [`StorageError::Unavailable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl StorageBackend for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_storage_fails_every_call() {
        let storage = UnavailableStorage;
        assert!(matches!(storage.get_item("k"), Err(StorageError::Unavailable)));
        assert!(matches!(storage.set_item("k", "v"), Err(StorageError::Unavailable)));
        assert!(matches!(storage.remove_item("k"), Err(StorageError::Unavailable)));
        assert!(storage.storage_events().is_none());
    }
}
