//! Storage area shared by several tabs
//!
//! ```text
//! Tab A ──set_item──▶ SharedStorageArea ──broadcast──▶ Tab B receiver
//!                           │                     └──▶ Tab C receiver
//!                           └─ Tab A's own receiver drops events it originated
//! ```
//!
//! Mirrors the browser: a `storage` event reaches every other tab, never
//! the one that wrote.

use super::{StorageBackend, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Broadcast channel capacity, enough to buffer a burst of session writes
const STORAGE_EVENT_CAPACITY: usize = 64;

pub type TabId = u64;

/// Native cross-tab change signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed
    pub new_value: Option<String>,
    pub origin_tab: TabId,
}

pub struct SharedStorageArea {
    items: RwLock<HashMap<String, String>>,
    tx: broadcast::Sender<StorageEvent>,
    next_tab: AtomicU64,
}

impl SharedStorageArea {
    pub fn new() -> Arc<Self> {
        let (tx, _) = broadcast::channel(STORAGE_EVENT_CAPACITY);
        Arc::new(Self {
            items: RwLock::new(HashMap::new()),
            tx,
            next_tab: AtomicU64::new(1),
        })
    }

    /// Open a new tab over this area
    pub fn open_tab(self: &Arc<Self>) -> TabStorage {
        TabStorage {
            area: Arc::clone(self),
            tab_id: self.next_tab.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn notify(&self, key: &str, new_value: Option<&str>, origin_tab: TabId) {
        // No subscribers is fine
        let _ = self.tx.send(StorageEvent {
            key: key.to_string(),
            new_value: new_value.map(str::to_string),
            origin_tab,
        });
    }
}

/// One tab's handle onto a [`SharedStorageArea`]
#[derive(Clone)]
pub struct TabStorage {
    area: Arc<SharedStorageArea>,
    tab_id: TabId,
}

impl TabStorage {
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }
}

impl StorageBackend for TabStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.area.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.area
            .items
            .write()
            .insert(key.to_string(), value.to_string());
        self.area.notify(key, Some(value), self.tab_id);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let removed = self.area.items.write().remove(key);
        if removed.is_some() {
            self.area.notify(key, None, self.tab_id);
        }
        Ok(())
    }

    fn storage_events(&self) -> Option<StorageEventReceiver> {
        Some(StorageEventReceiver {
            rx: self.area.tx.subscribe(),
            tab_id: self.tab_id,
        })
    }
}

/// Receiver of storage events written by other tabs
pub struct StorageEventReceiver {
    rx: broadcast::Receiver<StorageEvent>,
    tab_id: TabId,
}

impl StorageEventReceiver {
    /// Next pending event from another tab, without waiting
    pub fn try_recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.origin_tab == self.tab_id => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Storage event receiver lagged");
                }
                Err(_) => return None,
            }
        }
    }

    /// Wait for the next event from another tab; `None` once the area is gone
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.origin_tab == self.tab_id => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Storage event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_share_values() {
        let area = SharedStorageArea::new();
        let a = area.open_tab();
        let b = area.open_tab();
        assert_ne!(a.tab_id(), b.tab_id());

        a.set_item("tenant_info", "{}").unwrap();
        assert_eq!(b.get_item("tenant_info").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_events_skip_writing_tab() {
        let area = SharedStorageArea::new();
        let a = area.open_tab();
        let b = area.open_tab();
        let mut a_events = a.storage_events().unwrap();
        let mut b_events = b.storage_events().unwrap();

        a.set_item("tenant_settings", "{\"currencyCode\":\"IDR\"}").unwrap();

        assert!(a_events.try_recv().is_none());
        let event = b_events.try_recv().unwrap();
        assert_eq!(event.key, "tenant_settings");
        assert_eq!(event.origin_tab, a.tab_id());
        assert!(event.new_value.is_some());
        assert!(b_events.try_recv().is_none());
    }

    #[test]
    fn test_remove_fires_event_only_when_present() {
        let area = SharedStorageArea::new();
        let a = area.open_tab();
        let b = area.open_tab();
        let mut b_events = b.storage_events().unwrap();

        a.remove_item("tenant_info").unwrap();
        assert!(b_events.try_recv().is_none());

        a.set_item("tenant_info", "{}").unwrap();
        a.remove_item("tenant_info").unwrap();
        assert!(b_events.try_recv().unwrap().new_value.is_some());
        assert!(b_events.try_recv().unwrap().new_value.is_none());
    }

    #[tokio::test]
    async fn test_async_recv() {
        let area = SharedStorageArea::new();
        let a = area.open_tab();
        let b = area.open_tab();
        let mut b_events = b.storage_events().unwrap();

        let writer = tokio::spawn(async move {
            a.set_item("tenant_info", "{}").unwrap();
        });
        writer.await.unwrap();

        let event = b_events.recv().await.unwrap();
        assert_eq!(event.key, "tenant_info");
    }
}
