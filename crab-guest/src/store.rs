//! SessionStore - tab-scoped session records
//!
//! Sole writer of the persisted session records. Everything else reads
//! snapshots through it and treats them as immutable.
//!
//! Reads never fail: a missing record, a record that no longer parses, or
//! storage that is unavailable all come back as `None`.

use crate::events::{StoreEvent, Subscription};
use crate::storage::StorageBackend;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{TenantInfo, TenantSettings};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Same-tab channel capacity
const STORE_EVENT_CAPACITY: usize = 64;

/// Keys of the persisted session records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    TenantSettings,
    TenantInfo,
    /// Last table id seen in a URL or QR token
    CustomerTable,
    /// Last session token seen in a URL or QR token
    CustomerToken,
}

impl RecordKey {
    pub const ALL: [RecordKey; 4] = [
        RecordKey::TenantSettings,
        RecordKey::TenantInfo,
        RecordKey::CustomerTable,
        RecordKey::CustomerToken,
    ];

    /// Records the tenant settings provider follows
    pub const TENANT: [RecordKey; 2] = [RecordKey::TenantSettings, RecordKey::TenantInfo];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKey::TenantSettings => "tenant_settings",
            RecordKey::TenantInfo => "tenant_info",
            RecordKey::CustomerTable => "customer_table",
            RecordKey::CustomerToken => "customer_token",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session record store over an injectable storage backend
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
    events: broadcast::Sender<StoreEvent>,
}

impl SessionStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        let (events, _) = broadcast::channel(STORE_EVENT_CAPACITY);
        Self { backend, events }
    }

    /// Serialize and write a record, then notify same-tab subscribers
    ///
    /// Returns whether the record was persisted. Failures are logged and
    /// swallowed.
    pub fn save<T: Serialize>(&self, key: RecordKey, record: &T) -> bool {
        let value = match serde_json::to_string(record) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize session record");
                return false;
            }
        };

        if let Err(e) = self.backend.set_item(key.as_str(), &value) {
            tracing::warn!(key = %key, error = %e, "Failed to write session record");
            return false;
        }

        tracing::debug!(key = %key, "Session record saved");
        self.dispatch(key);
        true
    }

    /// Read and deserialize a record
    pub fn get<T: DeserializeOwned>(&self, key: RecordKey) -> Option<T> {
        let raw = match self.backend.get_item(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Session storage read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Stored session record is corrupted");
                None
            }
        }
    }

    /// Remove one record; returns whether storage accepted the removal
    pub fn remove(&self, key: RecordKey) -> bool {
        if let Err(e) = self.backend.remove_item(key.as_str()) {
            tracing::warn!(key = %key, error = %e, "Failed to remove session record");
            return false;
        }
        self.dispatch(key);
        true
    }

    /// Remove every session record (session end)
    pub fn clear(&self) {
        for key in RecordKey::ALL {
            self.remove(key);
        }
        tracing::info!("Session records cleared");
    }

    /// Subscribe to changes of `keys` on both the same-tab and cross-tab channels
    pub fn subscribe(&self, keys: &[RecordKey]) -> Subscription {
        Subscription::new(self.events.subscribe(), self.backend.storage_events(), keys)
    }

    fn dispatch(&self, key: RecordKey) {
        // No subscribers is fine
        let _ = self.events.send(StoreEvent::updated(key));
    }

    // ========== Typed records ==========

    pub fn save_tenant_settings(&self, settings: &TenantSettings) -> bool {
        self.save(RecordKey::TenantSettings, settings)
    }

    pub fn tenant_settings(&self) -> Option<TenantSettings> {
        self.get(RecordKey::TenantSettings)
    }

    pub fn save_tenant_info(&self, info: &TenantInfo) -> bool {
        self.save(RecordKey::TenantInfo, info)
    }

    pub fn tenant_info(&self) -> Option<TenantInfo> {
        self.get(RecordKey::TenantInfo)
    }

    /// Remember the table and token so later pages can fall back to them
    pub fn save_customer_session(&self, table: &str, token: &str) -> bool {
        let table_saved = self.save(RecordKey::CustomerTable, &table);
        let token_saved = self.save(RecordKey::CustomerToken, &token);
        table_saved && token_saved
    }

    pub fn customer_table(&self) -> Option<String> {
        self.get(RecordKey::CustomerTable)
    }

    pub fn customer_token(&self) -> Option<String> {
        self.get(RecordKey::CustomerToken)
    }
}
