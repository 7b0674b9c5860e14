//! Session store change notifications
//!
//! Two channels feed one [`Subscription`]:
//!
//! - **same tab**: [`StoreEvent`]s the store dispatches itself right after
//!   each write (the browser never reports a tab's own writes back to it)
//! - **cross tab**: the storage backend's native [`StorageEvent`]s for
//!   writes made by other tabs
//!
//! Consumers that only listened to one of them would go stale.

use crate::storage::{StorageEvent, StorageEventReceiver};
use crate::store::RecordKey;
use tokio::sync::broadcast;

/// Name of the same-tab custom event
pub const TENANT_SETTINGS_UPDATED: &str = "tenant-settings-updated";

/// Same-tab notification dispatched by the session store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    pub name: &'static str,
    pub key: RecordKey,
}

impl StoreEvent {
    pub fn updated(key: RecordKey) -> Self {
        Self {
            name: TENANT_SETTINGS_UPDATED,
            key,
        }
    }
}

/// Which channel delivered a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeChannel {
    SameTab,
    CrossTab,
}

/// A change to one watched record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub key: RecordKey,
    pub channel: ChangeChannel,
}

enum Incoming {
    SameTab(Result<StoreEvent, broadcast::error::RecvError>),
    CrossTab(Option<StorageEvent>),
}

/// Merged view of both notification channels, filtered to a key set
pub struct Subscription {
    same_tab: broadcast::Receiver<StoreEvent>,
    cross_tab: Option<StorageEventReceiver>,
    keys: Vec<RecordKey>,
}

impl Subscription {
    pub(crate) fn new(
        same_tab: broadcast::Receiver<StoreEvent>,
        cross_tab: Option<StorageEventReceiver>,
        keys: &[RecordKey],
    ) -> Self {
        Self {
            same_tab,
            cross_tab,
            keys: keys.to_vec(),
        }
    }

    /// Keys this subscription reports
    pub fn keys(&self) -> &[RecordKey] {
        &self.keys
    }

    /// Whether a cross-tab channel is attached (backend supports other tabs)
    pub fn has_cross_tab(&self) -> bool {
        self.cross_tab.is_some()
    }

    /// Next queued change without waiting; same-tab changes drain first
    pub fn try_next(&mut self) -> Option<StoreChange> {
        loop {
            match self.same_tab.try_recv() {
                Ok(event) => {
                    if let Some(change) = self.accept_same_tab(event) {
                        return Some(change);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Store event subscriber lagged");
                }
                Err(_) => break,
            }
        }

        while let Some(event) = self.cross_tab.as_mut().and_then(|rx| rx.try_recv()) {
            if let Some(change) = self.accept_cross_tab(event) {
                return Some(change);
            }
        }

        None
    }

    /// Wait for the next change on either channel
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<StoreChange> {
        loop {
            let incoming = match self.cross_tab.as_mut() {
                Some(cross_tab) => tokio::select! {
                    result = self.same_tab.recv() => Incoming::SameTab(result),
                    event = cross_tab.recv() => Incoming::CrossTab(event),
                },
                None => Incoming::SameTab(self.same_tab.recv().await),
            };

            match incoming {
                Incoming::SameTab(Ok(event)) => {
                    if let Some(change) = self.accept_same_tab(event) {
                        return Some(change);
                    }
                }
                Incoming::SameTab(Err(broadcast::error::RecvError::Lagged(n))) => {
                    tracing::warn!(skipped = n, "Store event subscriber lagged");
                }
                Incoming::SameTab(Err(broadcast::error::RecvError::Closed)) => return None,
                Incoming::CrossTab(Some(event)) => {
                    if let Some(change) = self.accept_cross_tab(event) {
                        return Some(change);
                    }
                }
                Incoming::CrossTab(None) => {
                    tracing::debug!("Cross-tab storage channel closed");
                    self.cross_tab = None;
                }
            }
        }
    }

    fn accept_same_tab(&self, event: StoreEvent) -> Option<StoreChange> {
        self.keys.contains(&event.key).then_some(StoreChange {
            key: event.key,
            channel: ChangeChannel::SameTab,
        })
    }

    fn accept_cross_tab(&self, event: StorageEvent) -> Option<StoreChange> {
        let key = RecordKey::parse(&event.key)?;
        self.keys.contains(&key).then_some(StoreChange {
            key,
            channel: ChangeChannel::CrossTab,
        })
    }
}
