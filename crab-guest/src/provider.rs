//! TenantSettingsProvider - read-only tenant state for every view
//!
//! ```text
//! SessionStore ──same-tab event──┐
//!      │                         ├──▶ refresh() ──watch──▶ consumers
//!      └──cross-tab storage event┘
//! ```
//!
//! Consumers always see a snapshot: the documented defaults until the store
//! has been read, afterwards whatever the store held at the last refresh.

use crate::events::Subscription;
use crate::format::PriceFormatter;
use crate::store::{RecordKey, SessionStore};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::TenantSettings;
use shared::util::non_blank;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Tenant state as seen by consumers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSnapshot {
    pub settings: TenantSettings,
    pub tenant_name: Option<String>,
    pub tenant_address: Option<String>,
    pub tenant_image: Option<String>,
    /// False until the store has been read once
    pub loaded: bool,
}

impl TenantSnapshot {
    fn read(store: &SessionStore) -> Self {
        let info = store.tenant_info().unwrap_or_default();
        let owned = |value: Option<&str>| non_blank(value).map(str::to_string);

        Self {
            settings: store.tenant_settings().unwrap_or_default(),
            tenant_name: owned(Some(info.name.as_str())),
            tenant_address: owned(info.address.as_deref()),
            tenant_image: owned(info.image.as_deref()),
            loaded: true,
        }
    }

    pub fn formatter(&self) -> PriceFormatter {
        PriceFormatter::new(&self.settings)
    }
}

pub struct TenantSettingsProvider {
    store: Arc<SessionStore>,
    snapshot: watch::Sender<Arc<TenantSnapshot>>,
    /// Queued notifications for [`Self::sync_pending`]
    changes: Mutex<Subscription>,
}

impl TenantSettingsProvider {
    /// Create a provider holding the default snapshot; call [`Self::mount`] to read the store
    pub fn new(store: Arc<SessionStore>) -> Self {
        let changes = store.subscribe(&RecordKey::TENANT);
        let (snapshot, _) = watch::channel(Arc::new(TenantSnapshot::default()));
        Self {
            store,
            snapshot,
            changes: Mutex::new(changes),
        }
    }

    /// First read of the store
    pub fn mount(&self) -> Arc<TenantSnapshot> {
        // Anything queued before mounting is already covered by this read
        while self.changes.lock().try_next().is_some() {}
        let snapshot = self.refresh();
        tracing::debug!(
            currency = %snapshot.settings.currency_code,
            tenant = ?snapshot.tenant_name,
            "Tenant settings mounted"
        );
        snapshot
    }

    /// Re-read the store and publish the result if it changed
    pub fn refresh(&self) -> Arc<TenantSnapshot> {
        let next = Arc::new(TenantSnapshot::read(&self.store));
        let published = Arc::clone(&next);
        self.snapshot.send_if_modified(move |current| {
            if **current == *next {
                false
            } else {
                *current = next;
                true
            }
        });
        published
    }

    /// Apply every queued notification; returns how many were drained
    pub fn sync_pending(&self) -> usize {
        let mut drained = 0;
        {
            let mut changes = self.changes.lock();
            while let Some(change) = changes.try_next() {
                tracing::trace!(key = %change.key, channel = ?change.channel, "Tenant record changed");
                drained += 1;
            }
        }
        if drained > 0 {
            self.refresh();
        }
        drained
    }

    /// Current snapshot; defaults before the first read
    pub fn current(&self) -> Arc<TenantSnapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    /// Receiver that wakes on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<TenantSnapshot>> {
        self.snapshot.subscribe()
    }

    pub fn formatter(&self) -> PriceFormatter {
        self.current().formatter()
    }

    pub fn format_price(&self, amount: Decimal) -> String {
        self.formatter().format(amount)
    }

    /// Follow store notifications in the background
    ///
    /// The task holds only a weak reference and stops after the provider is
    /// dropped or the store goes away.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        // Subscribe before spawning so no write after this call is missed
        let mut changes = self.store.subscribe(&RecordKey::TENANT);
        let provider: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            while let Some(change) = changes.next().await {
                // Coalesce a burst of writes into one refresh
                while changes.try_next().is_some() {}

                let Some(provider) = provider.upgrade() else {
                    break;
                };
                tracing::debug!(key = %change.key, channel = ?change.channel, "Refreshing tenant settings");
                provider.refresh();
            }
            tracing::debug!("Tenant settings listener stopped");
        })
    }
}
