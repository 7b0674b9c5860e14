//! Crab Guest - client-side session core for table ordering
//!
//! Decodes table QR tokens, keeps the tab's session records, resolves the
//! customer context of each page and exposes tenant settings with a
//! currency-aware price formatter.

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod format;
pub mod http;
pub mod pricing;
pub mod provider;
pub mod storage;
pub mod store;
pub mod token;

pub use bootstrap::{ScannedTable, SessionBootstrap};
pub use config::GuestConfig;
pub use context::{Destination, FallbackSource, customer_href, resolve_customer_context};
pub use error::{GuestError, GuestResult};
pub use events::{ChangeChannel, StoreChange, StoreEvent, Subscription, TENANT_SETTINGS_UPDATED};
pub use format::PriceFormatter;
pub use http::SessionApi;
pub use pricing::BillBreakdown;
pub use provider::{TenantSettingsProvider, TenantSnapshot};
pub use store::{RecordKey, SessionStore};
pub use token::decode_qr_token;

// Re-export shared types for convenience
pub use shared::models::{
    CustomerContext, QrTokenPayload, ResolveError, RouteParams, SessionParams, TenantInfo,
    TenantSettings,
};
