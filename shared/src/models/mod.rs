//! Data models
//!
//! Shared between the guest client core, the CLI and the upstream API DTOs.
//! JSON field names follow the web front end (camelCase).

pub mod customer;
pub mod qr_token;
pub mod session;
pub mod tenant_info;
pub mod tenant_settings;

// Re-exports
pub use customer::*;
pub use qr_token::*;
pub use session::*;
pub use tenant_info::*;
pub use tenant_settings::*;
