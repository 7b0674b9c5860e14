//! Shared types for the Crab guest ordering client
//!
//! Data model for table sessions (QR token payload, customer context,
//! tenant settings and info), upstream DTOs, and the unified error types.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{
    CustomerContext, QrTokenPayload, RouteParams, SessionParams, TenantInfo, TenantSettings,
};
