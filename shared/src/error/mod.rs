//! Unified error system for the guest client
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Upstream API response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Session / token errors
//! - 3xxx: Tenant errors
//! - 7xxx: Table errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::validation("Missing table code")
//!     .with_detail("field", "tableCode");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//!
//! let response: ApiResponse<()> =
//!     serde_json::from_str(r#"{"code":7006,"message":"Table 4 is occupied"}"#).unwrap();
//! let err = response.into_data().unwrap_err();
//! assert_eq!(err.code, ErrorCode::TableUnavailable);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
