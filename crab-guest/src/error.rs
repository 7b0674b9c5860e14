//! Guest client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Errors from talking to the backend during session bootstrapping
///
/// The token codec and the session store never return these: their
/// failures are recovered locally as absent values.
#[derive(Debug, Error)]
pub enum GuestError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] AppError),

    /// 400: required fields missing
    #[error("Missing fields: {0}")]
    MissingFields(String),

    /// 404: unknown tenant or table
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409: table cannot take a session
    #[error("Table unavailable: {0}")]
    TableUnavailable(String),

    /// Any other non-success status or error envelope
    #[error("Upstream error ({code}): {message}")]
    Upstream { code: ErrorCode, message: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GuestError {
    /// Unified error code for the presentation layer
    pub fn code(&self) -> ErrorCode {
        match self {
            GuestError::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            GuestError::Http(_) => ErrorCode::NetworkError,
            GuestError::InvalidRequest(e) => e.code,
            GuestError::MissingFields(_) => ErrorCode::RequiredField,
            GuestError::NotFound(_) => ErrorCode::TenantOrTableNotFound,
            GuestError::TableUnavailable(_) => ErrorCode::TableUnavailable,
            GuestError::Upstream { code, .. } => *code,
            GuestError::InvalidResponse(_) | GuestError::Serialization(_) => {
                ErrorCode::InternalError
            }
        }
    }
}

impl From<AppError> for GuestError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::RequiredField => GuestError::MissingFields(err.message),
            ErrorCode::TenantOrTableNotFound | ErrorCode::TenantNotFound | ErrorCode::TableNotFound => {
                GuestError::NotFound(err.message)
            }
            ErrorCode::TableUnavailable => GuestError::TableUnavailable(err.message),
            code => GuestError::Upstream {
                code,
                message: err.message,
            },
        }
    }
}

/// Result type for guest client operations
pub type GuestResult<T> = Result<T, GuestError>;
