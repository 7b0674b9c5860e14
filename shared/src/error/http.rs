//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TenantNotFound
            | Self::TableNotFound
            | Self::TenantOrTableNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::TableUnavailable => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Map a status returned by the session-start endpoint to an error code
    ///
    /// The endpoint reports missing fields as 400, an unknown tenant or
    /// table as 404 and a table that cannot take a session as 409.
    pub fn from_upstream_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::RequiredField,
            StatusCode::NOT_FOUND => Self::TenantOrTableNotFound,
            StatusCode::CONFLICT => Self::TableUnavailable,
            StatusCode::UNAUTHORIZED => Self::TokenInvalid,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::NetworkError,
            s if s.is_success() => Self::Success,
            s if s.is_client_error() => Self::InvalidRequest,
            _ => Self::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
        assert_eq!(
            ErrorCode::TenantOrTableNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::TableUnavailable.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::RequiredField.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_upstream_status() {
        assert_eq!(
            ErrorCode::from_upstream_status(StatusCode::BAD_REQUEST),
            ErrorCode::RequiredField
        );
        assert_eq!(
            ErrorCode::from_upstream_status(StatusCode::NOT_FOUND),
            ErrorCode::TenantOrTableNotFound
        );
        assert_eq!(
            ErrorCode::from_upstream_status(StatusCode::CONFLICT),
            ErrorCode::TableUnavailable
        );
        assert_eq!(
            ErrorCode::from_upstream_status(StatusCode::UNPROCESSABLE_ENTITY),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            ErrorCode::from_upstream_status(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorCode::InternalError
        );
    }

    #[test]
    fn test_upstream_categories_map_back_to_same_status() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::CONFLICT,
        ] {
            assert_eq!(ErrorCode::from_upstream_status(status).http_status(), status);
        }
    }
}
