//! HTTP client for the guest session endpoints

use crate::{GuestConfig, GuestError, GuestResult};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, ErrorCode};
use shared::models::{SessionStartData, SessionStartRequest};
use std::time::Duration;

/// Session start endpoint
pub const SESSION_START_PATH: &str = "/api/guest/session/start";

/// Client for the backend's guest session API
#[derive(Debug, Clone)]
pub struct SessionApi {
    client: Client,
    base_url: String,
}

impl SessionApi {
    /// Create a client from configuration
    pub fn new(config: &GuestConfig) -> GuestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> GuestResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self.client.post(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Map the status category first, then unwrap the response envelope
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> GuestResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text, status);
            tracing::warn!(status = status.as_u16(), message = %message, "Upstream request failed");
            return Err(match status {
                StatusCode::BAD_REQUEST => GuestError::MissingFields(message),
                StatusCode::NOT_FOUND => GuestError::NotFound(message),
                StatusCode::CONFLICT => GuestError::TableUnavailable(message),
                _ => GuestError::Upstream {
                    code: ErrorCode::from_upstream_status(status),
                    message,
                },
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)
            .map_err(|e| GuestError::InvalidResponse(format!("Unexpected response body: {e}")))?;
        envelope.into_data().map_err(Into::into)
    }

    /// Start a guest session for a table
    pub async fn start_session(&self, request: &SessionStartRequest) -> GuestResult<SessionStartData> {
        request.validate().map_err(GuestError::InvalidRequest)?;

        tracing::info!(
            tenant = %request.tenant_slug,
            table = %request.table_code,
            "Starting guest session"
        );
        self.post(SESSION_START_PATH, request).await
    }
}

/// Message from an error envelope, else the raw body, else the status reason
fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(body) {
        if !envelope.message.is_empty() {
            return envelope.message;
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or_else(|| ErrorCode::from_upstream_status(status).message())
            .to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_envelope() {
        let body = r#"{"code":7006,"message":"Table is closed"}"#;
        assert_eq!(error_message(body, StatusCode::CONFLICT), "Table is closed");
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_reason() {
        assert_eq!(error_message("boom", StatusCode::BAD_GATEWAY), "boom");
        assert_eq!(error_message("", StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn test_base_url_trimmed() {
        let config = GuestConfig::from_env().with_api_base_url("http://localhost:9/");
        let api = SessionApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:9");
    }

    #[tokio::test]
    async fn test_invalid_request_not_sent() {
        // Port 9 is never contacted: validation fails first
        let config = GuestConfig::from_env().with_api_base_url("http://127.0.0.1:9");
        let api = SessionApi::new(&config).unwrap();
        let request = SessionStartRequest::new("warung-sari", "  ", "en");

        let err = api.start_session(&request).await.unwrap_err();
        assert!(matches!(err, GuestError::InvalidRequest(_)));
    }
}
