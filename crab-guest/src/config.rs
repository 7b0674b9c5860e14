//! Guest client configuration

use std::path::PathBuf;

/// Configuration for the guest session core
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | API_BASE_URL | http://localhost:3000 | Backend API base URL |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout (ms) |
/// | DEFAULT_LANGUAGE | en | Language sent on session start |
/// | STORAGE_DIR | ./.crab-guest | Directory of the file-backed tab storage |
/// | LOG_LEVEL | info | Default log filter |
/// | LOG_JSON | false | JSON log output |
/// | LOG_DIR | (unset) | Directory for rolling log files |
#[derive(Debug, Clone)]
pub struct GuestConfig {
    /// Backend API base URL (e.g., "http://localhost:3000")
    pub api_base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Language used when the caller does not pick one
    pub default_language: String,
    /// Where the file-backed tab storage lives
    pub storage_dir: PathBuf,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<PathBuf>,
}

impl GuestConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            default_language: std::env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".into()),
            storage_dir: std::env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./.crab-guest")),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
        }
    }

    /// Set the API base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// File holding one tab's session records
    pub fn storage_file(&self) -> PathBuf {
        self.storage_dir.join("session.json")
    }
}

impl Default for GuestConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_override_env() {
        let config = GuestConfig::from_env()
            .with_api_base_url("http://api.test")
            .with_timeout_ms(500)
            .with_default_language("id")
            .with_storage_dir("/tmp/guest-tab");

        assert_eq!(config.api_base_url, "http://api.test");
        assert_eq!(config.request_timeout_ms, 500);
        assert_eq!(config.default_language, "id");
        assert_eq!(config.storage_file(), PathBuf::from("/tmp/guest-tab/session.json"));
    }
}
