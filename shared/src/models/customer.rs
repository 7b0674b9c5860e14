//! Customer Context Model
//!
//! The table + token pair that every customer page needs, and the typed
//! failures a page renders when it cannot be established.

use crate::error::ErrorCode;
use crate::util::non_blank;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

static CANONICAL_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid pattern compiles")
});

/// 8-4-4-4-12 hexadecimal, either case. Braced, URN and simple forms are rejected.
pub fn is_canonical_uuid(value: &str) -> bool {
    CANONICAL_UUID.is_match(value)
}

/// Table and token as carried by a URL query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionParams {
    pub fn new(table: Option<&str>, token: Option<&str>) -> Self {
        Self {
            table: table.map(str::to_string),
            token: token.map(str::to_string),
        }
    }

    /// Table value, blank treated as absent
    pub fn table(&self) -> Option<&str> {
        non_blank(self.table.as_deref())
    }

    /// Token value, blank treated as absent
    pub fn token(&self) -> Option<&str> {
        non_blank(self.token.as_deref())
    }
}

/// Route-provided parameters of a customer page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    /// Tenant slug from the path, always present
    pub tenant_slug: String,
    #[serde(flatten)]
    pub session: SessionParams,
}

impl RouteParams {
    pub fn new(tenant_slug: impl Into<String>) -> Self {
        Self {
            tenant_slug: tenant_slug.into(),
            session: SessionParams::default(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.session.table = Some(table.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.session.token = Some(token.into());
        self
    }
}

/// Why a customer context could not be established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveError {
    /// Table or token absent after falling back to storage
    #[error("missing_params")]
    MissingParams,
    /// Table present but not a canonical UUID
    #[error("invalid_table")]
    InvalidTable,
}

impl ResolveError {
    /// Stable tag the presentation layer switches on
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::MissingParams => "missing_params",
            ResolveError::InvalidTable => "invalid_table",
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            ResolveError::MissingParams => ErrorCode::SessionParamsMissing,
            ResolveError::InvalidTable => ErrorCode::TableInvalid,
        }
    }
}

/// Validated customer context for one view
///
/// Immutable once built; only [`CustomerContext::new`] creates one, and it
/// checks existence of both values before the table format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContext {
    tenant_slug: String,
    table: String,
    token: String,
    #[serde(skip)]
    table_uuid: Uuid,
}

impl CustomerContext {
    pub fn new(
        tenant_slug: impl Into<String>,
        table: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self, ResolveError> {
        let (Some(table), Some(token)) = (non_blank(table), non_blank(token)) else {
            return Err(ResolveError::MissingParams);
        };

        if !is_canonical_uuid(table) {
            return Err(ResolveError::InvalidTable);
        }
        let table_uuid = Uuid::parse_str(table).map_err(|_| ResolveError::InvalidTable)?;

        Ok(Self {
            tenant_slug: tenant_slug.into(),
            table: table.to_string(),
            token: token.to_string(),
            table_uuid,
        })
    }

    pub fn tenant_slug(&self) -> &str {
        &self.tenant_slug
    }

    /// Table id exactly as supplied
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn table_uuid(&self) -> Uuid {
        self.table_uuid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "3f2b8c1e-9d4a-4c6b-8e2f-1a2b3c4d5e6f";

    #[test]
    fn test_canonical_uuid_shapes() {
        assert!(is_canonical_uuid(TABLE));
        assert!(is_canonical_uuid("3F2B8C1E-9D4A-4C6B-8E2F-1A2B3C4D5E6F"));
        assert!(!is_canonical_uuid("3f2b8c1e9d4a4c6b8e2f1a2b3c4d5e6f"));
        assert!(!is_canonical_uuid("{3f2b8c1e-9d4a-4c6b-8e2f-1a2b3c4d5e6f}"));
        assert!(!is_canonical_uuid("urn:uuid:3f2b8c1e-9d4a-4c6b-8e2f-1a2b3c4d5e6f"));
        assert!(!is_canonical_uuid("not-a-uuid"));
        assert!(!is_canonical_uuid(""));
    }

    #[test]
    fn test_context_new_ok() {
        let ctx = CustomerContext::new("sari", Some(TABLE), Some("abc")).unwrap();
        assert_eq!(ctx.tenant_slug(), "sari");
        assert_eq!(ctx.table(), TABLE);
        assert_eq!(ctx.token(), "abc");
        assert_eq!(ctx.table_uuid().to_string(), TABLE);
    }

    #[test]
    fn test_missing_masks_invalid() {
        // A malformed table with no token is still a missing-params failure
        assert_eq!(
            CustomerContext::new("sari", Some("not-a-uuid"), None),
            Err(ResolveError::MissingParams)
        );
        assert_eq!(
            CustomerContext::new("sari", Some("not-a-uuid"), Some("  ")),
            Err(ResolveError::MissingParams)
        );
        assert_eq!(
            CustomerContext::new("sari", Some("not-a-uuid"), Some("abc")),
            Err(ResolveError::InvalidTable)
        );
    }

    #[test]
    fn test_resolve_error_tags() {
        assert_eq!(ResolveError::MissingParams.code(), "missing_params");
        assert_eq!(ResolveError::InvalidTable.to_string(), "invalid_table");
        assert_eq!(
            serde_json::to_string(&ResolveError::InvalidTable).unwrap(),
            "\"invalid_table\""
        );
        assert_eq!(
            ResolveError::MissingParams.error_code(),
            ErrorCode::SessionParamsMissing
        );
    }

    #[test]
    fn test_session_params_blank_values() {
        let params = SessionParams::new(Some(""), Some("tok"));
        assert_eq!(params.table(), None);
        assert_eq!(params.token(), Some("tok"));
    }

    #[test]
    fn test_route_params_builder() {
        let params = RouteParams::new("sari").with_table(TABLE).with_token("abc");
        assert_eq!(params.session.table(), Some(TABLE));
        assert_eq!(params.session.token(), Some("abc"));
    }
}
