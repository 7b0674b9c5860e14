//! Session-start DTOs (upstream API contract)

use super::tenant_info::TenantInfo;
use super::tenant_settings::TenantSettings;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Body of the session-start request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartRequest {
    pub tenant_slug: String,
    pub table_code: String,
    /// Preferred UI language, e.g. "en"
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
}

impl SessionStartRequest {
    pub fn new(
        tenant_slug: impl Into<String>,
        table_code: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            tenant_slug: tenant_slug.into(),
            table_code: table_code.into(),
            language: language.into(),
            party_size: None,
        }
    }

    pub fn with_party_size(mut self, party_size: u32) -> Self {
        self.party_size = Some(party_size);
        self
    }

    /// Client-side checks mirroring the endpoint's 400 category
    pub fn validate(&self) -> AppResult<()> {
        if self.tenant_slug.trim().is_empty() {
            return Err(AppError::validation("Tenant slug is required")
                .with_detail("field", "tenantSlug"));
        }
        if self.table_code.trim().is_empty() {
            return Err(AppError::validation("Table code is required")
                .with_detail("field", "tableCode"));
        }
        if self.party_size == Some(0) {
            return Err(AppError::validation("Party size must be at least 1")
                .with_detail("field", "partySize"));
        }
        Ok(())
    }
}

/// Payload of a successful session start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartData {
    pub session_token: String,
    pub table_id: String,
    #[serde(default)]
    pub tenant_settings: TenantSettings,
    #[serde(default)]
    pub tenant_info: TenantInfo,
}
