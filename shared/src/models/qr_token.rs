//! QR Token Payload Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by a table QR token
///
/// Only guests come in through the QR path; anything else fails to
/// deserialize and the token is treated as unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    Guest,
}

impl TokenRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRole::Guest => "guest",
        }
    }
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Table number as printed on the table card (numeric or a label like "A3")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableNumber {
    Number(i64),
    Label(String),
}

impl TableNumber {
    /// Labels made only of whitespace count as missing
    pub fn is_blank(&self) -> bool {
        matches!(self, TableNumber::Label(label) if label.trim().is_empty())
    }
}

impl fmt::Display for TableNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableNumber::Number(n) => write!(f, "{}", n),
            TableNumber::Label(label) => f.write_str(label),
        }
    }
}

/// Decoded payload of a table QR token (middle JWT segment)
///
/// Advisory only: the signature is never checked on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrTokenPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub role: TokenRole,
    pub tenant_id: String,
    pub table_id: String,
    pub table_number: TableNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    /// Issued-at, seconds since epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl QrTokenPayload {
    /// Name of the first required field that is present but blank
    pub fn blank_required_field(&self) -> Option<&'static str> {
        if self.table_id.trim().is_empty() {
            Some("tableId")
        } else if self.table_number.is_blank() {
            Some("tableNumber")
        } else if self.tenant_id.trim().is_empty() {
            Some("tenantId")
        } else {
            None
        }
    }

    /// Issued-at as a UTC timestamp
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}
