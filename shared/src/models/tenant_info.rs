//! Tenant Info Model

use super::qr_token::QrTokenPayload;
use serde::{Deserialize, Serialize};

/// Display information about the restaurant (stored under `tenant_info`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl TenantInfo {
    /// Provisional info taken from a decoded QR token, if it names the tenant
    pub fn from_token(payload: &QrTokenPayload) -> Option<Self> {
        let name = payload.tenant_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            address: None,
            image: payload.tenant_image.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        let json = r#"{"role":"guest","tenantId":"t","tableId":"x","tableNumber":1,
            "tenantName":"Warung Sari","tenantImage":"sari.png"}"#;
        let payload: QrTokenPayload = serde_json::from_str(json).unwrap();
        let info = TenantInfo::from_token(&payload).unwrap();
        assert_eq!(info.name, "Warung Sari");
        assert_eq!(info.image.as_deref(), Some("sari.png"));
        assert!(info.address.is_none());
    }

    #[test]
    fn test_from_token_without_name() {
        let json = r#"{"role":"guest","tenantId":"t","tableId":"x","tableNumber":1}"#;
        let payload: QrTokenPayload = serde_json::from_str(json).unwrap();
        assert!(TenantInfo::from_token(&payload).is_none());
    }

    #[test]
    fn test_nullable_fields() {
        let info: TenantInfo =
            serde_json::from_str(r#"{"name":"Sari","address":null,"image":null}"#).unwrap();
        assert_eq!(info.name, "Sari");
        assert!(info.address.is_none());
    }
}
