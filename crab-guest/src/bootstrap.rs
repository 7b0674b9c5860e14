//! Session bootstrapping: QR scan, session start and session end
//!
//! The only writer of session records outside tests. Each write goes
//! through the store, so the settings provider hears about it.

use crate::context::{Destination, customer_href};
use crate::http::SessionApi;
use crate::store::SessionStore;
use crate::token::decode_qr_token;
use crate::GuestResult;
use shared::models::{QrTokenPayload, SessionParams, SessionStartData, SessionStartRequest, TenantInfo};
use std::sync::Arc;

/// Result of accepting a scanned table QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTable {
    pub payload: QrTokenPayload,
    /// Menu link carrying the scanned table and token
    pub menu_href: String,
}

pub struct SessionBootstrap {
    store: Arc<SessionStore>,
}

impl SessionBootstrap {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Decode a scanned QR token and remember its table and token
    ///
    /// Returns `None` when the token is unusable; nothing is written then.
    /// Tenant info from the token only seeds an empty record, it never
    /// overwrites what a session start stored.
    pub fn accept_qr_token(&self, tenant_slug: &str, token: &str) -> Option<ScannedTable> {
        let payload = decode_qr_token(token)?;
        let token = token.trim();

        if !self.store.save_customer_session(&payload.table_id, token) {
            tracing::warn!(
                tenant = %tenant_slug,
                table_id = %payload.table_id,
                "Scanned table not remembered, links rely on the URL"
            );
        }

        if self.store.tenant_info().is_none() {
            if let Some(info) = TenantInfo::from_token(&payload) {
                self.store.save_tenant_info(&info);
            }
        }

        tracing::info!(
            tenant = %tenant_slug,
            table_id = %payload.table_id,
            table_number = %payload.table_number,
            "QR token accepted"
        );

        let params = SessionParams::new(Some(payload.table_id.as_str()), Some(token));
        let menu_href = customer_href(tenant_slug, Destination::Menu, &params, self.store.as_ref());
        Some(ScannedTable { payload, menu_href })
    }

    /// Start a session upstream and persist everything it returns
    pub async fn start_session(
        &self,
        api: &SessionApi,
        request: &SessionStartRequest,
    ) -> GuestResult<SessionStartData> {
        let data = api.start_session(request).await?;

        let persisted = [
            self.store.save_tenant_settings(&data.tenant_settings),
            self.store.save_tenant_info(&data.tenant_info),
            self.store
                .save_customer_session(&data.table_id, &data.session_token),
        ];
        if persisted.contains(&false) {
            tracing::warn!(
                tenant = %request.tenant_slug,
                table_id = %data.table_id,
                "Session started but not every record was stored"
            );
        }

        tracing::info!(
            tenant = %request.tenant_slug,
            table_id = %data.table_id,
            currency = %data.tenant_settings.currency_code,
            "Guest session started"
        );
        Ok(data)
    }

    /// Forget every session record
    pub fn end_session(&self) {
        self.store.clear();
        tracing::info!("Guest session ended");
    }
}
