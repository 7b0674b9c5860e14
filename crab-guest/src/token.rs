//! QR token decoding
//!
//! Table QR codes carry a JWT (`header.payload.signature`). The payload is
//! read here only to learn which table and tenant the guest is sitting at;
//! the backend verifies the signature on every call that matters.

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use shared::models::QrTokenPayload;

/// URL-safe alphabet, padding optional on decode
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the payload of a table QR token
///
/// Returns `None` for anything unusable: wrong segment count, bad base64,
/// non-UTF-8 or non-JSON payload, a role other than `guest`, or a missing
/// or blank `tableId` / `tableNumber` / `tenantId`. Callers proceed without
/// the token in that case.
pub fn decode_qr_token(token: &str) -> Option<QrTokenPayload> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(segments = parts.len(), "QR token rejected: expected 3 segments");
        return None;
    }

    let payload_bytes = match URL_SAFE_LENIENT.decode(parts[1]) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "QR token rejected: payload is not base64url");
            return None;
        }
    };

    let payload_str = match String::from_utf8(payload_bytes) {
        Ok(s) => s,
        Err(_) => {
            tracing::debug!("QR token rejected: payload is not UTF-8");
            return None;
        }
    };

    // Missing fields and a non-guest role both fail here
    let payload: QrTokenPayload = match serde_json::from_str(&payload_str) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "QR token rejected: payload does not parse");
            return None;
        }
    };

    if let Some(field) = payload.blank_required_field() {
        tracing::debug!(field, "QR token rejected: required field is blank");
        return None;
    }

    Some(payload)
}
