use crate::domain::model::WebhookPayload;
use crate::utils::error::Result;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Serialization the digest is computed over: the payload with `signature`
/// stripped. Struct field order plus BTreeMap key order make the bytes
/// reproducible on both ends.
fn canonical_bytes(payload: &WebhookPayload) -> Result<Vec<u8>> {
    if payload.signature.is_none() {
        return Ok(serde_json::to_vec(payload)?);
    }
    let mut unsigned = payload.clone();
    unsigned.signature = None;
    Ok(serde_json::to_vec(&unsigned)?)
}

/// Lowercase hex HMAC-SHA256 over the canonical payload serialization.
pub fn sign(payload: &WebhookPayload, api_key: &str) -> Result<String> {
    let bytes = canonical_bytes(payload)?;
    let mut mac = <HmacSha256 as Mac>::new_from_slice(api_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(&bytes);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Signing policy: an absent or empty key means unsigned delivery, not an
/// error.
pub fn maybe_sign(payload: &WebhookPayload, api_key: &str) -> Result<Option<String>> {
    if api_key.is_empty() {
        return Ok(None);
    }
    sign(payload, api_key).map(Some)
}

/// Recompute the digest from a received payload and compare it to the
/// embedded signature. Unsigned payloads never verify.
pub fn verify(payload: &WebhookPayload, api_key: &str) -> bool {
    let Some(embedded) = payload.signature.as_deref() else {
        return false;
    };
    match sign(payload, api_key) {
        Ok(computed) => computed == embedded,
        Err(_) => false,
    }
}
