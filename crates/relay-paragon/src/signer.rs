//! # Request Signing
//!
//! `Authorization: Bearer hex(HMAC-SHA256(secret, body ++ url))`.
//!
//! There is no timestamp or nonce in the signed material; a captured token
//! stays valid for as long as the gateway accepts it.

use hmac::{Hmac, Mac};
use relay_core::{NormalizedPaymentRequest, RelayError, RelayResult, SignedRequest};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the bearer token for `body` sent to `request_url`.
pub fn sign(body: &str, request_url: &str, secret: &str) -> RelayResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| RelayError::Signing(e.to_string()))?;
    mac.update(body.as_bytes());
    mac.update(request_url.as_bytes());
    Ok(format!("Bearer {}", hex::encode(mac.finalize().into_bytes())))
}

/// Serialize `request` once and sign the resulting text.
pub fn sign_request(
    request: &NormalizedPaymentRequest,
    request_url: &str,
    secret: &str,
) -> RelayResult<SignedRequest> {
    let body = serde_json::to_string(request)
        .map_err(|e| RelayError::Serialization(e.to_string()))?;
    let authorization = sign(&body, request_url, secret)?;

    Ok(SignedRequest {
        body,
        request_url: request_url.to_string(),
        authorization,
        client_order_id: request.client_order_id.clone(),
    })
}
