//! # Gateway Responses
//!
//! Payment-link extraction from the gateway's JSON reply.

use serde_json::Value;

/// Keys that may carry the hosted payment page, in lookup order
pub const LINK_FIELDS: &[&str] = &[
    "redirectUrl",
    "redirect_url",
    "paymentLink",
    "payment_link",
    "url",
];

/// Envelopes some gateway versions wrap the payload in
const ENVELOPES: &[&str] = &["data", "result"];

/// Find the first non-empty link field, at top level or inside an envelope.
pub fn extract_payment_link(body: &Value) -> Option<String> {
    find_link(body).or_else(|| {
        ENVELOPES
            .iter()
            .filter_map(|key| body.get(*key))
            .find_map(find_link)
    })
}

fn find_link(object: &Value) -> Option<String> {
    LINK_FIELDS
        .iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|link| !link.is_empty())
        .map(String::from)
}
