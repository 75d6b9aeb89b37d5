//! # Payment Request Types
//!
//! The normalized request sent to the payment gateway, its signed wire form,
//! and the display fields used to notify the customer.

use serde::{Deserialize, Serialize};

/// Buyer block of a payment request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    /// Always empty; the gateway does not use it for GB addresses
    pub state: String,
    pub zip_code: String,
    /// ISO 3166 alpha-2, uppercased
    pub country: String,
    pub phone: String,
}

/// Technical block of a payment request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDetails {
    pub ipaddress: String,
    pub redirect_url: String,
    pub webhook_url: String,
    pub pay_by_link: bool,
}

/// Gateway payment request built from a store order.
///
/// Field order here is the field order on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPaymentRequest {
    /// Namespaced order identifier
    pub client_order_id: String,

    /// Decimal amount as text
    pub amount: String,

    pub currency: String,

    pub buyer_details: BuyerDetails,

    pub technical_details: TechnicalDetails,

    pub order_description: String,

    pub merchant_control: String,
}

/// A serialized request together with its authorization token.
///
/// `body` is the exact text that was signed; it must be transmitted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub body: String,
    pub request_url: String,
    pub authorization: String,
    pub client_order_id: String,
}

/// Display fields for the customer notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Order number as the store shows it (before namespacing)
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    /// Amount with currency symbol (e.g., "£45.00")
    pub display_amount: String,
    pub address_lines: Vec<String>,
}

/// Output of a successful transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPayment {
    pub request: NormalizedPaymentRequest,
    pub summary: OrderSummary,
}

impl PreparedPayment {
    pub fn client_order_id(&self) -> &str {
        &self.request.client_order_id
    }
}
