//! # Order Transformer
//!
//! Maps an inbound store order onto a gateway payment request.
//!
//! ```text
//! InboundOrder ──► merchant control set? ──► card gateway? ──► resolve fields ──► PreparedPayment
//!                        │ no                     │ no
//!                        ▼                        ▼
//!                 Skipped(MissingMerchantControl) Skipped(NotCardPayment)
//! ```
//!
//! The transform is a pure function of the order and `TransformConfig`,
//! except for the `no-order-<millis>` fallback identifier.

use crate::money::{display_amount, resolve_amount, CURRENCY};
use crate::order::{non_empty, Address, InboundOrder, Scalar};
use crate::payment::{
    BuyerDetails, NormalizedPaymentRequest, OrderSummary, PreparedPayment, TechnicalDetails,
};
use chrono::Utc;

/// Namespace prepended to every client order id
pub const CLIENT_ORDER_PREFIX: &str = "shopify-";

/// Buyer IP reported to the gateway; the relay never sees the shopper's address
pub const PLACEHOLDER_IP: &str = "127.0.0.1";

pub const DEFAULT_COUNTRY: &str = "GB";

pub const DEFAULT_NAME: &str = "Customer";

/// Settings the transformer needs, resolved once at startup
#[derive(Debug, Clone, Default)]
pub struct TransformConfig {
    /// Shared signing secret, sent as `merchantControl`
    pub merchant_control: String,
    /// Where the gateway sends the shopper after paying
    pub redirect_url: String,
    /// Gateway callback for payment status
    pub webhook_url: String,
}

impl TransformConfig {
    pub fn new(
        merchant_control: impl Into<String>,
        redirect_url: impl Into<String>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            merchant_control: merchant_control.into(),
            redirect_url: redirect_url.into(),
            webhook_url: webhook_url.into(),
        }
    }

    pub fn has_merchant_control(&self) -> bool {
        !self.merchant_control.trim().is_empty()
    }
}

/// Why an order was not turned into a payment request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No signing secret configured
    MissingMerchantControl,
    /// None of the order's gateways is a card gateway
    NotCardPayment,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingMerchantControl => "missing-merchant-control",
            SkipReason::NotCardPayment => "not-card-payment",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of transforming an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed {
    Ready(PreparedPayment),
    Skipped(SkipReason),
}

impl Transformed {
    pub fn into_prepared(self) -> Option<PreparedPayment> {
        match self {
            Transformed::Ready(prepared) => Some(prepared),
            Transformed::Skipped(_) => None,
        }
    }
}

/// Case-insensitive card gateway check (`card`, `Card Payment`, `card payments`, ...)
pub fn is_card_gateway(name: &str) -> bool {
    name.to_lowercase().contains("card")
}

/// Prefix `order_number` with the client namespace unless it already carries it
pub fn namespaced_order_id(order_number: &str) -> String {
    let trimmed = order_number.trim();
    if trimmed.starts_with(CLIENT_ORDER_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", CLIENT_ORDER_PREFIX, trimmed)
    }
}

/// Transform an inbound order into a payment request.
pub fn transform(order: &InboundOrder, config: &TransformConfig) -> Transformed {
    if !config.has_merchant_control() {
        return Transformed::Skipped(SkipReason::MissingMerchantControl);
    }

    if !order.payment_gateway_names.iter().any(|name| is_card_gateway(name)) {
        return Transformed::Skipped(SkipReason::NotCardPayment);
    }

    let order_number = resolve_order_number(order);
    let client_order_id = namespaced_order_id(&order_number);
    let amount = resolve_amount(order);

    let empty = Address::default();
    let address = order.address().unwrap_or(&empty);
    let customer = order.customer.as_ref();

    let first_name = non_empty(&address.first_name)
        .or_else(|| customer.and_then(|c| non_empty(&c.first_name)));
    let last_name = non_empty(&address.last_name)
        .or_else(|| customer.and_then(|c| non_empty(&c.last_name)));
    let email = customer
        .and_then(|c| non_empty(&c.email))
        .or_else(|| non_empty(&order.email))
        .or_else(|| non_empty(&order.contact_email));
    let phone = non_empty(&address.phone)
        .or_else(|| customer.and_then(|c| non_empty(&c.phone)))
        .or_else(|| non_empty(&order.phone));

    let street = [non_empty(&address.address1), non_empty(&address.address2)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    let country = non_empty(&address.country_code)
        .or_else(|| non_empty(&address.country))
        .map(str::to_uppercase)
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

    let buyer_details = BuyerDetails {
        first_name: first_name.unwrap_or(DEFAULT_NAME).to_string(),
        last_name: last_name.unwrap_or(DEFAULT_NAME).to_string(),
        email: email.unwrap_or_default().to_string(),
        address: street,
        city: non_empty(&address.city).unwrap_or_default().to_string(),
        state: String::new(),
        zip_code: non_empty(&address.zip).unwrap_or_default().to_string(),
        country,
        phone: phone.unwrap_or_default().to_string(),
    };

    let customer_name = match [first_name, last_name].into_iter().flatten().collect::<Vec<_>>() {
        parts if parts.is_empty() => DEFAULT_NAME.to_string(),
        parts => parts.join(" "),
    };

    let address_lines = [
        non_empty(&address.address1),
        non_empty(&address.address2),
        non_empty(&address.city),
        non_empty(&address.province),
        non_empty(&address.zip),
        Some(buyer_details.country.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(String::from)
    .collect();

    let summary = OrderSummary {
        order_number,
        customer_name,
        customer_email: email.map(String::from),
        display_amount: display_amount(&amount),
        address_lines,
    };

    let request = NormalizedPaymentRequest {
        order_description: format!("Order {}", client_order_id),
        client_order_id,
        amount,
        currency: CURRENCY.to_string(),
        buyer_details,
        technical_details: TechnicalDetails {
            ipaddress: PLACEHOLDER_IP.to_string(),
            redirect_url: config.redirect_url.clone(),
            webhook_url: config.webhook_url.clone(),
            pay_by_link: true,
        },
        merchant_control: config.merchant_control.clone(),
    };

    Transformed::Ready(PreparedPayment { request, summary })
}

/// Order name, else the stringified order number, else a time-based fallback
fn resolve_order_number(order: &InboundOrder) -> String {
    if let Some(name) = non_empty(&order.name) {
        return name.to_string();
    }

    let number = match &order.order_number {
        Some(Scalar::Number(n)) => n
            .as_u64()
            .map(|v| v.to_string())
            .or_else(|| n.as_i64().map(|v| v.to_string()))
            .or_else(|| n.as_f64().map(|v| v.to_string())),
        Some(Scalar::Text(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        None => None,
    };

    number.unwrap_or_else(|| format!("no-order-{}", Utc::now().timestamp_millis()))
}
