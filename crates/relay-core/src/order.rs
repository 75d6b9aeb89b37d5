//! # Inbound Order Types
//!
//! The store platform posts orders as loosely-shaped JSON: prices arrive as
//! strings or numbers, gateway names as a list or a single string, and any
//! nested object may be missing or `null`. Shape is validated here, once,
//! so that a malformed field degrades to `None` instead of failing the
//! whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A price or identifier that may arrive as a JSON number or a string
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Scalar::Number(n)),
            Value::String(s) => Some(Scalar::Text(s)),
            _ => None,
        }
    }
}

/// Money amount nested under a price set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Money {
    #[serde(deserialize_with = "lenient::scalar")]
    pub amount: Option<Scalar>,

    #[serde(deserialize_with = "lenient::text")]
    pub currency_code: Option<String>,
}

/// Price expressed in shop and presentment currencies
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceSet {
    #[serde(deserialize_with = "lenient::nested")]
    pub shop_money: Option<Money>,
}

/// Shipping or billing address
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "lenient::text")]
    pub first_name: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub last_name: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub address1: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub address2: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub city: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub province: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub zip: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub country: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub country_code: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub phone: Option<String>,
}

/// Customer record attached to an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Customer {
    #[serde(deserialize_with = "lenient::text")]
    pub first_name: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub last_name: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub phone: Option<String>,
}

/// An order-creation notification from the store platform.
///
/// Unknown fields are ignored. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InboundOrder {
    /// Human-readable order name (e.g. `#1001`)
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,

    /// Numeric order number
    #[serde(deserialize_with = "lenient::scalar")]
    pub order_number: Option<Scalar>,

    /// Gateways that processed the order. A bare string becomes a one-element list.
    #[serde(deserialize_with = "lenient::string_list")]
    pub payment_gateway_names: Vec<String>,

    #[serde(deserialize_with = "lenient::scalar")]
    pub total_price: Option<Scalar>,

    #[serde(deserialize_with = "lenient::scalar")]
    pub current_total_price: Option<Scalar>,

    #[serde(deserialize_with = "lenient::scalar")]
    pub subtotal_price: Option<Scalar>,

    #[serde(deserialize_with = "lenient::nested")]
    pub total_price_set: Option<PriceSet>,

    #[serde(deserialize_with = "lenient::nested")]
    pub shipping_address: Option<Address>,

    #[serde(deserialize_with = "lenient::nested")]
    pub billing_address: Option<Address>,

    #[serde(deserialize_with = "lenient::nested")]
    pub customer: Option<Customer>,

    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub contact_email: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub phone: Option<String>,
}

impl InboundOrder {
    /// Parse an order from a raw webhook body
    pub fn from_slice(body: &[u8]) -> crate::RelayResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| crate::RelayError::InvalidPayload(e.to_string()))?;
        if !value.is_object() {
            return Err(crate::RelayError::InvalidPayload(
                "order body must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| crate::RelayError::InvalidPayload(e.to_string()))
    }

    /// Shipping address, falling back to the billing address
    pub fn address(&self) -> Option<&Address> {
        self.shipping_address
            .as_ref()
            .or(self.billing_address.as_ref())
    }

    /// Amount nested under `total_price_set.shop_money.amount`
    pub fn shop_money_amount(&self) -> Option<&Scalar> {
        self.total_price_set
            .as_ref()
            .and_then(|set| set.shop_money.as_ref())
            .and_then(|money| money.amount.as_ref())
    }
}

/// Trimmed, non-empty view of an optional string field
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

mod lenient {
    use super::*;
    use serde::de::DeserializeOwned;

    pub fn text<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn scalar<'de, D>(d: D) -> Result<Option<Scalar>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Scalar::from_value(Value::deserialize(d)?))
    }

    pub fn string_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Value::String(s) => vec![s],
            _ => Vec::new(),
        })
    }

    pub fn nested<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            value @ Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }
}
