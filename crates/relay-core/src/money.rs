//! # Amounts
//!
//! Amount resolution and display for the single settlement currency.

use crate::order::{InboundOrder, Scalar};

/// Settlement currency sent with every payment request
pub const CURRENCY: &str = "GBP";

/// Amount used when the order carries no usable price
pub const DEFAULT_AMOUNT: &str = "0.00";

const CURRENCY_SYMBOL: &str = "£";

/// Render a price field as a request amount.
///
/// Numbers are formatted to exactly two decimal places. Strings are trimmed
/// and passed through untouched, without numeric validation. Blank strings
/// and non-finite numbers yield `None`.
pub fn format_amount(value: &Scalar) -> Option<String> {
    match value {
        Scalar::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| format!("{:.2}", f)),
        Scalar::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

/// Resolve the order amount.
///
/// Tries total price, current total price, subtotal price and finally the
/// shop-money amount; the first usable value wins.
pub fn resolve_amount(order: &InboundOrder) -> String {
    [
        order.total_price.as_ref(),
        order.current_total_price.as_ref(),
        order.subtotal_price.as_ref(),
        order.shop_money_amount(),
    ]
    .into_iter()
    .flatten()
    .find_map(format_amount)
    .unwrap_or_else(|| DEFAULT_AMOUNT.to_string())
}

/// Format an amount for display (e.g., "£45.00").
///
/// Amounts that do not parse as a number are shown verbatim with the
/// currency code appended.
pub fn display_amount(amount: &str) -> String {
    match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => format!("{}{:.2}", CURRENCY_SYMBOL, value),
        _ => format!("{} {}", amount.trim(), CURRENCY),
    }
}
