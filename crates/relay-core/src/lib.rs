//! # relay-core
//!
//! Core types and traits for the order-relay webhook service.
//!
//! This crate provides:
//! - `InboundOrder`, a loosely-typed store order validated at the boundary
//! - `transform`, which turns a card-paid order into a `NormalizedPaymentRequest`
//! - `PaymentGateway` and `Notifier` traits for the outbound collaborators
//! - `RelayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use relay_core::{transform, InboundOrder, TransformConfig, Transformed};
//!
//! let order: InboundOrder = serde_json::from_slice(&body)?;
//!
//! match transform(&order, &config) {
//!     Transformed::Ready(prepared) => {
//!         let signed = gateway.sign(&prepared.request)?;
//!         let reply = gateway.submit(&signed).await?;
//!         // Email reply.payment_link to prepared.summary.customer_email
//!     }
//!     Transformed::Skipped(reason) => {
//!         // Not a card payment, or no signing secret configured
//!     }
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod money;
pub mod notify;
pub mod order;
pub mod payment;
pub mod transform;

// Re-exports for convenience
pub use error::{RelayError, RelayResult};
pub use gateway::{BoxedPaymentGateway, GatewayReply, PaymentGateway};
pub use money::{display_amount, CURRENCY};
pub use notify::{BoxedNotifier, EmailMessage, Notifier};
pub use order::{Address, Customer, InboundOrder, Money, PriceSet, Scalar};
pub use payment::{
    BuyerDetails, NormalizedPaymentRequest, OrderSummary, PreparedPayment, SignedRequest,
    TechnicalDetails,
};
pub use transform::{
    is_card_gateway, namespaced_order_id, transform, SkipReason, TransformConfig, Transformed,
    CLIENT_ORDER_PREFIX,
};
