//! # Payment Gateway Trait
//!
//! Seam between the webhook orchestrator and the payment gateway.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          PaymentGateway (trait)              │
//! │  ├── sign()    serialize once + authorize    │
//! │  ├── submit()  POST the signed body          │
//! │  └── provider_name()                         │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!              ┌────────┴────────┐
//!              │ ParagonGateway  │
//!              └─────────────────┘
//! ```

use crate::error::RelayResult;
use crate::payment::{NormalizedPaymentRequest, SignedRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// What the gateway answered to a submission
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    /// HTTP status of the gateway response
    pub status: u16,
    /// Hosted payment page, if the gateway returned one
    pub payment_link: Option<String>,
}

impl GatewayReply {
    /// Payment link, or an empty string when the gateway returned none
    pub fn link_or_empty(&self) -> &str {
        self.payment_link.as_deref().unwrap_or("")
    }
}

/// Core trait for payment gateway integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Serialize `request` exactly once and compute its authorization token.
    ///
    /// The returned `SignedRequest::body` is the text that was signed and the
    /// text that `submit` must transmit.
    fn sign(&self, request: &NormalizedPaymentRequest) -> RelayResult<SignedRequest>;

    /// Submit a signed request. A non-success status is an error.
    async fn submit(&self, request: &SignedRequest) -> RelayResult<GatewayReply>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
