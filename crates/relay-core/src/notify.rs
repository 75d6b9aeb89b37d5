//! # Notifier Trait
//!
//! Seam between the webhook orchestrator and email delivery.

use crate::error::RelayResult;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// A composed email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email delivery backend.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> RelayResult<()>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared notifier (dynamic dispatch)
pub type BoxedNotifier = Arc<dyn Notifier>;
