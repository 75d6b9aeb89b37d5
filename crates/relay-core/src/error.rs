//! # Relay Error Types
//!
//! Typed error handling for the order relay.
//! Every fallible relay operation returns `Result<T, RelayError>`.

use thiserror::Error;

/// Core error type for all relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors (missing keys, unusable URLs)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Inbound webhook body could not be read as an order
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Computing the request signature failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Gateway did not answer within the timeout budget
    #[error("Gateway timed out after {timeout_secs}s")]
    GatewayTimeout { timeout_secs: u64 },

    /// Gateway answered with a non-success status
    #[error("Gateway rejected request [{status}]: {message}")]
    GatewayRejected { status: u16, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Email delivery failed
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Email delivery did not complete within the timeout budget
    #[error("Notification timed out after {timeout_secs}s")]
    NotificationTimeout { timeout_secs: u64 },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Short tag reported in the webhook acknowledgment body
    pub fn tag(&self) -> &'static str {
        match self {
            RelayError::Signing(_)
            | RelayError::Serialization(_)
            | RelayError::GatewayTimeout { .. }
            | RelayError::GatewayRejected { .. }
            | RelayError::Network(_) => "paragon-failed",
            RelayError::Notification(_) | RelayError::NotificationTimeout { .. } => {
                "email-failed"
            }
            RelayError::Configuration(_) => "config-error",
            RelayError::InvalidPayload(_) => "invalid-payload",
            RelayError::Internal(_) => "internal-error",
        }
    }

    /// Returns true if the error happened while talking to the payment gateway
    pub fn is_gateway_failure(&self) -> bool {
        self.tag() == "paragon-failed"
    }
}

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
