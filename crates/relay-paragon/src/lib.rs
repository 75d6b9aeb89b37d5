//! # relay-paragon
//!
//! Paragon payment gateway integration for order-relay.
//!
//! Requests are signed with HMAC-SHA256 over the serialized body followed by
//! the request URL, and sent as `Authorization: Bearer <hex>`. The body is
//! serialized exactly once; the signed text is the transmitted text.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_core::PaymentGateway;
//! use relay_paragon::{ParagonConfig, ParagonGateway};
//!
//! let config = ParagonConfig::default().with_env_overrides();
//! config.validate()?;
//! let gateway = ParagonGateway::new(config)?;
//!
//! let signed = gateway.sign(&prepared.request)?;
//! let reply = gateway.submit(&signed).await?;
//!
//! // Email reply.payment_link to the customer
//! ```

pub mod client;
pub mod config;
pub mod response;
pub mod signer;

// Re-exports
pub use client::ParagonGateway;
pub use config::ParagonConfig;
pub use response::extract_payment_link;
pub use signer::{sign, sign_request};
