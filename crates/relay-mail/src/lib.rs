//! # relay-mail
//!
//! Customer notification for order-relay.
//!
//! - `compose_payment_email` renders the payment-link email for an order
//! - `ResendNotifier` delivers it through the Resend HTTP API
//!
//! ```rust,ignore
//! use relay_core::Notifier;
//! use relay_mail::{compose_payment_email, MailConfig, ResendNotifier};
//!
//! let notifier = ResendNotifier::new(MailConfig::default().with_env_overrides())?;
//! if let Some(message) = compose_payment_email(&prepared.summary, &payment_link) {
//!     notifier.send(&message).await?;
//! }
//! ```

pub mod config;
pub mod message;
pub mod resend;

pub use config::MailConfig;
pub use message::compose_payment_email;
pub use resend::ResendNotifier;
