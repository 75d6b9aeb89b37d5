//! # relay-api
//!
//! HTTP layer for order-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The order webhook orchestrator (`WebhookRelay`)
//! - Duplicate-submission suppression
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Status |
//! | GET | `/health` | Health check |
//! | POST | `/webhooks/orders/create` | Order-creation webhook |
//! | POST | `/webhook` | Order-creation webhook (older path) |

pub mod dedup;
pub mod handlers;
pub mod relay;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use relay::{Acknowledgment, WebhookRelay};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
