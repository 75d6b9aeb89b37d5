//! # Request Handlers
//!
//! Axum request handlers for the relay.
//! The order webhook always answers 200; outcomes live in the body.

use crate::relay::Acknowledgment;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use tracing::info;

/// Root status endpoint
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "order-relay",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "notifications": state.relay.notifications_enabled(),
    }))
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "order-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handle an order-creation webhook
pub async fn order_created(State(state): State<AppState>, body: Bytes) -> Json<Acknowledgment> {
    let ack = state.relay.handle_body(&body).await;

    info!(
        ok = ack.ok,
        skipped = ack.skipped.unwrap_or(false),
        client_order_id = ack.client_order_id.as_deref().unwrap_or(""),
        error = ack.error.as_deref().unwrap_or(""),
        "webhook acknowledged"
    );

    Json(ack)
}
