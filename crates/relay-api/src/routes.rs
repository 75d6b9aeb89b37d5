//! # Routes
//!
//! Axum router configuration for the relay.

use crate::handlers;
use crate::relay::Acknowledgment;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use relay_core::RelayError;
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Create the main application router
///
/// Routes:
/// - GET  /        - Status
/// - GET  /health  - Liveness
/// - POST /webhooks/orders/create - Order-creation webhook
/// - POST /webhook - Same handler, older path
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;

    // Webhook routes: raw body, bounded, panics become soft acknowledgments
    let webhook_routes = Router::new()
        .route("/webhooks/orders/create", post(handlers::order_created))
        .route("/webhook", post(handlers::order_created))
        .layer(CatchPanicLayer::custom(panic_acknowledgment))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/", get(handlers::status))
        .route("/health", get(handlers::health))
        .merge(webhook_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn panic_acknowledgment(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!("webhook handler panicked: {}", detail);

    let ack = Acknowledgment::failed(&RelayError::Internal(detail), None);

    (StatusCode::OK, Json(ack)).into_response()
}
