//! # Order Relay
//!
//! Turns card-paid store orders into Paragon pay-by-link requests and
//! emails the link to the customer.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PARAGON_API_URL=https://gateway.example.com
//! export PARAGON_ENDPOINT_ID=4021
//! export PARAGON_MERCHANT_CONTROL=...
//! export RESEND_API_KEY=re_...
//!
//! # Run the server (LOG_FORMAT=json for structured logs)
//! order-relay
//! ```

use anyhow::Context;
use relay_api::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        dedup_window_secs = state.config.dedup_window_secs,
        body_limit_bytes = state.config.body_limit_bytes,
        notifications = state.relay.notifications_enabled(),
        "relay configured"
    );

    // Create router
    let app = routes::create_router(state);

    info!("Order relay starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Webhook: POST http://{}/webhooks/orders/create", addr);
    }

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Order relay stopped");

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

/// Completes on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

fn print_banner() {
    println!(
        r#"
  Order Relay
  ━━━━━━━━━━━━━━━━━━━━━━━
  Store orders -> Paragon pay-by-link
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
