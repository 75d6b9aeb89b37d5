//! # Application State
//!
//! Shared state for the Axum application.
//! Configuration is read once at startup (optional TOML file, then
//! environment) and handed to the relay as explicit structs.

use crate::relay::WebhookRelay;
use relay_core::{BoxedNotifier, BoxedPaymentGateway};
use relay_mail::{MailConfig, ResendNotifier};
use relay_paragon::{ParagonConfig, ParagonGateway};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Largest accepted webhook body
    pub body_limit_bytes: usize,
    /// Duplicate-suppression window; 0 disables it
    pub dedup_window_secs: u64,
}

impl AppConfig {
    /// Replace fields with any server variables that are set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("HOST") {
            self.host = v;
        }
        if let Some(v) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = v;
        }
        if let Ok(v) = std::env::var("ENVIRONMENT") {
            self.environment = v;
        }
        if let Some(v) = std::env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            self.body_limit_bytes = v;
        }
        if let Some(v) = std::env::var("DEDUP_WINDOW_SECS")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            self.dedup_window_secs = v;
        }
        self
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: "development".to_string(),
            body_limit_bytes: 2 * 1024 * 1024,
            dedup_window_secs: 600,
        }
    }
}

/// Layout of `config/relay.toml`. Secrets are never read from the file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: AppConfig,
    pub paragon: ParagonConfig,
    pub mail: MailConfig,
}

impl FileConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse relay config: {}", e))
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order relay
    pub relay: Arc<WebhookRelay>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the config file and environment
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = load_file_config()?;
        let config = file.server.with_env_overrides();

        let paragon = file.paragon.with_env_overrides();
        paragon
            .validate()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Paragon: {}", e))?;
        if !paragon.has_merchant_control() {
            tracing::warn!("PARAGON_MERCHANT_CONTROL not set, every order will be skipped");
        }

        let mail = file.mail.with_env_overrides();
        mail.validate()
            .map_err(|e| anyhow::anyhow!("Failed to initialize mail: {}", e))?;

        let transform_config = paragon.transform_config();
        let gateway: BoxedPaymentGateway = Arc::new(ParagonGateway::new(paragon)?);

        let mut relay = WebhookRelay::new(gateway, transform_config)
            .with_dedup_window(Duration::from_secs(config.dedup_window_secs))
            .with_notify_timeout(Duration::from_secs(mail.timeout_secs));

        if mail.is_enabled() {
            let notifier: BoxedNotifier = Arc::new(ResendNotifier::new(mail)?);
            relay = relay.with_notifier(notifier);
        } else {
            tracing::warn!("RESEND_API_KEY not set, payment emails are disabled");
        }

        Ok(Self::from_parts(config, relay))
    }

    /// Assemble state from an already-built relay
    pub fn from_parts(config: AppConfig, relay: WebhookRelay) -> Self {
        Self {
            relay: Arc::new(relay),
            config,
        }
    }
}

/// Load the relay config file, if one exists
fn load_file_config() -> anyhow::Result<FileConfig> {
    let config_paths = [
        "config/relay.toml",
        "../config/relay.toml",
        "../../config/relay.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let config = FileConfig::parse(&content)
                .map_err(|e| anyhow::anyhow!("{}: {}", path, e))?;
            tracing::info!("Loaded relay config from {}", path);
            return Ok(config);
        }
    }

    tracing::info!("No relay config file found, using environment only");
    Ok(FileConfig::default())
}
