//! # Paragon Configuration
//!
//! Configuration for the gateway integration.
//! Non-secret values may come from the relay's TOML file; environment
//! variables always win.

use relay_core::{RelayError, TransformConfig};
use serde::Deserialize;
use std::env;

/// Default per-submission timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Paragon API configuration
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ParagonConfig {
    /// API base URL (e.g., "https://gateway.example.com")
    pub api_base_url: String,

    /// Endpoint identifier assigned to the merchant
    pub endpoint_id: String,

    /// Form method (e.g., "sale")
    pub method: String,

    /// Signing secret, also sent as `merchantControl`
    #[serde(skip)]
    pub merchant_control: String,

    /// Where the shopper lands after paying
    pub redirect_url: String,

    /// Gateway status callback
    pub webhook_url: String,

    /// Submission timeout in seconds
    pub timeout_secs: u64,
}

impl ParagonConfig {
    /// Create config with explicit values (for testing)
    pub fn new(
        api_base_url: impl Into<String>,
        endpoint_id: impl Into<String>,
        merchant_control: impl Into<String>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            endpoint_id: endpoint_id.into(),
            merchant_control: merchant_control.into(),
            ..Self::default()
        }
    }

    /// Replace fields with any `PARAGON_*` variables that are set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PARAGON_API_URL") {
            self.api_base_url = v;
        }
        if let Ok(v) = env::var("PARAGON_ENDPOINT_ID") {
            self.endpoint_id = v;
        }
        if let Ok(v) = env::var("PARAGON_METHOD") {
            self.method = v;
        }
        if let Ok(v) = env::var("PARAGON_MERCHANT_CONTROL") {
            self.merchant_control = v;
        }
        if let Ok(v) = env::var("PARAGON_REDIRECT_URL") {
            self.redirect_url = v;
        }
        if let Ok(v) = env::var("PARAGON_WEBHOOK_URL") {
            self.webhook_url = v;
        }
        if let Some(v) = env::var("PARAGON_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_secs = v;
        }
        self
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.api_base_url.trim().is_empty() {
            return Err(RelayError::Configuration(
                "PARAGON_API_URL not set".to_string(),
            ));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(RelayError::Configuration(
                "PARAGON_API_URL must start with http:// or https://".to_string(),
            ));
        }
        if self.endpoint_id.trim().is_empty() {
            return Err(RelayError::Configuration(
                "PARAGON_ENDPOINT_ID not set".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(RelayError::Configuration(
                "PARAGON_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Full form URL: `{base}/v4/{endpointId}/form/{method}`
    pub fn request_url(&self) -> String {
        format!(
            "{}/v4/{}/form/{}",
            self.api_base_url.trim_end_matches('/'),
            self.endpoint_id,
            self.method
        )
    }

    pub fn has_merchant_control(&self) -> bool {
        !self.merchant_control.trim().is_empty()
    }

    /// Settings handed to the order transformer
    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig::new(
            self.merchant_control.clone(),
            self.redirect_url.clone(),
            self.webhook_url.clone(),
        )
    }

    /// Builder: set redirect and callback URLs
    pub fn with_urls(
        mut self,
        redirect_url: impl Into<String>,
        webhook_url: impl Into<String>,
    ) -> Self {
        self.redirect_url = redirect_url.into();
        self.webhook_url = webhook_url.into();
        self
    }

    /// Builder: set the submission timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for ParagonConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            endpoint_id: String::new(),
            method: "sale".to_string(),
            merchant_control: String::new(),
            redirect_url: String::new(),
            webhook_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ParagonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParagonConfig")
            .field("api_base_url", &self.api_base_url)
            .field("endpoint_id", &self.endpoint_id)
            .field("method", &self.method)
            .field("merchant_control", &"<redacted>")
            .field("redirect_url", &self.redirect_url)
            .field("webhook_url", &self.webhook_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url() {
        let config = ParagonConfig::new("https://gateway.example.com/", "4021", "secret");
        assert_eq!(
            config.request_url(),
            "https://gateway.example.com/v4/4021/form/sale"
        );
    }

    #[test]
    fn test_validation() {
        assert!(ParagonConfig::new("https://gw.example", "1", "s").validate().is_ok());
        assert!(ParagonConfig::new("", "1", "s").validate().is_err());
        assert!(ParagonConfig::new("gw.example", "1", "s").validate().is_err());
        assert!(ParagonConfig::new("https://gw.example", " ", "s").validate().is_err());
        assert!(ParagonConfig::new("https://gw.example", "1", "s")
            .with_timeout_secs(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_missing_merchant_control_is_not_fatal() {
        let config = ParagonConfig::new("https://gw.example", "1", "");
        assert!(config.validate().is_ok());
        assert!(!config.has_merchant_control());
        assert!(!config.transform_config().has_merchant_control());
    }

    #[test]
    fn test_file_section_ignores_secret() {
        let config: ParagonConfig = from_json(
            r#"{"api_base_url":"https://gw.example","endpoint_id":"9","merchant_control":"leaked"}"#,
        );
        assert_eq!(config.endpoint_id, "9");
        assert_eq!(config.method, "sale");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.merchant_control, "");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ParagonConfig::new("https://gw.example", "1", "top-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("top-secret"));
        assert!(printed.contains("<redacted>"));
    }

    fn from_json(json: &str) -> ParagonConfig {
        serde_json::from_str(json).unwrap()
    }
}
