//! Email configuration (Resend)

use relay_core::RelayError;
use serde::Deserialize;
use std::env;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Email delivery settings.
///
/// Without an API key notifications are disabled.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Resend API key
    #[serde(skip)]
    pub api_key: String,

    /// From email address
    pub from_email: String,

    /// From name
    pub from_name: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Send timeout in seconds
    pub timeout_secs: u64,
}

impl MailConfig {
    /// Create config with explicit values (for testing)
    pub fn new(api_key: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from_email: from_email.into(),
            ..Self::default()
        }
    }

    /// Replace fields with any mail variables that are set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.api_key = v;
        }
        if let Ok(v) = env::var("MAIL_FROM") {
            self.from_email = v;
        }
        if let Ok(v) = env::var("MAIL_FROM_NAME") {
            self.from_name = v;
        }
        if let Ok(v) = env::var("MAIL_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = env::var("MAIL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_secs = v;
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        if self.from_name.trim().is_empty() {
            self.from_email.clone()
        } else {
            format!("{} <{}>", self.from_name, self.from_email)
        }
    }

    /// Validate email configuration. A disabled config is always valid.
    pub fn validate(&self) -> Result<(), RelayError> {
        if !self.is_enabled() {
            return Ok(());
        }
        if !self.api_key.starts_with("re_") {
            return Err(RelayError::Configuration(
                "RESEND_API_KEY must start with re_".to_string(),
            ));
        }
        if !self.from_email.contains('@') {
            return Err(RelayError::Configuration(
                "MAIL_FROM must be an email address".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(RelayError::Configuration(
                "MAIL_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_email: "payments@example.com".to_string(),
            from_name: "Payments".to_string(),
            api_base_url: "https://api.resend.com".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("enabled", &self.is_enabled())
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
