//! # Resend Delivery
//!
//! Sends composed emails through the Resend HTTP API.

use crate::config::MailConfig;
use async_trait::async_trait;
use relay_core::{EmailMessage, Notifier, RelayError, RelayResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, instrument};

/// Resend-backed notifier
pub struct ResendNotifier {
    config: MailConfig,
    client: Client,
}

impl ResendNotifier {
    pub fn new(config: MailConfig) -> RelayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RelayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    async fn send(&self, message: &EmailMessage) -> RelayResult<()> {
        let url = format!("{}/emails", self.config.api_base_url.trim_end_matches('/'));
        let payload = SendEmailRequest {
            from: self.config.from_header(),
            to: vec![message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::NotificationTimeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RelayError::Notification(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!("Resend API error: status={}, body={}", status, body);
            let message = serde_json::from_str::<ResendErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
            return Err(RelayError::Notification(message));
        }

        let id = serde_json::from_str::<SendEmailResponse>(&body)
            .map(|r| r.id)
            .unwrap_or_default();
        info!(email_id = %id, "payment email sent");

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "resend"
    }
}

// =============================================================================
// Resend API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> EmailMessage {
        EmailMessage {
            to: "marie@example.com".into(),
            subject: "Complete payment for order #1001".into(),
            html: "<p>Pay</p>".into(),
        }
    }

    fn notifier(server: &MockServer) -> ResendNotifier {
        let config = MailConfig::new("re_test_key", "orders@shop.example")
            .with_api_base_url(server.uri());
        ResendNotifier::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test_key"))
            .and(body_json(json!({
                "from": "Payments <orders@shop.example>",
                "to": ["marie@example.com"],
                "subject": "Complete payment for order #1001",
                "html": "<p>Pay</p>"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em_123" })))
            .expect(1)
            .mount(&server)
            .await;

        notifier(&server).send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({ "name": "validation_error", "message": "Invalid `to` field" })),
            )
            .mount(&server)
            .await;

        let err = notifier(&server).send(&message()).await.unwrap_err();
        assert_eq!(err.tag(), "email-failed");
        assert!(err.to_string().contains("Invalid `to` field"));
    }
}
