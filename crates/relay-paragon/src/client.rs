//! # Paragon Gateway Client
//!
//! Submits signed pay-by-link requests to the Paragon form API.

use crate::config::ParagonConfig;
use crate::response::extract_payment_link;
use crate::signer::sign_request;
use async_trait::async_trait;
use relay_core::{
    GatewayReply, NormalizedPaymentRequest, PaymentGateway, RelayError, RelayResult,
    SignedRequest,
};
use reqwest::{header, Client};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Longest slice of an error body kept in `GatewayRejected`
const MAX_ERROR_BODY: usize = 512;

/// Paragon payment gateway
pub struct ParagonGateway {
    config: ParagonConfig,
    client: Client,
}

impl ParagonGateway {
    /// Create a new gateway client. The configured timeout bounds every submission.
    pub fn new(config: ParagonConfig) -> RelayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RelayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ParagonConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentGateway for ParagonGateway {
    fn sign(&self, request: &NormalizedPaymentRequest) -> RelayResult<SignedRequest> {
        sign_request(
            request,
            &self.config.request_url(),
            &self.config.merchant_control,
        )
    }

    #[instrument(skip(self, request), fields(client_order_id = %request.client_order_id))]
    async fn submit(&self, request: &SignedRequest) -> RelayResult<GatewayReply> {
        debug!(
            url = %request.request_url,
            body_len = request.body.len(),
            "submitting payment request"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&request.request_url)
            .header(header::AUTHORIZATION, &request.authorization)
            .header(header::CONTENT_TYPE, "application/json")
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            let message = truncate(&body, MAX_ERROR_BODY);
            error!(status = status.as_u16(), elapsed_ms, "Paragon API error: {}", message);
            return Err(RelayError::GatewayRejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!("Paragon response is not JSON: {}", e);
            serde_json::Value::Null
        });
        let payment_link = extract_payment_link(&parsed);

        match &payment_link {
            Some(link) => info!(status = status.as_u16(), elapsed_ms, link = %link, "payment link created"),
            None => warn!(status = status.as_u16(), elapsed_ms, "Paragon response has no payment link"),
        }

        Ok(GatewayReply {
            status: status.as_u16(),
            payment_link,
        })
    }

    fn provider_name(&self) -> &'static str {
        "paragon"
    }
}

impl ParagonGateway {
    fn transport_error(&self, err: reqwest::Error) -> RelayError {
        if err.is_timeout() {
            error!(timeout_secs = self.config.timeout_secs, "Paragon request timed out");
            RelayError::GatewayTimeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            error!("Paragon request failed: {}", err);
            RelayError::Network(err.to_string())
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
