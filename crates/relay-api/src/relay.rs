//! # Webhook Orchestrator
//!
//! Drives one inbound order through the relay:
//!
//! ```text
//! receive ─► transform ─► claim id ─► sign ─► submit ─► extract link ─► notify ─► acknowledge
//!               │             │          │        │                       │
//!               ▼             ▼          └────┬───┘                       ▼
//!          skipped ack   duplicate ack   paragon-failed ack        email-failed in ack
//! ```
//!
//! Every path ends in an `Acknowledgment`; nothing here is surfaced to the
//! caller as an HTTP error.

use crate::dedup::{Claim, ClaimHold, SubmissionGuard};
use relay_core::{
    transform, BoxedNotifier, BoxedPaymentGateway, InboundOrder, PreparedPayment, RelayError,
    RelayResult, TransformConfig, Transformed,
};
use relay_mail::compose_payment_email;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn, Instrument};
use uuid::Uuid;

/// Default bound on a single email send
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);

/// JSON body returned to the webhook sender
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Acknowledgment {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,

    /// Why the order was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Set when the order was already submitted within the guard window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Acknowledgment {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            ok: true,
            skipped: Some(true),
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn duplicate(client_order_id: &str, payment_link: Option<String>) -> Self {
        Self {
            ok: true,
            skipped: Some(true),
            duplicate: Some(true),
            payment_link,
            client_order_id: Some(client_order_id.to_string()),
            ..Self::default()
        }
    }

    pub fn failed(err: &RelayError, client_order_id: Option<&str>) -> Self {
        Self {
            ok: false,
            client_order_id: client_order_id.map(String::from),
            error: Some(err.tag().to_string()),
            message: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn delivered(client_order_id: &str, payment_link: String, email_sent: bool) -> Self {
        Self {
            ok: true,
            payment_link: Some(payment_link),
            client_order_id: Some(client_order_id.to_string()),
            email_sent: Some(email_sent),
            ..Self::default()
        }
    }

    /// Attach a notification failure without changing the outcome
    pub fn with_notification_error(mut self, err: &RelayError) -> Self {
        self.error = Some(err.tag().to_string());
        self.message = Some(err.to_string());
        self
    }
}

/// Order-to-payment-link relay
pub struct WebhookRelay {
    transform_config: TransformConfig,
    guard: Arc<SubmissionGuard>,
    delivery: Delivery,
}

impl WebhookRelay {
    /// Create a relay without notifications or duplicate suppression
    pub fn new(gateway: BoxedPaymentGateway, transform_config: TransformConfig) -> Self {
        Self {
            transform_config,
            guard: Arc::new(SubmissionGuard::disabled()),
            delivery: Delivery {
                gateway,
                notifier: None,
                notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            },
        }
    }

    /// Builder: deliver payment emails through `notifier`
    pub fn with_notifier(mut self, notifier: BoxedNotifier) -> Self {
        self.delivery.notifier = Some(notifier);
        self
    }

    /// Builder: suppress resubmission of the same client order id within `window`
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.guard = Arc::new(SubmissionGuard::new(window));
        self
    }

    /// Builder: bound a single email send
    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.delivery.notify_timeout = timeout;
        self
    }

    pub fn notifications_enabled(&self) -> bool {
        self.delivery.notifier.is_some()
    }

    /// Handle a raw webhook body
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn handle_body(&self, body: &[u8]) -> Acknowledgment {
        match InboundOrder::from_slice(body) {
            Ok(order) => self.handle(&order).await,
            Err(e) => {
                warn!(body_len = body.len(), "rejecting webhook body: {}", e);
                Acknowledgment::failed(&e, None)
            }
        }
    }

    /// Handle a parsed order.
    ///
    /// Submission and notification run on their own task: if the caller is
    /// dropped (sender disconnected), they still run to completion or timeout.
    pub async fn handle(&self, order: &InboundOrder) -> Acknowledgment {
        let prepared = match transform(order, &self.transform_config) {
            Transformed::Ready(prepared) => prepared,
            Transformed::Skipped(reason) => {
                info!(
                    reason = %reason,
                    gateways = ?order.payment_gateway_names,
                    "order skipped"
                );
                return Acknowledgment::skipped(reason.as_str());
            }
        };

        let client_order_id = prepared.client_order_id().to_string();

        if let Claim::Duplicate { payment_link } = self.guard.claim(&client_order_id) {
            info!(client_order_id = %client_order_id, "duplicate webhook, not resubmitting");
            return Acknowledgment::duplicate(&client_order_id, payment_link);
        }
        let hold = ClaimHold::new(self.guard.clone(), client_order_id.as_str());

        let delivery = self.delivery.clone();
        let task = tokio::spawn(delivery.run(prepared, hold).in_current_span());

        match task.await {
            Ok(ack) => ack,
            Err(e) => {
                error!(client_order_id = %client_order_id, "delivery task failed: {}", e);
                Acknowledgment::failed(
                    &RelayError::Internal(e.to_string()),
                    Some(client_order_id.as_str()),
                )
            }
        }
    }
}

/// Everything needed to submit and notify, detached from the request
#[derive(Clone)]
struct Delivery {
    gateway: BoxedPaymentGateway,
    notifier: Option<BoxedNotifier>,
    notify_timeout: Duration,
}

impl Delivery {
    async fn run(self, prepared: PreparedPayment, hold: ClaimHold) -> Acknowledgment {
        let client_order_id = hold.id().to_string();

        // Failure drops `hold`, releasing the id for a retry
        let payment_link = match self.submit(&prepared).await {
            Ok(link) => link,
            Err(e) => {
                error!(client_order_id = %client_order_id, "gateway submission failed: {}", e);
                return Acknowledgment::failed(&e, Some(client_order_id.as_str()));
            }
        };

        hold.complete((!payment_link.is_empty()).then(|| payment_link.clone()));

        match self.notify(&prepared, &payment_link).await {
            Ok(sent) => Acknowledgment::delivered(&client_order_id, payment_link, sent),
            Err(e) => {
                error!(client_order_id = %client_order_id, "payment email failed: {}", e);
                Acknowledgment::delivered(&client_order_id, payment_link, false)
                    .with_notification_error(&e)
            }
        }
    }

    /// Sign and submit; returns the payment link (empty if the gateway gave none)
    async fn submit(&self, prepared: &PreparedPayment) -> RelayResult<String> {
        let signed = self.gateway.sign(&prepared.request)?;

        info!(
            client_order_id = %signed.client_order_id,
            order_number = %prepared.summary.order_number,
            amount = %prepared.request.amount,
            provider = self.gateway.provider_name(),
            "submitting payment request"
        );

        let reply = self.gateway.submit(&signed).await?;
        Ok(reply.link_or_empty().to_string())
    }

    /// Send the payment email. `Ok(false)` means there was nothing to send.
    async fn notify(&self, prepared: &PreparedPayment, payment_link: &str) -> RelayResult<bool> {
        let Some(message) = compose_payment_email(&prepared.summary, payment_link) else {
            info!(
                has_email = prepared.summary.customer_email.is_some(),
                has_link = !payment_link.is_empty(),
                "no email to send"
            );
            return Ok(false);
        };

        let Some(notifier) = &self.notifier else {
            info!("notifications disabled, not emailing payment link");
            return Ok(false);
        };

        match tokio::time::timeout(self.notify_timeout, notifier.send(&message)).await {
            Ok(result) => result.map(|_| true),
            Err(_) => Err(RelayError::NotificationTimeout {
                timeout_secs: whole_secs(self.notify_timeout),
            }),
        }
    }
}

/// Seconds, rounded up so a sub-second bound never reports as 0s
fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockGateway, MockNotifier};
    use serde_json::json;

    fn config() -> TransformConfig {
        TransformConfig::new("merchant-secret", "https://shop.example/thanks", "https://relay.example/cb")
    }

    fn card_order(email: Option<&str>) -> InboundOrder {
        let mut value = json!({
            "name": "#1001",
            "payment_gateway_names": ["Card Payments"],
            "total_price": "45.00",
            "shipping_address": { "first_name": "Marie", "last_name": "Curie", "country_code": "FR" }
        });
        if let Some(email) = email {
            value["email"] = json!(email);
        }
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_success_sends_email() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let notifier = Arc::new(MockNotifier::ok());
        let relay = WebhookRelay::new(gateway.clone(), config()).with_notifier(notifier.clone());

        let ack = relay.handle(&card_order(Some("marie@example.com"))).await;

        assert!(ack.ok);
        assert_eq!(ack.payment_link.as_deref(), Some("https://pay.example/r/1"));
        assert_eq!(ack.client_order_id.as_deref(), Some("shopify-#1001"));
        assert_eq!(ack.email_sent, Some(true));
        assert!(ack.error.is_none());

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "marie@example.com");
        assert!(sent[0].html.contains("https://pay.example/r/1"));
    }

    #[tokio::test]
    async fn test_transmitted_body_is_signed_body() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let relay = WebhookRelay::new(gateway.clone(), config());

        relay.handle(&card_order(None)).await;

        let submitted = gateway.submitted();
        assert_eq!(submitted.len(), 1);
        let expected = relay_paragon::sign(
            &submitted[0].body,
            &submitted[0].request_url,
            "merchant-secret",
        )
        .unwrap();
        assert_eq!(submitted[0].authorization, expected);

        let body: serde_json::Value = serde_json::from_str(&submitted[0].body).unwrap();
        assert_eq!(body["currency"], "GBP");
        assert_eq!(body["buyerDetails"]["country"], "FR");
        assert_eq!(body["amount"], "45.00");
    }

    #[tokio::test]
    async fn test_non_card_order_skipped_without_gateway_call() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let relay = WebhookRelay::new(gateway.clone(), config());

        let order: InboundOrder =
            serde_json::from_value(json!({ "payment_gateway_names": ["PayPal"] })).unwrap();
        let ack = relay.handle(&order).await;

        assert!(ack.ok);
        assert_eq!(ack.skipped, Some(true));
        assert_eq!(ack.reason.as_deref(), Some("not-card-payment"));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_gateway_timeout_reports_failure_without_email() {
        let gateway = Arc::new(MockGateway::failing(|| RelayError::GatewayTimeout { timeout_secs: 15 }));
        let notifier = Arc::new(MockNotifier::ok());
        let relay = WebhookRelay::new(gateway.clone(), config()).with_notifier(notifier.clone());

        let ack = relay.handle(&card_order(Some("marie@example.com"))).await;

        assert!(!ack.ok);
        assert_eq!(ack.error.as_deref(), Some("paragon-failed"));
        assert_eq!(ack.client_order_id.as_deref(), Some("shopify-#1001"));
        assert!(ack.message.unwrap().contains("timed out"));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_no_email_still_acknowledges_link() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let notifier = Arc::new(MockNotifier::ok());
        let relay = WebhookRelay::new(gateway, config()).with_notifier(notifier.clone());

        let ack = relay.handle(&card_order(None)).await;

        assert!(ack.ok);
        assert_eq!(ack.payment_link.as_deref(), Some("https://pay.example/r/1"));
        assert_eq!(ack.email_sent, Some(false));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_link_acknowledged_without_email() {
        let gateway = Arc::new(MockGateway::without_link());
        let notifier = Arc::new(MockNotifier::ok());
        let relay = WebhookRelay::new(gateway, config()).with_notifier(notifier.clone());

        let ack = relay.handle(&card_order(Some("marie@example.com"))).await;

        assert!(ack.ok);
        assert_eq!(ack.payment_link.as_deref(), Some(""));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_email_failure_reported_in_ack() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let notifier = Arc::new(MockNotifier::failing());
        let relay = WebhookRelay::new(gateway, config()).with_notifier(notifier);

        let ack = relay.handle(&card_order(Some("marie@example.com"))).await;

        assert!(ack.ok);
        assert_eq!(ack.payment_link.as_deref(), Some("https://pay.example/r/1"));
        assert_eq!(ack.email_sent, Some(false));
        assert_eq!(ack.error.as_deref(), Some("email-failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_timeout() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let notifier = Arc::new(MockNotifier::slow(Duration::from_secs(60)));
        let relay = WebhookRelay::new(gateway, config())
            .with_notifier(notifier)
            .with_notify_timeout(Duration::from_secs(5));

        let ack = relay.handle(&card_order(Some("marie@example.com"))).await;

        assert!(ack.ok);
        assert_eq!(ack.error.as_deref(), Some("email-failed"));
        assert!(ack.message.unwrap().contains("timed out after 5s"));
    }

    #[tokio::test]
    async fn test_duplicate_webhook_not_resubmitted() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let notifier = Arc::new(MockNotifier::ok());
        let relay = WebhookRelay::new(gateway.clone(), config())
            .with_notifier(notifier.clone())
            .with_dedup_window(Duration::from_secs(600));

        let first = relay.handle(&card_order(Some("marie@example.com"))).await;
        let second = relay.handle(&card_order(Some("marie@example.com"))).await;

        assert_eq!(first.email_sent, Some(true));
        assert_eq!(second.duplicate, Some(true));
        assert_eq!(second.payment_link.as_deref(), Some("https://pay.example/r/1"));
        assert_eq!(gateway.calls(), 1);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_can_be_retried() {
        let gateway = Arc::new(MockGateway::failing(|| RelayError::Network("reset".into())));
        let relay = WebhookRelay::new(gateway.clone(), config())
            .with_dedup_window(Duration::from_secs(600));

        relay.handle(&card_order(None)).await;
        let retry = relay.handle(&card_order(None)).await;

        assert!(retry.duplicate.is_none());
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_request_still_completes() {
        let gateway = Arc::new(
            MockGateway::with_link("https://pay.example/r/1").delayed(Duration::from_secs(10)),
        );
        let notifier = Arc::new(MockNotifier::ok());
        let relay = WebhookRelay::new(gateway.clone(), config())
            .with_notifier(notifier.clone())
            .with_dedup_window(Duration::from_secs(600));
        let order = card_order(Some("marie@example.com"));

        // Sender gives up before the gateway answers
        let abandoned = tokio::time::timeout(Duration::from_secs(5), relay.handle(&order)).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(notifier.sent().len(), 1);

        let retry = relay.handle(&order).await;
        assert_eq!(retry.duplicate, Some(true));
        assert_eq!(retry.payment_link.as_deref(), Some("https://pay.example/r/1"));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_gateway_panic_releases_claim() {
        let gateway = Arc::new(MockGateway::panicking());
        let relay = WebhookRelay::new(gateway.clone(), config())
            .with_dedup_window(Duration::from_secs(600));

        let first = relay.handle(&card_order(None)).await;
        assert!(!first.ok);
        assert_eq!(first.error.as_deref(), Some("internal-error"));
        assert_eq!(first.client_order_id.as_deref(), Some("shopify-#1001"));

        let retry = relay.handle(&card_order(None)).await;
        assert!(retry.duplicate.is_none());
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_email_timeout_reported_in_whole_seconds() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let notifier = Arc::new(MockNotifier::slow(Duration::from_secs(60)));
        let relay = WebhookRelay::new(gateway, config())
            .with_notifier(notifier)
            .with_notify_timeout(Duration::from_millis(250));

        let ack = relay.handle(&card_order(Some("marie@example.com"))).await;

        assert_eq!(ack.error.as_deref(), Some("email-failed"));
        assert!(ack.message.unwrap().contains("timed out after 1s"));
    }

    #[test]
    fn test_whole_secs() {
        assert_eq!(whole_secs(Duration::from_secs(5)), 5);
        assert_eq!(whole_secs(Duration::from_millis(250)), 1);
        assert_eq!(whole_secs(Duration::from_millis(1500)), 2);
        assert_eq!(whole_secs(Duration::ZERO), 0);
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let gateway = Arc::new(MockGateway::with_link("https://pay.example/r/1"));
        let relay = WebhookRelay::new(gateway.clone(), config());

        let ack = relay.handle_body(b"{not json").await;

        assert!(!ack.ok);
        assert_eq!(ack.error.as_deref(), Some("invalid-payload"));
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_ack_serialization() {
        let ack = Acknowledgment::skipped("not-card-payment");
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            json!({ "ok": true, "skipped": true, "reason": "not-card-payment" })
        );

        let ack = Acknowledgment::delivered("shopify-1", "https://pay.example".into(), true);
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            json!({
                "ok": true,
                "paymentLink": "https://pay.example",
                "clientOrderId": "shopify-1",
                "emailSent": true
            })
        );
    }
}
