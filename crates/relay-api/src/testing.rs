//! Test doubles for the gateway and notifier seams.

use async_trait::async_trait;
use relay_core::{
    EmailMessage, GatewayReply, NormalizedPaymentRequest, Notifier, PaymentGateway, RelayError,
    RelayResult, SignedRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const TEST_REQUEST_URL: &str = "https://gw.example/v4/4021/form/sale";
pub const TEST_SECRET: &str = "merchant-secret";

enum GatewayOutcome {
    Link(Option<String>),
    Fail(fn() -> RelayError),
    Panic,
}

pub struct MockGateway {
    outcome: GatewayOutcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
    submitted: Mutex<Vec<SignedRequest>>,
}

impl MockGateway {
    fn build(outcome: GatewayOutcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_link(link: &str) -> Self {
        Self::build(GatewayOutcome::Link(Some(link.to_string())))
    }

    pub fn without_link() -> Self {
        Self::build(GatewayOutcome::Link(None))
    }

    pub fn failing(make: fn() -> RelayError) -> Self {
        Self::build(GatewayOutcome::Fail(make))
    }

    pub fn panicking() -> Self {
        Self::build(GatewayOutcome::Panic)
    }

    /// Answer only after `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<SignedRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn sign(&self, request: &NormalizedPaymentRequest) -> RelayResult<SignedRequest> {
        relay_paragon::sign_request(request, TEST_REQUEST_URL, TEST_SECRET)
    }

    async fn submit(&self, request: &SignedRequest) -> RelayResult<GatewayReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            GatewayOutcome::Link(link) => Ok(GatewayReply {
                status: 200,
                payment_link: link.clone(),
            }),
            GatewayOutcome::Fail(make) => Err(make()),
            GatewayOutcome::Panic => panic!("gateway blew up"),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

pub struct MockNotifier {
    fail: bool,
    delay: Option<Duration>,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockNotifier {
    pub fn ok() -> Self {
        Self {
            fail: false,
            delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::ok()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, message: &EmailMessage) -> RelayResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(RelayError::Notification("mailbox unavailable".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
