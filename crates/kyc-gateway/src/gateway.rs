//! # Record Gateway
//!
//! The one external call of the onboarding flow: hand a validated
//! [`ClientRecord`] to the record service and get a receipt back.
//!
//! No idempotency key is sent. If a user retries after a failure whose
//! request actually reached the service, the service may create the
//! record twice. Deduplication is the service's concern.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use kyc_core::{RecordId, Timestamp};
use kyc_form::ClientRecord;
use kyc_state::SubmissionReceipt;

use crate::error::GatewayError;

/// Simulated latency of [`MockRecordGateway`] by default.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1500);

/// Destination for submitted client records.
///
/// Implementations must be `Send + Sync` so one gateway can serve every
/// session in a process.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Create one record. Called at most once per submission attempt.
    async fn create_record(&self, record: &ClientRecord) -> Result<SubmissionReceipt, GatewayError>;

    /// Human-readable name for logs.
    fn gateway_name(&self) -> &str;
}

// ─── Mock ────────────────────────────────────────────────────────────

/// How a [`MockRecordGateway`] fails, when told to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// Refuse the record with this message.
    Reject(String),
    /// Behave like an unreachable service.
    Unavailable,
}

/// In-process gateway that waits, then accepts or fails every record.
#[derive(Debug)]
pub struct MockRecordGateway {
    delay: Duration,
    failure: Option<MockFailure>,
    calls: AtomicUsize,
}

impl Default for MockRecordGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecordGateway {
    /// Accepts every record after [`DEFAULT_MOCK_DELAY`].
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_MOCK_DELAY,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Number of `create_record` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordGateway for MockRecordGateway {
    async fn create_record(&self, record: &ClientRecord) -> Result<SubmissionReceipt, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            call,
            delay_ms = self.delay.as_millis() as u64,
            client_type = %record.client_type(),
            "mock gateway simulating record creation"
        );
        tokio::time::sleep(self.delay).await;

        match &self.failure {
            Some(MockFailure::Reject(message)) => Err(GatewayError::Rejected {
                endpoint: "mock".into(),
                status: 422,
                message: message.clone(),
            }),
            Some(MockFailure::Unavailable) => {
                Err(GatewayError::Unavailable("mock gateway set to fail".into()))
            }
            None => Ok(SubmissionReceipt {
                record_id: RecordId::new(format!("mock-{}", uuid::Uuid::new_v4())),
                client_type: record.client_type(),
                received_at: Timestamp::now(),
            }),
        }
    }

    fn gateway_name(&self) -> &str {
        "mock"
    }
}
