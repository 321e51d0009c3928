//! # Onboarding Session
//!
//! One user's onboarding screen: the form, its attachments and the
//! submission controller behind a single lock, plus the gateway records
//! are sent to. Cloning a session yields another handle to the same
//! state.
//!
//! The lock is never held across the gateway call. [`OnboardingSession::submit`]
//! locks to begin, releases, awaits the gateway, then locks again to
//! complete. A second submit while the first is awaiting finds the
//! controller in `Submitting` and is refused before any network traffic.
//!
//! If the submit future is dropped while the gateway call is pending
//! (a timeout, `select!`, shutdown), the attempt is settled as an
//! unexpected failure so the form returns to `Failed` and can be retried.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use thiserror::Error;

use kyc_core::{ClientType, Timestamp};
use kyc_form::{
    DocumentError, FieldValue, FormInput, FormSnapshot, InputError, KycForm, StoreError,
    UploadedDocument, ValidationError, ValidationReport,
};
use kyc_state::{
    Banner, BeginOutcome, SubmissionController, SubmissionError, SubmissionFailure,
    SubmissionPhase, SubmissionReceipt, SubmissionTicket, SubmissionTransitionRecord,
};

use crate::gateway::RecordGateway;

/// Errors from session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// How a submit press ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Field errors; nothing was sent.
    Invalid(ValidationReport),
    /// The record was created.
    Succeeded(SubmissionReceipt),
    /// The record was not created. `banner` is what the user sees.
    Failed { banner: String },
}

#[derive(Debug)]
struct SessionState {
    form: KycForm,
    controller: SubmissionController,
}

/// Detail recorded when a submit future is dropped mid-flight.
const ABANDONED_SUBMISSION: &str = "submission abandoned before the gateway answered";

/// An outstanding ticket. Settles the attempt as abandoned on drop unless
/// [`InFlight::settle`] ran first.
struct InFlight {
    state: Arc<Mutex<SessionState>>,
    ticket: SubmissionTicket,
    armed: bool,
}

impl InFlight {
    fn settle(
        mut self,
        result: Result<SubmissionReceipt, SubmissionFailure>,
    ) -> Result<SubmissionPhase, SubmissionError> {
        self.armed = false;
        self.state.lock().controller.complete(&self.ticket, result)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(
            submission = %self.ticket.id,
            attempt = self.ticket.attempt,
            "submission abandoned while awaiting the gateway"
        );
        let failure = SubmissionFailure::Unexpected {
            detail: ABANDONED_SUBMISSION.to_string(),
        };
        if let Err(err) = self.state.lock().controller.complete(&self.ticket, Err(failure)) {
            tracing::warn!(submission = %self.ticket.id, error = %err, "abandoned submission not settled");
        }
    }
}

/// Shared handle to one onboarding form and its submission state.
#[derive(Clone)]
pub struct OnboardingSession {
    state: Arc<Mutex<SessionState>>,
    gateway: Arc<dyn RecordGateway>,
}

impl std::fmt::Debug for OnboardingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingSession")
            .field("state", &self.state)
            .field("gateway", &self.gateway.gateway_name())
            .finish()
    }
}

impl OnboardingSession {
    pub fn new(client_type: ClientType, gateway: Arc<dyn RecordGateway>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                form: KycForm::new(client_type),
                controller: SubmissionController::new(),
            })),
            gateway,
        }
    }

    // ── Form ────────────────────────────────────────────────────────

    /// Run `f` against the current form.
    pub fn with_form<R>(&self, f: impl FnOnce(&KycForm) -> R) -> R {
        f(&self.state.lock().form)
    }

    pub fn client_type(&self) -> ClientType {
        self.with_form(KycForm::client_type)
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.with_form(KycForm::snapshot)
    }

    pub fn set_field(&self, name: &str, value: impl Into<FieldValue>) -> Result<(), SessionError> {
        Ok(self.state.lock().form.set_field(name, value)?)
    }

    pub fn clear_field(&self, name: &str) -> Result<Option<FieldValue>, SessionError> {
        Ok(self.state.lock().form.clear_field(name)?)
    }

    /// Activate another client type, discarding values. Returns `true` if
    /// the type changed.
    pub fn switch_client_type(&self, client_type: ClientType) -> bool {
        let changed = self.state.lock().form.switch_client_type(client_type);
        if changed {
            tracing::info!(client_type = %client_type, "client type switched, values cleared");
        }
        changed
    }

    pub fn add_documents(&self, files: impl IntoIterator<Item = UploadedDocument>) {
        self.state.lock().form.add_documents(files);
    }

    pub fn remove_document(&self, index: usize) -> Result<UploadedDocument, SessionError> {
        Ok(self.state.lock().form.remove_document(index)?)
    }

    /// Load values and attachments from a parsed input file.
    pub fn apply_input(&self, input: &FormInput) -> Result<(), SessionError> {
        Ok(input.apply_to(&mut self.state.lock().form)?)
    }

    // ── Submission state ────────────────────────────────────────────

    pub fn phase(&self) -> SubmissionPhase {
        self.state.lock().controller.phase()
    }

    pub fn can_submit(&self) -> bool {
        self.state.lock().controller.can_submit()
    }

    pub fn banner(&self) -> Option<Banner> {
        self.state.lock().controller.banner().cloned()
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.state.lock().controller.errors().to_vec()
    }

    pub fn receipt(&self) -> Option<SubmissionReceipt> {
        self.state.lock().controller.receipt().cloned()
    }

    pub fn transitions(&self) -> Vec<SubmissionTransitionRecord> {
        self.state.lock().controller.transitions().to_vec()
    }

    pub fn dismiss_banner(&self) {
        self.state.lock().controller.dismiss_banner();
    }

    /// Clear the form after a success so another client can be onboarded.
    pub fn start_new_submission(&self) -> Result<(), SessionError> {
        let mut guard = self.state.lock();
        let SessionState { form, controller } = &mut *guard;
        Ok(controller.start_new_submission(form)?)
    }

    // ── Submit ──────────────────────────────────────────────────────

    /// Validate and, if clean, send the record.
    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        self.submit_on(Timestamp::today()).await
    }

    /// [`Self::submit`] with date bounds evaluated against `today`.
    pub async fn submit_on(&self, today: NaiveDate) -> Result<SubmitOutcome, SessionError> {
        let ticket = {
            let mut guard = self.state.lock();
            let SessionState { form, controller } = &mut *guard;
            match controller.begin_on(form, today)? {
                BeginOutcome::Invalid(report) => {
                    tracing::info!(
                        client_type = %report.client_type,
                        errors = report.len(),
                        "submission blocked by field errors"
                    );
                    return Ok(SubmitOutcome::Invalid(report));
                }
                BeginOutcome::Ready(ticket) => ticket,
            }
        };
        let in_flight = InFlight {
            state: Arc::clone(&self.state),
            ticket,
            armed: true,
        };
        let ticket = &in_flight.ticket;

        tracing::info!(
            submission = %ticket.id,
            attempt = ticket.attempt,
            client_type = %ticket.record.client_type(),
            gateway = self.gateway.gateway_name(),
            "submitting client record"
        );

        let result = self.gateway.create_record(&ticket.record).await;
        let result = match result {
            Ok(receipt) => {
                tracing::info!(
                    submission = %ticket.id,
                    record_id = %receipt.record_id,
                    "client record created"
                );
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(submission = %ticket.id, error = %err, "client record submission failed");
                Err(SubmissionFailure::from(err))
            }
        };

        let outcome = match &result {
            Ok(receipt) => SubmitOutcome::Succeeded(receipt.clone()),
            Err(failure) => SubmitOutcome::Failed {
                banner: failure.user_message().to_string(),
            },
        };
        in_flight.settle(result)?;
        Ok(outcome)
    }
}
