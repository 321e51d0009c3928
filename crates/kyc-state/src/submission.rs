//! # Submission Controller
//!
//! Drives one onboarding form from "submit pressed" to a settled outcome.
//!
//! ## States
//!
//! ```text
//!   Idle ──▶ Validating ──▶ Idle (field errors attached)
//!    ▲            │
//!    │            ▼
//!    │       Submitting ──▶ Succeeded ──▶ Idle (new submission)
//!    │            │
//!    │            ▼
//!    └────────  Failed  (banner; user may retry)
//! ```
//!
//! Validation is synchronous, so `Validating` is entered and left within
//! one [`SubmissionController::begin`] call; it still appears in the
//! transition log. The remote call happens outside the controller: `begin`
//! hands out a [`SubmissionTicket`] and the caller reports the result back
//! through [`SubmissionController::complete`]. While a ticket is
//! outstanding every further `begin` is refused, which is what keeps the
//! submit control disabled.
//!
//! There is no timeout and no automatic retry. Retrying is another `begin`
//! from `Failed`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kyc_core::{SubmissionId, Timestamp};
use kyc_form::{ClientRecord, KycForm, RecordError, ValidationError, ValidationReport};

use crate::receipt::{SubmissionFailure, SubmissionReceipt, SUBMISSION_SUCCESS};

// ─── Phase ───────────────────────────────────────────────────────────

/// Where the form is in the submission flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionPhase {
    /// Editable. May carry field errors from the last validation pass.
    #[default]
    Idle,
    /// Validator running.
    Validating,
    /// Waiting for the record endpoint. Submit is disabled.
    Submitting,
    /// Record accepted.
    Succeeded,
    /// Record not accepted. Values are kept for a retry.
    Failed,
}

impl SubmissionPhase {
    /// Whether a new attempt may start from this phase.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Validating => "VALIDATING",
            Self::Submitting => "SUBMITTING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Misuse of the controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// A submission is already in flight.
    #[error("submission {attempt} is already in flight")]
    AlreadySubmitting {
        /// Attempt number of the in-flight submission.
        attempt: u32,
    },

    /// A result was reported for an attempt that is no longer current.
    #[error("stale ticket for attempt {ticket} (current attempt is {current})")]
    StaleTicket { ticket: u32, current: u32 },

    /// The operation is not valid from the current phase.
    #[error("invalid submission transition: {from} -> {to}")]
    InvalidTransition {
        /// Current phase.
        from: String,
        /// Attempted target.
        to: String,
    },

    /// Validated values could not be shaped into a record.
    #[error("record could not be built: {0}")]
    Record(String),
}

impl From<SubmissionError> for kyc_core::KycError {
    fn from(err: SubmissionError) -> Self {
        kyc_core::KycError::InvalidTransition(err.to_string())
    }
}

// ─── Banner ──────────────────────────────────────────────────────────

/// Form-level message shown above the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Banner {
    Success(String),
    Error(String),
}

impl Banner {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

// ─── Transition Records ──────────────────────────────────────────────

/// Record of a phase change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionTransitionRecord {
    pub from_phase: SubmissionPhase,
    pub to_phase: SubmissionPhase,
    pub timestamp: Timestamp,
    pub reason: String,
}

// ─── Begin ───────────────────────────────────────────────────────────

/// Permission to perform exactly one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    /// Identifier of this attempt, for correlating logs.
    pub id: SubmissionId,
    /// Attempt number, starting at 1.
    pub attempt: u32,
    /// The payload to send.
    pub record: ClientRecord,
}

/// Result of pressing submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginOutcome {
    /// Field errors were found; nothing is sent.
    Invalid(ValidationReport),
    /// Values are valid; the caller must send the record and report back.
    Ready(SubmissionTicket),
}

// ─── Controller ──────────────────────────────────────────────────────

/// Submission state for one form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionController {
    phase: SubmissionPhase,
    attempt: u32,
    errors: Vec<ValidationError>,
    banner: Option<Banner>,
    receipt: Option<SubmissionReceipt>,
    transitions: Vec<SubmissionTransitionRecord>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Number of attempts that reached `Submitting`.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Field errors from the last validation pass.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Receipt of the last successful attempt.
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    pub fn transitions(&self) -> &[SubmissionTransitionRecord] {
        &self.transitions
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.phase.accepts_submit()
    }

    /// Validate `form` and, if clean, hand out a ticket for one remote call.
    pub fn begin(&mut self, form: &KycForm) -> Result<BeginOutcome, SubmissionError> {
        self.begin_on(form, Timestamp::today())
    }

    /// [`Self::begin`] with date bounds evaluated against `today`.
    pub fn begin_on(
        &mut self,
        form: &KycForm,
        today: NaiveDate,
    ) -> Result<BeginOutcome, SubmissionError> {
        if self.phase == SubmissionPhase::Submitting {
            return Err(SubmissionError::AlreadySubmitting {
                attempt: self.attempt,
            });
        }
        self.require_accepts_submit(SubmissionPhase::Validating)?;

        self.banner = None;
        self.errors.clear();
        self.do_transition(SubmissionPhase::Validating, "submit requested");

        match form.build_record_on(today) {
            Err(RecordError::Invalid(report)) => {
                self.errors = report.errors().to_vec();
                let reason = format!("{} field error(s)", report.len());
                self.do_transition(SubmissionPhase::Idle, &reason);
                Ok(BeginOutcome::Invalid(report))
            }
            Err(other) => {
                self.do_transition(SubmissionPhase::Idle, "record could not be built");
                Err(SubmissionError::Record(other.to_string()))
            }
            Ok(record) => {
                self.attempt += 1;
                self.receipt = None;
                let reason = format!("attempt {}", self.attempt);
                self.do_transition(SubmissionPhase::Submitting, &reason);
                Ok(BeginOutcome::Ready(SubmissionTicket {
                    id: SubmissionId::new(),
                    attempt: self.attempt,
                    record,
                }))
            }
        }
    }

    /// Report the result of the remote call for `ticket`.
    ///
    /// Returns the resulting phase.
    pub fn complete(
        &mut self,
        ticket: &SubmissionTicket,
        result: Result<SubmissionReceipt, SubmissionFailure>,
    ) -> Result<SubmissionPhase, SubmissionError> {
        if self.phase != SubmissionPhase::Submitting {
            return Err(SubmissionError::InvalidTransition {
                from: self.phase.to_string(),
                to: "settled".to_string(),
            });
        }
        if ticket.attempt != self.attempt {
            return Err(SubmissionError::StaleTicket {
                ticket: ticket.attempt,
                current: self.attempt,
            });
        }

        match result {
            Ok(receipt) => {
                let reason = format!("record {} created", receipt.record_id.as_str());
                self.receipt = Some(receipt);
                self.banner = Some(Banner::Success(SUBMISSION_SUCCESS.to_string()));
                self.do_transition(SubmissionPhase::Succeeded, &reason);
            }
            Err(failure) => {
                self.banner = Some(Banner::Error(failure.user_message().to_string()));
                let reason = match &failure {
                    SubmissionFailure::Rejected { .. } => "rejected by endpoint",
                    SubmissionFailure::Unexpected { .. } => "unexpected failure",
                };
                self.do_transition(SubmissionPhase::Failed, reason);
            }
        }
        Ok(self.phase)
    }

    /// Hide the banner. The phase is unchanged.
    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Clear `form` after a success and return to `Idle`.
    pub fn start_new_submission(&mut self, form: &mut KycForm) -> Result<(), SubmissionError> {
        if self.phase != SubmissionPhase::Succeeded {
            return Err(SubmissionError::InvalidTransition {
                from: self.phase.to_string(),
                to: SubmissionPhase::Idle.to_string(),
            });
        }
        form.clear();
        self.errors.clear();
        self.banner = None;
        self.receipt = None;
        self.do_transition(SubmissionPhase::Idle, "new submission");
        Ok(())
    }

    fn require_accepts_submit(&self, target: SubmissionPhase) -> Result<(), SubmissionError> {
        if !self.phase.accepts_submit() {
            return Err(SubmissionError::InvalidTransition {
                from: self.phase.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: SubmissionPhase, reason: &str) {
        self.transitions.push(SubmissionTransitionRecord {
            from_phase: self.phase,
            to_phase: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.phase = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_core::{ClientType, RecordId};

    use crate::receipt::GENERIC_SUBMISSION_ERROR;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn valid_form() -> KycForm {
        let mut form = KycForm::new(ClientType::Individual);
        for (name, value) in [
            ("firstName", "Amina"),
            ("lastName", "Qureshi"),
            ("dateOfBirth", "1988-02-14"),
            ("nationality", "Pakistani"),
            ("gender", "female"),
            ("email", "amina@example.com"),
            ("phone", "+923001234567"),
            ("address", "12 Mall Road"),
            ("city", "Lahore"),
            ("postalCode", "54000"),
            ("country", "Pakistan"),
            ("idType", "passport"),
            ("idNumber", "AB1234567"),
            ("idExpiryDate", "2030-01-01"),
            ("occupation", "Engineer"),
            ("annualIncome", "50k_100k"),
            ("sourceOfFunds", "employment"),
            ("taxResidency", "Pakistan"),
            ("fatcaStatus", "non_us_person"),
        ] {
            form.set_field(name, value).unwrap();
        }
        form.set_field("dataProcessingConsent", true).unwrap();
        form.set_field("termsAccepted", true).unwrap();
        form
    }

    fn receipt() -> SubmissionReceipt {
        SubmissionReceipt {
            record_id: RecordId::new("rec-1"),
            client_type: ClientType::Individual,
            received_at: Timestamp::now(),
        }
    }

    fn ready(ctrl: &mut SubmissionController, form: &KycForm) -> SubmissionTicket {
        match ctrl.begin_on(form, today()).unwrap() {
            BeginOutcome::Ready(ticket) => ticket,
            BeginOutcome::Invalid(report) => panic!("unexpected errors:\n{report}"),
        }
    }

    fn phases(ctrl: &SubmissionController) -> Vec<(SubmissionPhase, SubmissionPhase)> {
        ctrl.transitions()
            .iter()
            .map(|t| (t.from_phase, t.to_phase))
            .collect()
    }

    // ── Happy path ──────────────────────────────────────────────────

    #[test]
    fn test_success_path() {
        let form = valid_form();
        let mut ctrl = SubmissionController::new();
        let ticket = ready(&mut ctrl, &form);
        assert_eq!(ctrl.phase(), SubmissionPhase::Submitting);
        assert!(!ctrl.can_submit());
        assert_eq!(ticket.attempt, 1);

        let phase = ctrl.complete(&ticket, Ok(receipt())).unwrap();
        assert_eq!(phase, SubmissionPhase::Succeeded);
        assert_eq!(ctrl.receipt().map(|r| r.record_id.as_str()), Some("rec-1"));
        assert_eq!(ctrl.banner(), Some(&Banner::Success(SUBMISSION_SUCCESS.to_string())));
        assert_eq!(
            phases(&ctrl),
            vec![
                (SubmissionPhase::Idle, SubmissionPhase::Validating),
                (SubmissionPhase::Validating, SubmissionPhase::Submitting),
                (SubmissionPhase::Submitting, SubmissionPhase::Succeeded),
            ]
        );
    }

    #[test]
    fn test_success_keeps_values() {
        let mut form = valid_form();
        let mut ctrl = SubmissionController::new();
        let ticket = ready(&mut ctrl, &form);
        ctrl.complete(&ticket, Ok(receipt())).unwrap();
        assert!(!form.values().is_empty());

        ctrl.start_new_submission(&mut form).unwrap();
        assert!(form.values().is_empty());
        assert_eq!(ctrl.phase(), SubmissionPhase::Idle);
        assert!(ctrl.banner().is_none());
        assert!(ctrl.receipt().is_none());
    }

    // ── Validation ──────────────────────────────────────────────────

    #[test]
    fn test_invalid_returns_to_idle_with_errors() {
        let mut form = valid_form();
        form.set_field("termsAccepted", false).unwrap();
        let mut ctrl = SubmissionController::new();
        let outcome = ctrl.begin_on(&form, today()).unwrap();
        let BeginOutcome::Invalid(report) = outcome else {
            panic!("expected Invalid");
        };
        assert_eq!(report.field_names(), vec!["termsAccepted"]);
        assert_eq!(ctrl.phase(), SubmissionPhase::Idle);
        assert_eq!(ctrl.errors().len(), 1);
        assert_eq!(ctrl.attempts(), 0);
        assert!(ctrl.can_submit());
    }

    #[test]
    fn test_errors_cleared_on_next_pass() {
        let mut form = valid_form();
        form.clear_field("firstName").unwrap();
        let mut ctrl = SubmissionController::new();
        ctrl.begin_on(&form, today()).unwrap();
        assert_eq!(ctrl.errors().len(), 1);

        form.set_field("firstName", "Amina").unwrap();
        ready(&mut ctrl, &form);
        assert!(ctrl.errors().is_empty());
    }

    // ── Duplicate submission ────────────────────────────────────────

    #[test]
    fn test_begin_while_submitting_rejected() {
        let form = valid_form();
        let mut ctrl = SubmissionController::new();
        let _ticket = ready(&mut ctrl, &form);
        let transitions = ctrl.transitions().len();

        let err = ctrl.begin_on(&form, today()).unwrap_err();
        assert_eq!(err, SubmissionError::AlreadySubmitting { attempt: 1 });
        assert_eq!(ctrl.phase(), SubmissionPhase::Submitting);
        assert_eq!(ctrl.transitions().len(), transitions);
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let form = valid_form();
        let mut ctrl = SubmissionController::new();
        let first = ready(&mut ctrl, &form);
        ctrl.complete(
            &first,
            Err(SubmissionFailure::Unexpected {
                detail: "timeout".to_string(),
            }),
        )
        .unwrap();
        let _second = ready(&mut ctrl, &form);

        let err = ctrl.complete(&first, Ok(receipt())).unwrap_err();
        assert_eq!(err, SubmissionError::StaleTicket { ticket: 1, current: 2 });
        assert_eq!(ctrl.phase(), SubmissionPhase::Submitting);
    }

    #[test]
    fn test_complete_twice_rejected() {
        let form = valid_form();
        let mut ctrl = SubmissionController::new();
        let ticket = ready(&mut ctrl, &form);
        ctrl.complete(&ticket, Ok(receipt())).unwrap();
        let err = ctrl.complete(&ticket, Ok(receipt())).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidTransition { .. }));
    }

    // ── Failure ─────────────────────────────────────────────────────

    #[test]
    fn test_unexpected_failure_shows_generic_banner() {
        let form = valid_form();
        let mut ctrl = SubmissionController::new();
        let ticket = ready(&mut ctrl, &form);
        let phase = ctrl
            .complete(
                &ticket,
                Err(SubmissionFailure::Unexpected {
                    detail: "502 Bad Gateway".to_string(),
                }),
            )
            .unwrap();
        assert_eq!(phase, SubmissionPhase::Failed);
        let banner = ctrl.banner().unwrap();
        assert!(banner.is_error());
        assert_eq!(banner.message(), GENERIC_SUBMISSION_ERROR);
        assert!(ctrl.can_submit());
    }

    #[test]
    fn test_rejection_message_and_retry() {
        let form = valid_form();
        let mut ctrl = SubmissionController::new();
        let ticket = ready(&mut ctrl, &form);
        ctrl.complete(
            &ticket,
            Err(SubmissionFailure::Rejected {
                message: "ID number already registered".to_string(),
            }),
        )
        .unwrap();
        assert_eq!(
            ctrl.banner().map(Banner::message),
            Some("ID number already registered")
        );

        ctrl.dismiss_banner();
        assert!(ctrl.banner().is_none());
        assert_eq!(ctrl.phase(), SubmissionPhase::Failed);

        let retry = ready(&mut ctrl, &form);
        assert_eq!(retry.attempt, 2);
        assert_ne!(retry.id, ticket.id);
        assert_eq!(ctrl.complete(&retry, Ok(receipt())).unwrap(), SubmissionPhase::Succeeded);
    }

    #[test]
    fn test_new_submission_requires_success() {
        let mut form = valid_form();
        let mut ctrl = SubmissionController::new();
        let err = ctrl.start_new_submission(&mut form).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidTransition { .. }));
        assert!(!form.values().is_empty());
    }

    #[test]
    fn test_error_converts_to_top_level() {
        let top = kyc_core::KycError::from(SubmissionError::AlreadySubmitting { attempt: 3 });
        assert!(matches!(top, kyc_core::KycError::InvalidTransition(ref m) if m.contains('3')));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(SubmissionPhase::Submitting.to_string(), "SUBMITTING");
        assert_eq!(SubmissionPhase::default(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_controller_serializes() {
        let form = valid_form();
        let mut ctrl = SubmissionController::new();
        ready(&mut ctrl, &form);
        let json = serde_json::to_value(&ctrl).unwrap();
        assert_eq!(json["phase"], "Submitting");
        assert_eq!(json["attempt"], 1);
    }
}
