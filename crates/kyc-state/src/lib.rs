//! # kyc-state — Submission State Machine
//!
//! Owns the lifecycle of a form submission: validating, sending at most one
//! record per attempt, and settling into success or a failure banner.
//!
//! ## State Machine
//!
//! - **Submission** (`submission.rs`): `Idle → Validating → Idle (errors)`
//!   or `Validating → Submitting → Succeeded | Failed`. Retry re-enters
//!   `Validating` from `Failed`; a fresh attempt may start from
//!   `Succeeded`.
//!
//! ## Design
//!
//! The controller is an enum-state machine with guarded transition
//! methods that return `Result`. It never performs I/O. `begin` issues a
//! numbered ticket for the one remote call the caller must make, and
//! `complete` accepts only the current ticket, so a late or repeated
//! result cannot move the machine. Every phase change is appended to a
//! transition log with a UTC timestamp and a reason.
//!
//! Failure text shown to the user is either the endpoint's own rejection
//! message or [`GENERIC_SUBMISSION_ERROR`]; raw transport detail never
//! reaches the banner.

pub mod receipt;
pub mod submission;

pub use receipt::{
    SubmissionFailure, SubmissionReceipt, GENERIC_SUBMISSION_ERROR, SUBMISSION_SUCCESS,
};
pub use submission::{
    Banner, BeginOutcome, SubmissionController, SubmissionError, SubmissionPhase,
    SubmissionTicket, SubmissionTransitionRecord,
};
