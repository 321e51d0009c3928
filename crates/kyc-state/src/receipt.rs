//! # Submission Outcomes
//!
//! What the record endpoint hands back: a receipt on success, or a
//! failure the controller turns into a banner.

use serde::{Deserialize, Serialize};

use kyc_core::{ClientType, RecordId, Timestamp};

/// Banner text for every failure that is not an explicit rejection.
pub const GENERIC_SUBMISSION_ERROR: &str =
    "There was an error submitting the KYC data. Please try again.";

/// Banner text after a successful submission.
pub const SUBMISSION_SUCCESS: &str = "KYC data submitted successfully.";

/// Acknowledgement from the record endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Identifier assigned to the created record.
    pub record_id: RecordId,
    /// Client type of the created record.
    pub client_type: ClientType,
    /// When the endpoint accepted the record.
    pub received_at: Timestamp,
}

/// Why a submission attempt did not produce a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    /// The endpoint refused the record with a message meant for the user.
    Rejected { message: String },
    /// Anything else. `detail` is for logs only.
    Unexpected { detail: String },
}

impl SubmissionFailure {
    /// Text safe to show in the form banner.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { message } if !message.trim().is_empty() => message,
            _ => GENERIC_SUBMISSION_ERROR,
        }
    }
}

impl std::fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { message } => write!(f, "rejected: {message}"),
            Self::Unexpected { detail } => write!(f, "unexpected: {detail}"),
        }
    }
}
