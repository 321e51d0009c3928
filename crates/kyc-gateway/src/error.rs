//! Record gateway error types.

use kyc_state::SubmissionFailure;

/// Errors from record gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service refused the record with a user-facing message.
    #[error("{endpoint} rejected the record ({status}): {message}")]
    Rejected {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// The service returned a non-2xx status without a usable message.
    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The gateway could not be reached or is switched off.
    #[error("record gateway unavailable: {0}")]
    Unavailable(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl GatewayError {
    /// Classify for the submission controller. Only rejections keep their
    /// message; everything else is reported generically to the user.
    pub fn to_failure(&self) -> SubmissionFailure {
        match self {
            Self::Rejected { message, .. } => SubmissionFailure::Rejected {
                message: message.clone(),
            },
            other => SubmissionFailure::Unexpected {
                detail: other.to_string(),
            },
        }
    }
}

impl From<GatewayError> for SubmissionFailure {
    fn from(err: GatewayError) -> Self {
        err.to_failure()
    }
}

impl From<GatewayError> for kyc_core::KycError {
    fn from(err: GatewayError) -> Self {
        kyc_core::KycError::Gateway(err.to_string())
    }
}
