//! # Error Types
//!
//! Top-level error for the KYC workspace. Each crate keeps its own
//! `thiserror` enum for precise matching; `KycError` is what callers see
//! when they only need a message.

use thiserror::Error;

/// Top-level error type for the KYC workspace.
#[derive(Error, Debug)]
pub enum KycError {
    /// A value could not be parsed into a domain type.
    #[error("parse error: {0}")]
    Parse(String),

    /// Form values do not satisfy the field schema.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A submission state machine transition was rejected.
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),

    /// The external record gateway failed.
    #[error("gateway error: {0}")]
    Gateway(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
