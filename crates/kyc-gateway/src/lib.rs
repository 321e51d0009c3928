//! # kyc-gateway — Record Submission for KYC Onboarding
//!
//! Sends validated client records to the record service and ties the
//! form, attachments and submission controller together in an
//! [`OnboardingSession`].
//!
//! ## Gateways
//!
//! - [`MockRecordGateway`]: waits (1.5 s by default), then accepts or
//!   fails every record. Counts calls.
//! - [`HttpRecordGateway`]: `POST {base_url}/api/v1/client-records` with
//!   bearer auth, configured from the environment via [`GatewayConfig`].
//!
//! ## Failure Policy
//!
//! One request per submission attempt. No retries, no idempotency key.
//! A refusal with a message reaches the user verbatim; every other
//! failure is logged with full detail and shown as the generic
//! submission error.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod session;

pub use config::{ConfigError, GatewayConfig, DEFAULT_GATEWAY_URL};
pub use error::GatewayError;
pub use gateway::{MockFailure, MockRecordGateway, RecordGateway, DEFAULT_MOCK_DELAY};
pub use http::HttpRecordGateway;
pub use session::{OnboardingSession, SessionError, SubmitOutcome};
