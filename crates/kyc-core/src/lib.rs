//! # kyc-core — Foundational Types for KYC Onboarding
//!
//! Leaf crate of the workspace. Defines the primitives every other crate
//! shares: the closed set of client types, identifier newtypes for
//! submitted records, UTC-only timestamps, and the top-level error type.
//!
//! ## Key Design Principles
//!
//! 1. **Single `ClientType` enum.** Individual and Entity are the only
//!    onboarding shapes. Every `match` on it is exhaustive, so adding a
//!    shape forces schema, record and CLI code to handle it.
//!
//! 2. **Newtype identifiers.** `RecordId` and `SubmissionId` cannot be
//!    swapped for one another or for bare strings.
//!
//! 3. **UTC-only timestamps.** Transition logs and receipts carry
//!    `Timestamp`, truncated to seconds with a `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kyc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod client_type;
pub mod error;
pub mod identity;
pub mod temporal;

pub use client_type::{ClientType, CLIENT_TYPE_COUNT};
pub use error::KycError;
pub use identity::{RecordId, SubmissionId};
pub use temporal::Timestamp;
