//! # kyc-cli — KYC Onboarding Command-Line Interface
//!
//! Drives the onboarding form from files instead of a screen.
//!
//! ## Subcommands
//!
//! - `schema` — Print the field table for a client type
//! - `validate` — Check a YAML/JSON input file and list field errors
//! - `submit` — Validate and send the record through the mock or HTTP gateway
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to the domain crates and only format output.
//! - Handlers return a process exit code: 0 on success, 1 when the input
//!   is invalid or the submission failed.

pub mod schema;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use kyc_core::ClientType;
use kyc_form::{FormInput, KycForm, ValidationReport};

/// Load an input file into a fresh form of `client_type`.
pub(crate) fn load_form(client_type: ClientType, input: &Path) -> Result<KycForm> {
    let parsed = FormInput::from_path(input)
        .with_context(|| format!("loading form input {}", input.display()))?;
    let mut form = KycForm::new(client_type);
    parsed
        .apply_to(&mut form)
        .with_context(|| format!("applying {} to a {client_type} form", input.display()))?;
    Ok(form)
}

/// Field errors, one per line, under a count header.
pub(crate) fn render_report(report: &ValidationReport) -> String {
    if report.is_valid() {
        return format!("{} form is valid", report.client_type);
    }
    format!(
        "{} form has {} error(s):\n{report}",
        report.client_type,
        report.len()
    )
}
