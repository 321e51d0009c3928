//! # Validate Subcommand
//!
//! Loads a YAML or JSON input file into a form and reports field errors
//! without submitting anything.
//!
//! ```bash
//! kyc validate --type individual --input amina.yaml
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use kyc_core::ClientType;

use crate::{load_form, render_report};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Client type: individual or entity.
    #[arg(long = "type")]
    pub client_type: ClientType,

    /// YAML or JSON file of field values.
    #[arg(long)]
    pub input: PathBuf,

    /// Emit the validation report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let form = load_form(args.client_type, &args.input)?;
    let report = form.validate();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&report));
        for advisory in form.document_advisories() {
            println!("note: {advisory}");
        }
    }

    tracing::debug!(
        client_type = %args.client_type,
        errors = report.len(),
        "validation finished"
    );
    Ok(if report.is_valid() { 0 } else { 1 })
}
