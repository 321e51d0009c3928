//! # Submit Subcommand
//!
//! Validates an input file and, when clean, sends the record once.
//!
//! ```bash
//! # Through the simulated gateway (1.5 s delay):
//! kyc submit --type individual --input amina.yaml --mock
//!
//! # Through the record service configured by KYC_GATEWAY_URL / KYC_API_TOKEN:
//! kyc submit --type entity --input indus.yaml
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use kyc_core::ClientType;
use kyc_form::FormInput;
use kyc_gateway::{
    GatewayConfig, HttpRecordGateway, MockFailure, MockRecordGateway, OnboardingSession,
    RecordGateway, SubmitOutcome, DEFAULT_MOCK_DELAY,
};

use crate::render_report;

/// Arguments for the submit subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Client type: individual or entity.
    #[arg(long = "type")]
    pub client_type: ClientType,

    /// YAML or JSON file of field values.
    #[arg(long)]
    pub input: PathBuf,

    /// Use the in-process mock gateway instead of the record service.
    #[arg(long)]
    pub mock: bool,

    /// Make the mock gateway fail as if unreachable.
    #[arg(long, requires = "mock")]
    pub mock_fail: bool,

    /// Make the mock gateway refuse the record with this message.
    #[arg(long, requires = "mock", conflicts_with = "mock_fail")]
    pub mock_reject: Option<String>,

    /// Simulated mock latency in milliseconds.
    #[arg(long, requires = "mock")]
    pub mock_delay_ms: Option<u64>,
}

impl SubmitArgs {
    fn gateway(&self) -> Result<Arc<dyn RecordGateway>> {
        if !self.mock {
            let config = GatewayConfig::from_env().context("configuring record gateway")?;
            tracing::debug!(?config, "using HTTP record gateway");
            return Ok(Arc::new(HttpRecordGateway::new(&config)?));
        }

        let delay = self
            .mock_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MOCK_DELAY);
        let mut mock = MockRecordGateway::new().with_delay(delay);
        if self.mock_fail {
            mock = mock.failing(MockFailure::Unavailable);
        } else if let Some(message) = &self.mock_reject {
            mock = mock.failing(MockFailure::Reject(message.clone()));
        }
        Ok(Arc::new(mock))
    }
}

/// Execute the submit subcommand.
pub fn run_submit(args: &SubmitArgs) -> Result<u8> {
    let input = FormInput::from_path(&args.input)
        .with_context(|| format!("loading form input {}", args.input.display()))?;
    let session = OnboardingSession::new(args.client_type, args.gateway()?);
    session
        .apply_input(&input)
        .with_context(|| format!("applying {} to a {} form", args.input.display(), args.client_type))?;

    for advisory in session.with_form(|f| f.document_advisories()) {
        println!("note: {advisory}");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let outcome = runtime.block_on(session.submit())?;

    match outcome {
        SubmitOutcome::Invalid(report) => {
            println!("{}", render_report(&report));
            Ok(1)
        }
        SubmitOutcome::Succeeded(receipt) => {
            println!(
                "Submitted {} record {} at {}",
                receipt.client_type,
                receipt.record_id.as_str(),
                receipt.received_at
            );
            Ok(0)
        }
        SubmitOutcome::Failed { banner } => {
            println!("{banner}");
            Ok(1)
        }
    }
}
