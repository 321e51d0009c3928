//! Record gateway configuration.
//!
//! Points the HTTP gateway at a record endpoint. Loaded from environment
//! variables or built explicitly for tests.

use url::Url;
use zeroize::Zeroizing;

/// Endpoint used when `KYC_GATEWAY_URL` is unset.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8080";

/// Configuration for the HTTP record gateway.
///
/// Custom `Debug` implementation redacts the `api_token` field.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the record service.
    pub base_url: Url,
    /// Bearer token for the record service.
    pub api_token: Zeroizing<String>,
    /// Transport timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GatewayConfig {
    /// Build a configuration for an explicit endpoint.
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            api_token: Zeroizing::new(api_token.to_string()),
            timeout_secs: None,
        })
    }

    /// Set the transport timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KYC_GATEWAY_URL` (default: `http://127.0.0.1:8080`)
    /// - `KYC_API_TOKEN` (required)
    /// - `KYC_TIMEOUT_SECS` (optional, whole seconds; unset means no timeout)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("KYC_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let raw_url =
            std::env::var("KYC_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());

        Ok(Self {
            base_url: parse_url("KYC_GATEWAY_URL", &raw_url)?,
            api_token: Zeroizing::new(api_token),
            timeout_secs: parse_timeout(std::env::var("KYC_TIMEOUT_SECS").ok().as_deref())?,
        })
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<u64>, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidTimeout(s.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("KYC_API_TOKEN environment variable is required")]
    MissingToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("KYC_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}
