//! HTTP record gateway.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/v1/client-records` | Create a client record |
//!
//! The request body is the tagged `ClientRecord` JSON. Responses:
//!
//! - 2xx: a `SubmissionReceipt` body.
//! - 4xx with a JSON `message`: the record was refused; the message is
//!   shown to the user.
//! - anything else: an API error, reported to the user generically.
//!
//! Requests are sent once. There is no retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use kyc_form::ClientRecord;
use kyc_state::SubmissionReceipt;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::RecordGateway;

const RECORDS_PATH: &str = "api/v1/client-records";
const ENDPOINT: &str = "POST /api/v1/client-records";

/// Error body the record service sends with a refusal.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    message: String,
}

/// Gateway backed by the record service's REST API.
#[derive(Debug, Clone)]
pub struct HttpRecordGateway {
    http: reqwest::Client,
    records_url: String,
}

impl HttpRecordGateway {
    /// Create a gateway from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            let mut auth =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_token.as_str()))
                    .map_err(|_| GatewayError::Config(crate::config::ConfigError::MissingToken))?;
            auth.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, auth);
            headers
        });
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| GatewayError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;

        let base = config.base_url.as_str().trim_end_matches('/');
        Ok(Self {
            http,
            records_url: format!("{base}/{RECORDS_PATH}"),
        })
    }

    /// Full URL records are posted to.
    pub fn records_url(&self) -> &str {
        &self.records_url
    }
}

#[async_trait]
impl RecordGateway for HttpRecordGateway {
    async fn create_record(&self, record: &ClientRecord) -> Result<SubmissionReceipt, GatewayError> {
        let resp = self
            .http
            .post(&self.records_url)
            .json(record)
            .send()
            .await
            .map_err(|e| GatewayError::Http {
                endpoint: ENDPOINT.into(),
                source: e,
            })?;

        let status = resp.status();
        if status.is_success() {
            return resp.json().await.map_err(|e| GatewayError::Deserialization {
                endpoint: ENDPOINT.into(),
                source: e,
            });
        }

        let body = resp.text().await.map_err(|e| GatewayError::Http {
            endpoint: ENDPOINT.into(),
            source: e,
        })?;
        if status.is_client_error() {
            if let Ok(rejection) = serde_json::from_str::<RejectionBody>(&body) {
                if !rejection.message.trim().is_empty() {
                    return Err(GatewayError::Rejected {
                        endpoint: ENDPOINT.into(),
                        status: status.as_u16(),
                        message: rejection.message,
                    });
                }
            }
        }
        Err(GatewayError::ApiError {
            endpoint: ENDPOINT.into(),
            status: status.as_u16(),
            body,
        })
    }

    fn gateway_name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_url_joins_base_without_double_slash() {
        let cfg = GatewayConfig::new("http://127.0.0.1:9000/", "t").unwrap();
        let gw = HttpRecordGateway::new(&cfg).unwrap();
        assert_eq!(gw.records_url(), "http://127.0.0.1:9000/api/v1/client-records");

        let cfg = GatewayConfig::new("https://kyc.example/onboarding", "t").unwrap();
        let gw = HttpRecordGateway::new(&cfg).unwrap();
        assert_eq!(
            gw.records_url(),
            "https://kyc.example/onboarding/api/v1/client-records"
        );
    }

    #[test]
    fn test_token_with_newline_rejected() {
        let cfg = GatewayConfig::new("http://127.0.0.1:9000", "bad\ntoken").unwrap();
        assert!(matches!(
            HttpRecordGateway::new(&cfg),
            Err(GatewayError::Config(_))
        ));
    }
}
