//! HTTPS implementation of the Masterpass gateway

use crate::error::{GatewayError, GatewayErrorEntry};
use crate::gateway::MasterpassGateway;
use crate::types::{ExpressCheckoutRequest, PaymentData, PostbackRequest, PrecheckoutData};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use walletflow_config::{AppConfig, MasterpassConfig};

/// Default deadline for gateway calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The provider's error response body: `{"errors": {"error": [..]}}`.
#[derive(Deserialize)]
struct GatewayErrorBody {
    errors: GatewayErrorList,
}

#[derive(Deserialize)]
struct GatewayErrorList {
    error: Vec<GatewayErrorEntry>,
}

/// Masterpass gateway client over HTTPS.
///
/// The underlying client carries the configured deadline; a call past it is
/// surfaced as [`GatewayError::Timeout`], never left hanging.
#[derive(Debug, Clone)]
pub struct HttpMasterpassGateway {
    client: Client,
    base_url: String,
}

impl HttpMasterpassGateway {
    /// Build a gateway client from the application configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`GatewayError::Config`] if the `masterpass` section is
    /// missing.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let masterpass = config.masterpass.as_ref().ok_or(GatewayError::Config)?;
        Self::new(masterpass)
    }

    /// Build a gateway client from the gateway configuration.
    pub fn new(config: &MasterpassConfig) -> Result<Self, GatewayError> {
        if config.base_url.is_empty() {
            return Err(GatewayError::Config);
        }

        let timeout_secs = config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_send_error(err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Request(err)
        }
    }

    /// Turns a non-2xx response body into structured error entries. Bodies
    /// not in the provider's error shape become a single catch-all entry
    /// carrying the raw text.
    fn error_from_response(status: StatusCode, body_text: String) -> GatewayError {
        let entries = match serde_json::from_str::<GatewayErrorBody>(&body_text) {
            Ok(body) => body.errors.error,
            Err(_) => vec![GatewayErrorEntry {
                source: "gateway".to_string(),
                reason_code: status.as_u16().to_string(),
                description: body_text,
                recoverable: false,
            }],
        };

        GatewayError::Api {
            status_code: status.as_u16(),
            entries,
        }
    }
}

impl MasterpassGateway for HttpMasterpassGateway {
    async fn fetch_precheckout_data(
        &self,
        pairing_token: &str,
    ) -> Result<PrecheckoutData, GatewayError> {
        let url = format!("{}/precheckout/{}", self.base_url, pairing_token);
        debug!("Fetching precheckout data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let body_text = response.text().await.map_err(Self::map_send_error)?;

        if status.is_success() {
            Ok(serde_json::from_str(&body_text)?)
        } else {
            Err(Self::error_from_response(status, body_text))
        }
    }

    async fn create_express_checkout(
        &self,
        request: &ExpressCheckoutRequest,
    ) -> Result<PaymentData, GatewayError> {
        let url = format!("{}/expresscheckout", self.base_url);
        debug!("Creating express checkout at {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let body_text = response.text().await.map_err(Self::map_send_error)?;

        if status.is_success() {
            Ok(serde_json::from_str(&body_text)?)
        } else {
            Err(Self::error_from_response(status, body_text))
        }
    }

    async fn submit_postback(&self, request: &PostbackRequest) -> Result<(), GatewayError> {
        let url = format!("{}/postback", self.base_url);
        debug!("Submitting postback to {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body_text = response.text().await.map_err(Self::map_send_error)?;
            Err(Self::error_from_response(status, body_text))
        }
    }
}
