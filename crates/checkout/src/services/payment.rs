//! PayGate HTTP client for payment capture.
//!
//! Production implementation of [`PaymentGateway`]: submits the charge and
//! the allocation breakdown to the platform's payment service, which owns
//! ledger mutation, receipt generation, and buyer notification.

use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::{PaymentConfirmation, PaymentError, PaymentGateway, PaymentRequest};
use crate::config::{ConfigError, require_env};

/// Payment API version pinned by this client.
const API_REVISION: &str = "2026-02-01";

/// PayGate client configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PayGateConfig {
    /// Base URL of the payment service.
    pub base_url: Url,
    /// API key (server-side only).
    pub api_key: SecretString,
    /// Merchant account the charges are booked under.
    pub merchant_id: String,
}

impl std::fmt::Debug for PayGateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayGateConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("merchant_id", &self.merchant_id)
            .finish()
    }
}

impl PayGateConfig {
    /// Load the gateway configuration from the environment.
    ///
    /// Reads `DUMA_GATEWAY_URL`, `DUMA_GATEWAY_API_KEY`, and
    /// `DUMA_GATEWAY_MERCHANT_ID`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is missing, the URL does not parse,
    /// or the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = require_env("DUMA_GATEWAY_URL")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("DUMA_GATEWAY_URL".to_owned(), e.to_string()))?;

        let api_key = require_env("DUMA_GATEWAY_API_KEY")?;
        crate::config::reject_placeholder("DUMA_GATEWAY_API_KEY", &api_key)?;

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            merchant_id: require_env("DUMA_GATEWAY_MERCHANT_ID")?,
        })
    }
}

/// PayGate API client.
#[derive(Debug, Clone)]
pub struct PayGateClient {
    client: reqwest::Client,
    base_url: Url,
    merchant_id: String,
}

impl PayGateClient {
    /// Create a new PayGate client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the API key
    /// contains invalid header characters.
    pub fn new(config: &PayGateConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value).map_err(|_| PaymentError::Api {
                status: 0,
                message: "API key contains invalid header characters".to_owned(),
            })?,
        );
        headers.insert("revision", HeaderValue::from_static(API_REVISION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            merchant_id: config.merchant_id.clone(),
        })
    }
}

impl PaymentGateway for PayGateClient {
    #[instrument(skip(self, request), fields(total = %request.total))]
    async fn submit_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentError> {
        let url = self
            .base_url
            .join("v1/payments")
            .map_err(|e| PaymentError::Api {
                status: 0,
                message: format!("invalid payment endpoint: {e}"),
            })?;

        let submission = PaymentSubmission {
            merchant_id: &self.merchant_id,
            currency: "ZAR",
            request,
        };

        let response = self.client.post(url).json(&submission).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let outcome: PaymentOutcome = response.json().await?;

        match outcome.status {
            OutcomeStatus::Approved => {
                debug!(reference = %outcome.reference, "payment captured");
                Ok(PaymentConfirmation {
                    reference: outcome.reference,
                    processed_at: outcome.processed_at.unwrap_or_else(Utc::now),
                })
            }
            OutcomeStatus::Declined => Err(PaymentError::Declined(
                outcome.message.unwrap_or_else(|| "declined".to_owned()),
            )),
        }
    }
}

/// Request body for a payment capture.
#[derive(Debug, Serialize)]
struct PaymentSubmission<'a> {
    merchant_id: &'a str,
    currency: &'a str,
    #[serde(flatten)]
    request: &'a PaymentRequest,
}

/// Response body for a payment capture.
#[derive(Debug, Deserialize)]
struct PaymentOutcome {
    status: OutcomeStatus,
    reference: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    processed_at: Option<chrono::DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OutcomeStatus {
    Approved,
    Declined,
}
