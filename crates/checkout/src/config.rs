//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DUMA_DEBOUNCE_MS` - Phone validation debounce window (default: 400)
//! - `DUMA_PAYMENT_TIMEOUT_MS` - Payment call deadline (default: 30000)
//!
//! ## Required for the HTTP payment gateway (see `services::payment`)
//! - `DUMA_GATEWAY_URL` - Base URL of the payment service
//! - `DUMA_GATEWAY_API_KEY` - Gateway API key (server-side only)
//! - `DUMA_GATEWAY_MERCHANT_ID` - Merchant account identifier

use std::time::Duration;

use thiserror::Error;

/// Default debounce window for phone validation.
const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Default deadline for the payment call.
const DEFAULT_PAYMENT_TIMEOUT_MS: u64 = 30_000;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Tunable knobs for the checkout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// How long to wait after the last keystroke before resolving a number.
    pub debounce: Duration,
    /// Deadline for the external payment call.
    pub payment_timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            payment_timeout: Duration::from_millis(DEFAULT_PAYMENT_TIMEOUT_MS),
        }
    }
}

impl CheckoutConfig {
    /// Load the configuration from the environment, falling back to
    /// defaults for unset knobs.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable does not parse as milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            debounce: optional_ms("DUMA_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?,
            payment_timeout: optional_ms("DUMA_PAYMENT_TIMEOUT_MS", DEFAULT_PAYMENT_TIMEOUT_MS)?,
        })
    }
}

/// Read a required environment variable.
pub(crate) fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Read an optional millisecond duration with a default.
fn optional_ms(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string())),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}

/// Reject secrets that look like unreplaced placeholders.
pub(crate) fn reject_placeholder(name: &str, value: &str) -> Result<(), ConfigError> {
    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_owned(),
                format!("value matches placeholder pattern \"{pattern}\""),
            ));
        }
    }
    Ok(())
}
