//! Collaborator interfaces.
//!
//! The engine never talks to storage, ledgers, or payment rails directly;
//! it goes through the traits here. Production wiring injects the HTTP
//! gateway from [`payment`] and whatever profile/recipient backends the
//! deployment uses; tests inject the in-memory implementations from
//! [`memory`] or purpose-built doubles.

pub mod memory;
pub mod payment;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use duma_core::{CustomerId, Money, Msisdn, ProfitAllocation, VendorId};

pub use memory::{MemoryProfileStore, MemoryRecipientBook};
pub use payment::{PayGateClient, PayGateConfig};

/// Who a purchase is delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientInfo {
    /// Target phone number.
    pub msisdn: Msisdn,
    /// Display name, when the buyer provided one.
    pub name: Option<String>,
}

/// Identity a profile record is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKey {
    Customer(CustomerId),
    Vendor(VendorId),
}

/// Balance figures read for display.
///
/// The engine never mutates these; crediting cashback and profit is the
/// payment collaborator's side of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileBalances {
    pub cashback_balance: Money,
    pub total_earned: Money,
    pub total_spent: Money,
}

/// Errors from the profile store.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The backing store could not be reached.
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the recipient book.
#[derive(Debug, Error)]
pub enum RecipientError {
    /// The backing store could not be reached.
    #[error("recipient book unavailable: {0}")]
    Unavailable(String),
}

/// A payment submission handed to the gateway.
///
/// Carries the exact allocation computed by the engine so downstream
/// ledgers match what the buyer was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Deduplication key for this attempt; a retry after failure is a new
    /// attempt with a new key.
    pub idempotency_key: uuid::Uuid,
    /// Amount the payer is charged.
    pub total: Money,
    /// The revenue split to book alongside the charge.
    pub allocation: ProfitAllocation,
    /// Who the purchase is delivered to.
    pub recipient: RecipientInfo,
}

/// A successful payment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    /// Gateway reference for the captured payment.
    pub reference: String,
    /// When the gateway processed the charge.
    pub processed_at: DateTime<Utc>,
}

/// Errors from the payment collaborator.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The gateway refused the charge.
    #[error("payment declined: {0}")]
    Declined(String),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with an error response.
    #[error("gateway error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Captures a payment and books the allocation; also owns receipt and
/// notification delivery, which therefore never happens before the charge
/// is confirmed.
pub trait PaymentGateway: Send + Sync {
    /// Submit a payment for capture.
    fn submit_payment(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<PaymentConfirmation, PaymentError>> + Send;
}

/// Read-only access to profile balance records.
pub trait ProfileStore: Send + Sync {
    /// Fetch the balances for an identity, if a profile exists.
    fn balances(
        &self,
        key: &ProfileKey,
    ) -> impl Future<Output = Result<Option<ProfileBalances>, ProfileError>> + Send;
}

/// Optional memory of previously used recipients.
///
/// Purely additive convenience: failures here must never fail a purchase.
pub trait RecipientBook: Send + Sync {
    /// Look up a previously used recipient by number.
    fn lookup(
        &self,
        msisdn: &Msisdn,
    ) -> impl Future<Output = Result<Option<RecipientInfo>, RecipientError>> + Send;

    /// Save a recipient for future lookups.
    fn remember(
        &self,
        recipient: RecipientInfo,
    ) -> impl Future<Output = Result<(), RecipientError>> + Send;
}
