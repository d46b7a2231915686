//! Integration tests for the Duma Mobile checkout engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p duma-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Full purchase flows against gateway doubles
//! - `phone_validation` - Debounced carrier resolution and terms gating
//!
//! This crate's library provides the shared gateway double and session
//! builders the test files use. Everything runs against tokio's paused
//! clock; no network or database is required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use duma_checkout::services::{MemoryProfileStore, MemoryRecipientBook};
use duma_checkout::{
    ActorContext, CheckoutConfig, CheckoutSession, PaymentConfirmation, PaymentError,
    PaymentGateway, PaymentRequest, ProfileKey, RecipientInfo,
};
use duma_core::{ActorRole, CartItem, CustomerId, DealId, DealType, Money, Msisdn, PurchaseMode};

/// How a [`RecordingGateway`] answers.
#[derive(Debug, Clone, Copy)]
pub enum GatewayBehavior {
    /// Approve after simulated processing latency.
    Approve { delay: Duration },
    /// Refuse the charge.
    Decline,
    /// Never answer (exercises the submit deadline).
    Hang,
}

/// Payment gateway double that counts invocations.
#[derive(Debug)]
pub struct RecordingGateway {
    behavior: GatewayBehavior,
    calls: AtomicUsize,
}

impl RecordingGateway {
    #[must_use]
    pub fn new(behavior: GatewayBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Approve instantly.
    #[must_use]
    pub fn approving() -> Self {
        Self::new(GatewayBehavior::Approve {
            delay: Duration::ZERO,
        })
    }

    /// How many times `submit_payment` was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for &RecordingGateway {
    async fn submit_payment(
        &self,
        _request: &PaymentRequest,
    ) -> Result<PaymentConfirmation, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            GatewayBehavior::Approve { delay } => {
                tokio::time::sleep(delay).await;
                Ok(PaymentConfirmation {
                    reference: format!("PG-{}", Uuid::new_v4()),
                    processed_at: Utc::now(),
                })
            }
            GatewayBehavior::Decline => {
                Err(PaymentError::Declined("card declined".to_owned()))
            }
            GatewayBehavior::Hang => std::future::pending().await,
        }
    }
}

/// A session wired to a gateway double and in-memory stores.
pub type TestSession<'a> =
    CheckoutSession<&'a RecordingGateway, MemoryProfileStore, MemoryRecipientBook>;

/// Initialize log capture once per test binary.
///
/// Controlled by `RUST_LOG`; silent by default.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a session around the given gateway double.
#[must_use]
pub fn test_session(gateway: &RecordingGateway) -> TestSession<'_> {
    init_tracing();
    CheckoutSession::new(
        CheckoutConfig::default(),
        gateway,
        MemoryProfileStore::new(),
        MemoryRecipientBook::new(),
    )
}

/// An airtime deal priced in cents.
///
/// # Panics
///
/// Panics if `price_cents` is negative.
#[must_use]
pub fn airtime_deal(price_cents: i64) -> CartItem {
    CartItem::new(
        DealId::new(101),
        "Vodacom",
        DealType::Airtime,
        Decimal::new(100, 0),
        "Duma Deals",
        Money::from_cents(price_cents),
    )
    .expect("non-negative test price")
}

/// A customer buying for the given number.
///
/// # Panics
///
/// Panics if `msisdn` does not parse.
#[must_use]
pub fn customer_buying_for(msisdn: &str, mode: PurchaseMode) -> ActorContext {
    ActorContext {
        role: ActorRole::Customer,
        mode,
        payer: ProfileKey::Customer(CustomerId::new(7)),
        recipient: RecipientInfo {
            msisdn: Msisdn::parse(msisdn).expect("test msisdn"),
            name: Some("Test Recipient".to_owned()),
        },
    }
}

/// Drive the session through validation and accept the SA terms (plus the
/// unknown-number risk terms when the number did not resolve).
pub async fn validate_and_accept(session: &TestSession<'_>, number: &str) {
    session.phone_input(number);
    tokio::time::sleep(CheckoutConfig::default().debounce * 2).await;

    assert!(session.accept_sa_terms(), "SA terms should be acceptable");
    if !session.can_submit_purchase() {
        assert!(session.accept_unknown_number_risk());
    }
}
