//! Duma Checkout - Purchase validation and revenue allocation engine.
//!
//! This crate is the transactional core of the Duma Mobile reseller portal.
//! It resolves a target phone number to a carrier, gates checkout behind the
//! required terms acknowledgments, computes the deterministic revenue split
//! for a purchase, and drives a single, non-duplicated payment submission.
//!
//! # Architecture
//!
//! - [`network`] - Carrier resolution from phone-number prefixes
//! - [`validation`] - Debounced phone validation with stale-result discard
//! - [`terms`] - Terms-acceptance state machine
//! - [`engine`] - Pure revenue allocation
//! - [`orchestrator`] - Checkout session and single-flight submission
//! - [`services`] - Collaborator traits (payment, profiles, recipients)
//!
//! Authentication, profile persistence, payment capture, and receipt
//! delivery are external collaborators reached through the traits in
//! [`services`]; this crate never touches a process-wide singleton.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod engine;
pub mod error;
pub mod network;
pub mod orchestrator;
pub mod services;
pub mod terms;
pub mod validation;

pub use config::{CheckoutConfig, ConfigError};
pub use engine::allocate;
pub use error::{CheckoutError, ErrorKind};
pub use network::{NetworkResolver, PhoneValidationResult, UNKNOWN_CARRIER};
pub use orchestrator::{ActorContext, CheckoutSession, PurchaseReceipt};
pub use services::{
    PaymentConfirmation, PaymentError, PaymentGateway, PaymentRequest, ProfileBalances,
    ProfileError, ProfileKey, ProfileStore, RecipientBook, RecipientError, RecipientInfo,
};
pub use terms::{TermsGate, TermsState};
pub use validation::{PhoneValidationGuard, ValidationSnapshot};
