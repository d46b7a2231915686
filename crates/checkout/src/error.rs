//! Checkout error types.
//!
//! Every gate in the purchase flow surfaces a typed error; nothing in this
//! crate uses panics or exceptions for control flow. [`ErrorKind`] is the
//! stable, serializable discriminant the UI layer keys its messaging on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::PaymentError;

/// Stable discriminants for everything that can block or fail a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Fewer than 10 normalized digits; no terms are shown yet.
    InvalidPhoneFormat,
    /// Resolvable length but the prefix is not in the carrier table.
    UnrecognizedCarrier,
    /// Submit attempted while required terms are outstanding.
    TermsNotAccepted,
    /// Submit attempted with no items in the cart.
    EmptyCart,
    /// Duplicate submit while a prior one is pending.
    SubmissionInFlight,
    /// The payment collaborator reported failure.
    PaymentFailed,
    /// The payment collaborator did not answer in time.
    Timeout,
}

/// Errors returned by [`CheckoutSession::submit`].
///
/// [`CheckoutSession::submit`]: crate::orchestrator::CheckoutSession::submit
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart holds no items.
    #[error("cart is empty")]
    EmptyCart,

    /// Required terms have not been accepted for the current number.
    #[error("required terms have not been accepted")]
    TermsNotAccepted,

    /// A submission for this cart is already pending.
    #[error("a submission is already in flight for this cart")]
    SubmissionInFlight,

    /// The payment collaborator failed; the cart is left untouched.
    #[error("payment failed: {0}")]
    Payment(#[from] PaymentError),

    /// The payment collaborator exceeded the configured deadline.
    #[error("payment call timed out")]
    Timeout,
}

impl CheckoutError {
    /// The stable discriminant for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCart => ErrorKind::EmptyCart,
            Self::TermsNotAccepted => ErrorKind::TermsNotAccepted,
            Self::SubmissionInFlight => ErrorKind::SubmissionInFlight,
            Self::Payment(_) => ErrorKind::PaymentFailed,
            Self::Timeout => ErrorKind::Timeout,
        }
    }

    /// Whether the user can resolve this without losing cart state.
    ///
    /// Gating conditions (empty cart, terms, in-flight duplicate) are
    /// recoverable by user action; payment failure and timeout are the
    /// terminal, user-visible outcomes of the single attempt — the cart is
    /// still intact, but the attempt itself is over.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyCart | Self::TermsNotAccepted | Self::SubmissionInFlight
        )
    }
}
