//! Terms-acceptance state machine.
//!
//! Purchases are gated behind two independent acknowledgments:
//!
//! - South African purchase terms, always required once a target number and
//!   deal are known (RICA-related wording lives in the UI layer).
//! - Unknown-number risk terms, required only when carrier resolution fails
//!   for the target number.
//!
//! Accepting terms for one number must never carry over to a different
//! number, so any phone-number change drops the machine back and clears
//! both flags.

use crate::network::PhoneValidationResult;

/// Where the gate currently stands for the checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermsState {
    /// No verdict yet for the current number.
    Idle,
    /// A verdict arrived; acknowledgments are outstanding.
    TermsRequired,
    /// Every required acknowledgment is in for the current number.
    TermsAccepted,
}

/// Tracks which terms have been acknowledged for the current target number.
#[derive(Debug, Clone)]
pub struct TermsGate {
    state: TermsState,
    sa_terms_accepted: bool,
    unknown_number_accepted: bool,
    number_is_valid: bool,
    has_verdict: bool,
}

impl Default for TermsGate {
    fn default() -> Self {
        Self::new()
    }
}

impl TermsGate {
    /// Create a gate for a fresh checkout session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TermsState::Idle,
            sa_terms_accepted: false,
            unknown_number_accepted: false,
            number_is_valid: false,
            has_verdict: false,
        }
    }

    /// Current machine state.
    #[must_use]
    pub const fn state(&self) -> TermsState {
        self.state
    }

    /// Whether the SA purchase terms have been acknowledged.
    #[must_use]
    pub const fn sa_terms_accepted(&self) -> bool {
        self.sa_terms_accepted
    }

    /// Whether unknown-number risk has been acknowledged.
    #[must_use]
    pub const fn unknown_number_accepted(&self) -> bool {
        self.unknown_number_accepted
    }

    /// Whether the unknown-number terms must be shown for the current
    /// number.
    #[must_use]
    pub const fn requires_unknown_number_terms(&self) -> bool {
        self.has_verdict && !self.number_is_valid
    }

    /// The target phone number changed: clear both flags and fall back to
    /// `Idle` until a verdict for the new number arrives.
    pub fn phone_changed(&mut self) {
        self.state = TermsState::Idle;
        self.sa_terms_accepted = false;
        self.unknown_number_accepted = false;
        self.number_is_valid = false;
        self.has_verdict = false;
    }

    /// Feed the verdict for the current number into the gate.
    ///
    /// SA purchase terms become required unconditionally; unknown-number
    /// terms become required as well when the verdict is invalid.
    pub fn observe_validation(&mut self, result: &PhoneValidationResult) {
        self.has_verdict = true;
        self.number_is_valid = result.is_valid;
        if self.state == TermsState::Idle {
            self.state = TermsState::TermsRequired;
        }
    }

    /// Explicit user acknowledgment of the SA purchase terms.
    ///
    /// Ignored while no verdict is in for the current number.
    pub fn accept_sa_terms(&mut self) {
        if self.state == TermsState::Idle {
            return;
        }
        self.sa_terms_accepted = true;
        self.advance();
    }

    /// Explicit user acknowledgment of unknown-number risk.
    ///
    /// Ignored while no verdict is in for the current number.
    pub fn accept_unknown_number_risk(&mut self) {
        if self.state == TermsState::Idle {
            return;
        }
        self.unknown_number_accepted = true;
        self.advance();
    }

    /// Whether a purchase may be submitted for the current number.
    #[must_use]
    pub const fn can_submit_purchase(&self) -> bool {
        self.sa_terms_accepted && (self.number_is_valid || self.unknown_number_accepted)
    }

    fn advance(&mut self) {
        if self.can_submit_purchase() {
            self.state = TermsState::TermsAccepted;
        }
    }
}
