//! Debounced phone validation.
//!
//! Wraps [`NetworkResolver`] behind a debounce window so resolution runs
//! once per pause in typing rather than on every keystroke. Results are
//! matched to the input that triggered them: if the number changes while a
//! resolution is pending, the stale result is discarded on arrival
//! (last-write-wins by input identity, not by arrival time).
//!
//! Changing the number also resets the shared [`TermsGate`], so accepting
//! terms for one number never carries over to a different one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use duma_core::normalize_digits;

use crate::error::ErrorKind;
use crate::network::{MIN_RESOLVABLE_DIGITS, NetworkResolver, PhoneValidationResult};
use crate::terms::TermsGate;

/// Lock a mutex, recovering the inner value if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Published validation state for the current input.
#[derive(Debug, Clone, Default)]
pub struct ValidationSnapshot {
    /// Normalized digits of the current input.
    pub input_digits: String,
    /// Whether a resolution is pending for the current input.
    pub detecting: bool,
    /// The verdict for the current input, once resolved. Absent (not
    /// "Unknown") while the input is too short to resolve.
    pub result: Option<PhoneValidationResult>,
}

impl ValidationSnapshot {
    /// The error kind currently blocking checkout, if any.
    ///
    /// `None` while detection is pending; the UI should wait rather than
    /// show an error for a verdict that does not exist yet.
    #[must_use]
    pub fn blocking_error(&self) -> Option<ErrorKind> {
        if self.detecting {
            return None;
        }
        match &self.result {
            Some(result) if result.is_valid => None,
            Some(_) => Some(ErrorKind::UnrecognizedCarrier),
            None => Some(ErrorKind::InvalidPhoneFormat),
        }
    }
}

#[derive(Debug, Default)]
struct GuardState {
    digits: String,
    epoch: u64,
}

/// Observes the phone-number field and publishes validation verdicts.
#[derive(Debug, Clone)]
pub struct PhoneValidationGuard {
    resolver: NetworkResolver,
    gate: Arc<Mutex<TermsGate>>,
    debounce: Duration,
    state: Arc<Mutex<GuardState>>,
    tx: Arc<watch::Sender<ValidationSnapshot>>,
}

impl PhoneValidationGuard {
    /// Create a guard publishing into a fresh snapshot channel.
    #[must_use]
    pub fn new(resolver: NetworkResolver, gate: Arc<Mutex<TermsGate>>, debounce: Duration) -> Self {
        let (tx, _rx) = watch::channel(ValidationSnapshot::default());
        Self {
            resolver,
            gate,
            debounce,
            state: Arc::new(Mutex::new(GuardState::default())),
            tx: Arc::new(tx),
        }
    }

    /// The current published state.
    #[must_use]
    pub fn snapshot(&self) -> ValidationSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ValidationSnapshot> {
        self.tx.subscribe()
    }

    /// Whether a resolution is pending for the current input.
    #[must_use]
    pub fn is_detecting(&self) -> bool {
        self.tx.borrow().detecting
    }

    /// The verdict for the current input, once resolved.
    #[must_use]
    pub fn verdict(&self) -> Option<PhoneValidationResult> {
        self.tx.borrow().result.clone()
    }

    /// Feed the current value of the phone-number field.
    ///
    /// No-op when the normalized digits are unchanged. Otherwise the shared
    /// terms gate is reset immediately, and either the snapshot is cleared
    /// (input shorter than 10 digits) or a debounced resolution is
    /// scheduled for the new input.
    pub fn input_changed(&self, raw: &str) {
        let digits = normalize_digits(raw);

        let epoch = {
            let mut state = lock(&self.state);
            if state.digits == digits {
                return;
            }
            state.digits = digits.clone();
            state.epoch += 1;
            state.epoch
        };

        lock(&self.gate).phone_changed();

        if digits.len() < MIN_RESOLVABLE_DIGITS {
            self.tx.send_replace(ValidationSnapshot {
                input_digits: digits,
                detecting: false,
                result: None,
            });
            return;
        }

        self.tx.send_replace(ValidationSnapshot {
            input_digits: digits.clone(),
            detecting: true,
            result: None,
        });

        let resolver = self.resolver.clone();
        let gate = Arc::clone(&self.gate);
        let state = Arc::clone(&self.state);
        let tx = Arc::clone(&self.tx);
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let result = resolver.resolve(&digits);

            // Publish only if this input is still the current one.
            let state = lock(&state);
            if state.epoch != epoch {
                debug!(number = %result.checked_number, "discarding stale validation result");
                return;
            }
            lock(&gate).observe_validation(&result);
            tx.send_replace(ValidationSnapshot {
                input_digits: digits,
                detecting: false,
                result: Some(result),
            });
        });
    }
}
