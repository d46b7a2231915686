//! Checkout session orchestration.
//!
//! [`CheckoutSession`] composes the cart, the phone validation guard, the
//! terms gate, and the allocation engine into a single `submit` operation.
//! Preconditions are checked in a fixed order (cart, terms, single-flight),
//! the payment collaborator is invoked at most once per attempt, and state
//! is only persisted (cart cleared, recipient remembered) after the charge
//! is confirmed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use duma_core::{ActorRole, Cart, CartItem, Money, Msisdn, ProfitAllocation, PurchaseMode};

use crate::config::CheckoutConfig;
use crate::engine::allocate;
use crate::error::CheckoutError;
use crate::network::NetworkResolver;
use crate::services::{
    PaymentGateway, PaymentRequest, ProfileBalances, ProfileError, ProfileKey, ProfileStore,
    RecipientBook, RecipientInfo,
};
use crate::terms::TermsGate;
use crate::validation::{PhoneValidationGuard, lock};

/// Who is buying, and for whom.
#[derive(Debug, Clone)]
pub struct ActorContext {
    /// Vendor or customer account.
    pub role: ActorRole,
    /// Buying for the account's own number or someone else's.
    pub mode: PurchaseMode,
    /// Identity the profile store keys balances on.
    pub payer: ProfileKey,
    /// Where the purchase is delivered.
    pub recipient: RecipientInfo,
}

/// Outcome of a confirmed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Gateway reference for the captured payment.
    pub reference: String,
    /// Amount the payer was charged.
    pub total: Money,
    /// The revenue split booked with the charge.
    pub allocation: ProfitAllocation,
    /// When the gateway processed the charge.
    pub completed_at: DateTime<Utc>,
}

/// Releases the in-flight flag on drop, success and failure paths alike.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    /// Claim the flag, or `None` if a submission is already pending.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One buyer's checkout: cart, validation, terms, and submission.
pub struct CheckoutSession<G, P, R> {
    config: CheckoutConfig,
    guard: PhoneValidationGuard,
    gate: Arc<Mutex<TermsGate>>,
    cart: Mutex<Cart>,
    gateway: G,
    profiles: P,
    recipients: R,
    in_flight: AtomicBool,
}

impl<G, P, R> CheckoutSession<G, P, R>
where
    G: PaymentGateway,
    P: ProfileStore,
    R: RecipientBook,
{
    /// Create a session with injected collaborators.
    #[must_use]
    pub fn new(config: CheckoutConfig, gateway: G, profiles: P, recipients: R) -> Self {
        let gate = Arc::new(Mutex::new(TermsGate::new()));
        let guard =
            PhoneValidationGuard::new(NetworkResolver::new(), Arc::clone(&gate), config.debounce);

        Self {
            config,
            guard,
            gate,
            cart: Mutex::new(Cart::new()),
            gateway,
            profiles,
            recipients,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The validation guard for this session's phone field.
    #[must_use]
    pub const fn guard(&self) -> &PhoneValidationGuard {
        &self.guard
    }

    /// Feed the current value of the phone-number field.
    pub fn phone_input(&self, raw: &str) {
        self.guard.input_changed(raw);
    }

    /// Acknowledge the SA purchase terms for the current number.
    ///
    /// Returns whether the acknowledgment was recorded; it is refused while
    /// detection is pending, so terms can never be accepted against a
    /// number whose verdict is not in yet.
    pub fn accept_sa_terms(&self) -> bool {
        if self.guard.is_detecting() {
            return false;
        }
        let mut gate = lock(&self.gate);
        gate.accept_sa_terms();
        gate.sa_terms_accepted()
    }

    /// Acknowledge unknown-number risk for the current number.
    ///
    /// Refused while detection is pending, like [`Self::accept_sa_terms`].
    pub fn accept_unknown_number_risk(&self) -> bool {
        if self.guard.is_detecting() {
            return false;
        }
        let mut gate = lock(&self.gate);
        gate.accept_unknown_number_risk();
        gate.unknown_number_accepted()
    }

    /// Whether every required acknowledgment is in for the current number.
    #[must_use]
    pub fn can_submit_purchase(&self) -> bool {
        lock(&self.gate).can_submit_purchase()
    }

    /// Add a deal to the cart.
    pub fn add_to_cart(&self, item: CartItem) {
        lock(&self.cart).add(item);
    }

    /// Sum of the discounted prices in the cart.
    #[must_use]
    pub fn cart_total(&self) -> Money {
        lock(&self.cart).total()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn cart_is_empty(&self) -> bool {
        lock(&self.cart).is_empty()
    }

    /// Abandon the cart.
    pub fn clear_cart(&self) {
        lock(&self.cart).clear();
    }

    /// Read the payer's balances for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile store cannot be reached.
    pub async fn balances(&self, key: &ProfileKey) -> Result<Option<ProfileBalances>, ProfileError> {
        self.profiles.balances(key).await
    }

    /// Look up a previously used recipient by number.
    ///
    /// Best-effort convenience: store failures are logged and reported as
    /// "not found".
    pub async fn known_recipient(&self, msisdn: &Msisdn) -> Option<RecipientInfo> {
        match self.recipients.lookup(msisdn).await {
            Ok(found) => found,
            Err(error) => {
                warn!(%error, "recipient lookup failed");
                None
            }
        }
    }

    /// Submit the purchase.
    ///
    /// Preconditions, first failure wins: cart non-empty, terms accepted,
    /// no submission already in flight. On the success path the cart total
    /// is allocated, the payment collaborator is invoked exactly once under
    /// the configured deadline, and only a confirmed charge clears the cart.
    /// On any failure the cart and allocation are left untouched so the
    /// buyer can retry.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] for each failed gate; see
    /// [`CheckoutError::kind`].
    #[instrument(skip(self, ctx), fields(role = ?ctx.role, mode = ?ctx.mode))]
    pub async fn submit(&self, ctx: &ActorContext) -> Result<PurchaseReceipt, CheckoutError> {
        if lock(&self.cart).is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !lock(&self.gate).can_submit_purchase() {
            return Err(CheckoutError::TermsNotAccepted);
        }
        let _flight =
            InFlightGuard::acquire(&self.in_flight).ok_or(CheckoutError::SubmissionInFlight)?;

        let total = lock(&self.cart).total();
        let allocation = allocate(total, ctx.role, ctx.mode);
        let request = PaymentRequest {
            idempotency_key: Uuid::new_v4(),
            total,
            allocation,
            recipient: ctx.recipient.clone(),
        };

        let confirmation = tokio::time::timeout(
            self.config.payment_timeout,
            self.gateway.submit_payment(&request),
        )
        .await
        .map_err(|_| CheckoutError::Timeout)??;

        lock(&self.cart).clear();
        info!(reference = %confirmation.reference, %total, "purchase complete");

        // Additive convenience only; a store failure never fails the
        // purchase.
        if let Err(error) = self.recipients.remember(ctx.recipient.clone()).await {
            warn!(%error, "failed to remember recipient");
        }

        Ok(PurchaseReceipt {
            reference: confirmation.reference,
            total,
            allocation,
            completed_at: confirmation.processed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use rust_decimal::Decimal;

    use duma_core::{CustomerId, DealId, DealType};

    use super::*;
    use crate::error::ErrorKind;
    use crate::services::{
        MemoryProfileStore, MemoryRecipientBook, PaymentConfirmation, PaymentError,
    };

    struct ApprovingGateway {
        calls: AtomicUsize,
    }

    impl ApprovingGateway {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PaymentGateway for &ApprovingGateway {
        async fn submit_payment(
            &self,
            _request: &PaymentRequest,
        ) -> Result<PaymentConfirmation, PaymentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PaymentConfirmation {
                reference: format!("PG-{}", Uuid::new_v4()),
                processed_at: Utc::now(),
            })
        }
    }

    struct DecliningGateway;

    impl PaymentGateway for DecliningGateway {
        async fn submit_payment(
            &self,
            _request: &PaymentRequest,
        ) -> Result<PaymentConfirmation, PaymentError> {
            Err(PaymentError::Declined("insufficient funds".to_owned()))
        }
    }

    fn airtime_deal(price_cents: i64) -> CartItem {
        CartItem::new(
            DealId::new(1),
            "Vodacom",
            DealType::Airtime,
            Decimal::new(100, 0),
            "Duma Deals",
            Money::from_cents(price_cents),
        )
        .expect("non-negative price")
    }

    fn customer_ctx() -> ActorContext {
        ActorContext {
            role: ActorRole::Customer,
            mode: PurchaseMode::SelfPurchase,
            payer: ProfileKey::Customer(CustomerId::new(1)),
            recipient: RecipientInfo {
                msisdn: Msisdn::parse("0821234567").expect("valid number"),
                name: None,
            },
        }
    }

    fn session<G: PaymentGateway>(
        gateway: G,
    ) -> CheckoutSession<G, MemoryProfileStore, MemoryRecipientBook> {
        CheckoutSession::new(
            CheckoutConfig::default(),
            gateway,
            MemoryProfileStore::new(),
            MemoryRecipientBook::new(),
        )
    }

    /// Validate the target number and accept the SA terms.
    async fn pass_terms<G, P, R>(session: &CheckoutSession<G, P, R>)
    where
        G: PaymentGateway,
        P: ProfileStore,
        R: RecipientBook,
    {
        session.phone_input("0821234567");
        tokio::time::sleep(CheckoutConfig::default().debounce * 2).await;
        assert!(session.accept_sa_terms());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_rejected_before_gateway() {
        let gateway = ApprovingGateway::new();
        let session = session(&gateway);
        pass_terms(&session).await;

        let error = session.submit(&customer_ctx()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::EmptyCart);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_checked_before_terms() {
        // Precondition order: an empty cart wins over missing terms.
        let gateway = ApprovingGateway::new();
        let session = session(&gateway);

        let error = session.submit(&customer_ctx()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::EmptyCart);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terms_required_before_submission() {
        let gateway = ApprovingGateway::new();
        let session = session(&gateway);
        session.add_to_cart(airtime_deal(10_000));

        let error = session.submit(&customer_ctx()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TermsNotAccepted);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_purchase_clears_cart() {
        let gateway = ApprovingGateway::new();
        let session = session(&gateway);
        session.add_to_cart(airtime_deal(10_000));
        pass_terms(&session).await;

        let receipt = session.submit(&customer_ctx()).await.expect("approved");
        assert_eq!(receipt.total, Money::from_cents(10_000));
        assert_eq!(
            receipt.allocation.customer_cashback,
            Some(Money::from_cents(5_000))
        );
        assert!(session.cart_is_empty());
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_receipt_carries_vendor_allocation() {
        let gateway = ApprovingGateway::new();
        let session = session(&gateway);
        session.add_to_cart(airtime_deal(20_000));
        pass_terms(&session).await;

        let ctx = ActorContext {
            role: ActorRole::Vendor,
            ..customer_ctx()
        };
        let receipt = session.submit(&ctx).await.expect("approved");
        assert_eq!(
            receipt.allocation.vendor_profit,
            Some(Money::from_cents(15_000))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_payment_leaves_cart_for_retry() {
        let session = session(DecliningGateway);
        session.add_to_cart(airtime_deal(10_000));
        pass_terms(&session).await;

        let error = session.submit(&customer_ctx()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::PaymentFailed);
        assert!(!session.cart_is_empty());
        assert_eq!(session.cart_total(), Money::from_cents(10_000));

        // The in-flight flag was released: a retry reaches the gateway
        // again instead of reporting SubmissionInFlight.
        let retry = session.submit(&customer_ctx()).await.unwrap_err();
        assert_eq!(retry.kind(), ErrorKind::PaymentFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acceptance_refused_while_detecting() {
        let gateway = ApprovingGateway::new();
        let session = session(&gateway);

        session.phone_input("0821234567");
        assert!(!session.accept_sa_terms());

        tokio::time::sleep(CheckoutConfig::default().debounce * 2).await;
        assert!(session.accept_sa_terms());
        assert!(session.can_submit_purchase());
    }
}
