//! Revenue allocation value objects.
//!
//! A [`ProfitAllocation`] is derived from the cart total and the purchasing
//! context; it is never persisted, only recomputed and handed to the payment
//! collaborator so downstream ledgers match.

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Whether the purchasing account is a reseller or an end customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Vendor,
    Customer,
}

/// Whether the buyer purchases for their own number or someone else's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseMode {
    /// Buying for the account's own number.
    SelfPurchase,
    /// Buying on behalf of another phone number.
    Other,
}

/// The split of a deal's price among cashback and profit recipients.
///
/// Only the fields that apply to the `(role, mode)` combination are set.
/// The platform's own share is implicit: whatever the explicit shares leave
/// over, including any residual rounding cent (see
/// [`ProfitAllocation::platform_margin`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfitAllocation {
    /// Reseller profit, set for vendor purchases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_profit: Option<Money>,
    /// Cashback to a customer buying for their own number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_cashback: Option<Money>,
    /// Reward to the paying customer when buying for someone else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_customer_reward: Option<Money>,
    /// Reward to the (possibly unregistered) recipient of an "other"
    /// purchase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unregistered_recipient_reward: Option<Money>,
}

impl ProfitAllocation {
    /// Sum of every share that is set.
    #[must_use]
    pub fn allocated_total(&self) -> Money {
        [
            self.vendor_profit,
            self.customer_cashback,
            self.registered_customer_reward,
            self.unregistered_recipient_reward,
        ]
        .into_iter()
        .flatten()
        .sum()
    }

    /// The platform's implicit share of `total`.
    ///
    /// Always satisfies `allocated_total() + platform_margin(total) == total`
    /// exactly. May be negative when the explicit shares are allowed to
    /// exceed the price (the "other"-mode double reward).
    #[must_use]
    pub fn platform_margin(&self, total: Money) -> Money {
        total - self.allocated_total()
    }
}
