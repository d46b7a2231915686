//! Revenue allocation engine.
//!
//! Computes the deterministic split of a cart total among cashback and
//! profit recipients. The function is pure: identical inputs always yield
//! identical output, and nothing is persisted here.
//!
//! The "other"-mode rule pays 50% of the total to the payer *and* 50% to
//! the recipient, so combined rewards equal the full price. That is the
//! platform's stated marketing economics, reproduced exactly and pinned by
//! a regression test below.

use rust_decimal::Decimal;

use duma_core::{ActorRole, Money, ProfitAllocation, PurchaseMode};

/// Vendor purchases return 75% of the total as reseller profit.
const VENDOR_PROFIT_SHARE: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

/// Customers buying for themselves earn 50% cashback.
const CUSTOMER_CASHBACK_SHARE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// "Other"-mode purchases reward payer and recipient 50% each.
const OTHER_MODE_REWARD_SHARE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Split `total` among the parties entitled to a share.
///
/// Each share is a fixed percentage of the total, rounded half-up to cents.
/// Whatever the shares leave over is the platform's implicit margin
/// ([`ProfitAllocation::platform_margin`]), which therefore absorbs any
/// residual rounding cent so the split reconciles exactly.
#[must_use]
pub fn allocate(total: Money, role: ActorRole, mode: PurchaseMode) -> ProfitAllocation {
    match (role, mode) {
        (ActorRole::Vendor, _) => ProfitAllocation {
            vendor_profit: Some(total.scale(VENDOR_PROFIT_SHARE)),
            ..ProfitAllocation::default()
        },
        (ActorRole::Customer, PurchaseMode::SelfPurchase) => ProfitAllocation {
            customer_cashback: Some(total.scale(CUSTOMER_CASHBACK_SHARE)),
            ..ProfitAllocation::default()
        },
        (ActorRole::Customer, PurchaseMode::Other) => ProfitAllocation {
            registered_customer_reward: Some(total.scale(OTHER_MODE_REWARD_SHARE)),
            unregistered_recipient_reward: Some(total.scale(OTHER_MODE_REWARD_SHARE)),
            ..ProfitAllocation::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_vendor_takes_three_quarters() {
        // R200.00 vendor purchase earns R150.00 profit.
        let allocation = allocate(
            Money::from_cents(20_000),
            ActorRole::Vendor,
            PurchaseMode::SelfPurchase,
        );
        assert_eq!(allocation.vendor_profit, Some(Money::from_cents(15_000)));
        assert_eq!(allocation.customer_cashback, None);
        assert_eq!(allocation.registered_customer_reward, None);
        assert_eq!(allocation.unregistered_recipient_reward, None);
    }

    #[test]
    fn test_allocate_vendor_ignores_mode() {
        let self_mode = allocate(
            Money::from_cents(20_000),
            ActorRole::Vendor,
            PurchaseMode::SelfPurchase,
        );
        let other_mode = allocate(
            Money::from_cents(20_000),
            ActorRole::Vendor,
            PurchaseMode::Other,
        );
        assert_eq!(self_mode, other_mode);
    }

    #[test]
    fn test_allocate_customer_self_half_cashback() {
        // R100.00 self purchase earns R50.00 cashback.
        let allocation = allocate(
            Money::from_cents(10_000),
            ActorRole::Customer,
            PurchaseMode::SelfPurchase,
        );
        assert_eq!(allocation.customer_cashback, Some(Money::from_cents(5_000)));
        assert_eq!(allocation.vendor_profit, None);
    }

    #[test]
    fn test_allocate_other_mode_pays_both_full_half() {
        // Regression: both rewards are 50% of total simultaneously, so the
        // combined payout equals the full price. Stated platform economics,
        // not a rounding artifact.
        let allocation = allocate(
            Money::from_cents(10_000),
            ActorRole::Customer,
            PurchaseMode::Other,
        );
        assert_eq!(
            allocation.registered_customer_reward,
            Some(Money::from_cents(5_000))
        );
        assert_eq!(
            allocation.unregistered_recipient_reward,
            Some(Money::from_cents(5_000))
        );
        assert_eq!(
            allocation.platform_margin(Money::from_cents(10_000)),
            Money::ZERO
        );
    }

    #[test]
    fn test_allocate_is_idempotent() {
        let total = Money::from_cents(12_345);
        let first = allocate(total, ActorRole::Customer, PurchaseMode::Other);
        let second = allocate(total, ActorRole::Customer, PurchaseMode::Other);
        assert_eq!(first, second);
    }

    #[test]
    fn test_allocate_rounds_half_up() {
        // R123.45 * 0.75 = R92.5875 -> R92.59
        let allocation = allocate(
            Money::from_cents(12_345),
            ActorRole::Vendor,
            PurchaseMode::SelfPurchase,
        );
        assert_eq!(allocation.vendor_profit, Some(Money::from_cents(9_259)));
    }

    #[test]
    fn test_allocate_never_negative_and_reconciles() {
        let totals = [0, 1, 3, 99, 10_000, 12_345, 999_999];
        let combos = [
            (ActorRole::Vendor, PurchaseMode::SelfPurchase),
            (ActorRole::Vendor, PurchaseMode::Other),
            (ActorRole::Customer, PurchaseMode::SelfPurchase),
            (ActorRole::Customer, PurchaseMode::Other),
        ];

        for cents in totals {
            let total = Money::from_cents(cents);
            for (role, mode) in combos {
                let allocation = allocate(total, role, mode);
                for share in [
                    allocation.vendor_profit,
                    allocation.customer_cashback,
                    allocation.registered_customer_reward,
                    allocation.unregistered_recipient_reward,
                ]
                .into_iter()
                .flatten()
                {
                    assert!(!share.is_negative(), "{role:?}/{mode:?} at {total}");
                }
                // Shares plus the implicit platform margin always equal the
                // total exactly.
                assert_eq!(
                    allocation.allocated_total() + allocation.platform_margin(total),
                    total
                );
            }
        }
    }

    #[test]
    fn test_residual_cent_lands_in_platform_margin() {
        // R0.01 in other mode: each 50% share rounds half-up to R0.01, so
        // the margin absorbs the overshoot (-R0.01) rather than any share.
        let total = Money::from_cents(1);
        let allocation = allocate(total, ActorRole::Customer, PurchaseMode::Other);
        assert_eq!(
            allocation.registered_customer_reward,
            Some(Money::from_cents(1))
        );
        assert_eq!(
            allocation.unregistered_recipient_reward,
            Some(Money::from_cents(1))
        );
        assert_eq!(allocation.platform_margin(total), Money::from_cents(-1));
    }

    #[test]
    fn test_zero_total() {
        let allocation = allocate(
            Money::ZERO,
            ActorRole::Customer,
            PurchaseMode::SelfPurchase,
        );
        assert_eq!(allocation.customer_cashback, Some(Money::ZERO));
        assert_eq!(allocation.platform_margin(Money::ZERO), Money::ZERO);
    }
}
