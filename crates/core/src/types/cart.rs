//! Cart contents: deals selected for purchase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::DealId;
use super::money::Money;

/// What kind of product a deal delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealType {
    Airtime,
    Data,
}

/// Errors constructing a [`CartItem`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CartError {
    /// Deals may be free but never carry a negative price.
    #[error("discounted price cannot be negative: {0}")]
    NegativePrice(Money),
}

/// A deal placed in the cart.
///
/// Items are immutable once created; the quantity of a deal is expressed by
/// adding it to the cart more than once. Items are destroyed on cart clear
/// or successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Identifier of the underlying deal.
    pub id: DealId,
    /// Carrier the deal applies to (e.g., "MTN").
    pub network: String,
    /// Airtime or data.
    pub deal_type: DealType,
    /// Face value of the deal: rands of airtime, or megabytes of data.
    pub amount: Decimal,
    /// Display name of the vendor offering the deal.
    pub vendor: String,
    /// Price the buyer actually pays.
    pub discounted_price: Money,
}

impl CartItem {
    /// Create a cart item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NegativePrice`] if `discounted_price` is below
    /// zero.
    pub fn new(
        id: DealId,
        network: impl Into<String>,
        deal_type: DealType,
        amount: Decimal,
        vendor: impl Into<String>,
        discounted_price: Money,
    ) -> Result<Self, CartError> {
        if discounted_price.is_negative() {
            return Err(CartError::NegativePrice(discounted_price));
        }

        Ok(Self {
            id,
            network: network.into(),
            deal_type,
            amount,
            vendor: vendor.into(),
            discounted_price,
        })
    }
}

/// The set of deals queued for a single checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a deal to the cart.
    pub fn add(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// The items currently in the cart.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of the discounted prices of every item.
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(|item| item.discounted_price).sum()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airtime(price_cents: i64) -> CartItem {
        CartItem::new(
            DealId::new(1),
            "MTN",
            DealType::Airtime,
            Decimal::new(100, 0),
            "Duma Deals",
            Money::from_cents(price_cents),
        )
        .unwrap()
    }

    #[test]
    fn test_cart_total_sums_discounted_prices() {
        let mut cart = Cart::new();
        cart.add(airtime(5_000));
        cart.add(airtime(2_550));
        assert_eq!(cart.total(), Money::from_cents(7_550));
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total(), Money::ZERO);
        assert!(Cart::new().is_empty());
    }

    #[test]
    fn test_clear_removes_items() {
        let mut cart = Cart::new();
        cart.add(airtime(1_000));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = CartItem::new(
            DealId::new(2),
            "Vodacom",
            DealType::Data,
            Decimal::new(1024, 0),
            "Duma Deals",
            Money::from_cents(-1),
        );
        assert!(matches!(result, Err(CartError::NegativePrice(_))));
    }

    #[test]
    fn test_free_deal_allowed() {
        let result = CartItem::new(
            DealId::new(3),
            "Rain",
            DealType::Data,
            Decimal::new(500, 0),
            "Duma Deals",
            Money::ZERO,
        );
        assert!(result.is_ok());
    }
}
