//! Core types for Duma Mobile.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod allocation;
pub mod cart;
pub mod id;
pub mod money;
pub mod msisdn;

pub use allocation::{ActorRole, ProfitAllocation, PurchaseMode};
pub use cart::{Cart, CartError, CartItem, DealType};
pub use id::*;
pub use money::Money;
pub use msisdn::{Msisdn, MsisdnError, normalize_digits};
