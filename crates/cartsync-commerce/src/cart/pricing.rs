//! Cart totals and the shipping policy.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Default flat shipping cost in Toman.
pub const DEFAULT_FLAT_SHIPPING_COST: u64 = 70_000;

/// Default subtotal from which shipping is free, in Toman.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: u64 = 500_000;

/// Flat shipping fee, waived once the subtotal reaches a threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Fee charged below the threshold.
    pub flat_shipping_cost: u64,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: u64,
}

impl ShippingPolicy {
    pub fn new(flat_shipping_cost: u64, free_shipping_threshold: u64) -> Self {
        Self {
            flat_shipping_cost,
            free_shipping_threshold,
        }
    }

    /// Shipping fee for a given subtotal.
    pub fn fee_for(&self, subtotal: u64) -> u64 {
        if subtotal >= self.free_shipping_threshold {
            0
        } else {
            self.flat_shipping_cost
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FLAT_SHIPPING_COST, DEFAULT_FREE_SHIPPING_THRESHOLD)
    }
}

/// Derived totals for a cart. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of line totals.
    pub subtotal: u64,
    /// Shipping fee under the policy.
    pub shipping_fee: u64,
    /// Subtotal plus shipping.
    pub total: u64,
}

impl CartTotals {
    /// Compute totals for a subtotal under a policy.
    pub fn compute(subtotal: u64, policy: &ShippingPolicy) -> Self {
        let shipping_fee = policy.fee_for(subtotal);
        Self {
            subtotal,
            shipping_fee,
            total: subtotal.saturating_add(shipping_fee),
        }
    }

    /// Check if shipping was waived.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping_fee == 0
    }

    /// Subtotal as money in a display currency.
    pub fn subtotal_money(&self, currency: Currency) -> Money {
        Money::new(self.subtotal, currency)
    }

    /// Shipping fee as money in a display currency.
    pub fn shipping_money(&self, currency: Currency) -> Money {
        Money::new(self.shipping_fee, currency)
    }

    /// Total as money in a display currency.
    pub fn total_money(&self, currency: Currency) -> Money {
        Money::new(self.total, currency)
    }
}
