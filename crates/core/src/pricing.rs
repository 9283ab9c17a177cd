//! Delivery fee and order totals.
//!
//! Orders at or above [`FREE_DELIVERY_THRESHOLD`] ship free; everything else
//! pays a flat [`STANDARD_DELIVERY_FEE`]. Amounts are in Kenyan shillings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subtotal (KES) from which delivery is free.
pub const FREE_DELIVERY_THRESHOLD: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Flat delivery fee (KES) below the threshold.
pub const STANDARD_DELIVERY_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Delivery fee for an order with this subtotal.
#[must_use]
pub fn delivery_fee(subtotal: Decimal) -> Decimal {
    if subtotal >= FREE_DELIVERY_THRESHOLD {
        Decimal::ZERO
    } else {
        STANDARD_DELIVERY_FEE
    }
}

/// Subtotal, delivery fee and grand total for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let delivery_fee = delivery_fee(subtotal);
        Self {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }

    #[must_use]
    pub fn free_delivery(&self) -> bool {
        self.delivery_fee.is_zero()
    }

    /// How much more the customer must spend to ship free; zero once
    /// delivery is already free.
    #[must_use]
    pub fn amount_to_free_delivery(&self) -> Decimal {
        (FREE_DELIVERY_THRESHOLD - self.subtotal).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_below_threshold() {
        let totals = OrderTotals::from_subtotal(Decimal::from(9_999));
        assert_eq!(totals.delivery_fee, Decimal::from(500));
        assert_eq!(totals.total, Decimal::from(10_499));
        assert!(!totals.free_delivery());
        assert_eq!(totals.amount_to_free_delivery(), Decimal::ONE);
    }

    #[test]
    fn test_free_at_threshold() {
        let totals = OrderTotals::from_subtotal(Decimal::from(10_000));
        assert_eq!(totals.delivery_fee, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from(10_000));
        assert!(totals.free_delivery());
        assert_eq!(totals.amount_to_free_delivery(), Decimal::ZERO);
    }

    #[test]
    fn test_fractional_subtotal() {
        let subtotal = Decimal::new(2_550_50, 2);
        let totals = OrderTotals::from_subtotal(subtotal);
        assert_eq!(totals.total, Decimal::new(3_050_50, 2));
    }

    #[test]
    fn test_empty_cart_still_charges_delivery() {
        assert_eq!(delivery_fee(Decimal::ZERO), STANDARD_DELIVERY_FEE);
    }
}
