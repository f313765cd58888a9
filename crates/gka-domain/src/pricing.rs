//! Order total computation.
//!
//! `total_amount == subtotal + shipping_cost - discount` always holds for a value
//! produced by [`OrderTotals::compute`]. Amounts are rupees rounded to paise.

use serde::{Deserialize, Serialize};

use crate::order::PaymentMethod;

/// Flat shipping for prepaid orders.
pub const SHIPPING_PREPAID: f64 = 50.0;

/// Shipping for cash-on-delivery orders; includes [`COD_CHARGES`].
pub const SHIPPING_COD: f64 = 75.0;

/// Cash-handling surcharge reported separately for COD orders.
pub const COD_CHARGES: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub cod_charges: f64,
    pub discount: f64,
    pub total_amount: f64,
}

impl OrderTotals {
    /// Compute totals from `(unit_price, qty)` pairs.
    ///
    /// `discount` is clamped to `0..=subtotal + shipping_cost` so the total is
    /// never negative.
    pub fn compute<I>(lines: I, method: PaymentMethod, discount: f64) -> Self
    where
        I: IntoIterator<Item = (f64, u32)>,
    {
        let subtotal = round2(
            lines
                .into_iter()
                .map(|(price, qty)| price * f64::from(qty))
                .sum(),
        );
        let (shipping_cost, cod_charges) = match method {
            PaymentMethod::Cod => (SHIPPING_COD, COD_CHARGES),
            PaymentMethod::Cashfree => (SHIPPING_PREPAID, 0.0),
        };
        let gross = subtotal + shipping_cost;
        let discount = if discount.is_finite() {
            round2(discount.clamp(0.0, gross))
        } else {
            0.0
        };
        Self {
            subtotal,
            shipping_cost,
            cod_charges,
            discount,
            total_amount: round2(gross - discount),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
