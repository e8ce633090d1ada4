//! Discount-rate equivalences and present values
//!
//! Supports:
//! - Compound interest rate `i` to its equivalent discount rate `d`
//! - The inverse, which is undefined once `d >= 1`
//! - Rational (compound) and commercial (simple) present values

use serde::{Deserialize, Serialize};

/// Discount rate equivalent to a periodic interest rate: `d = i / (1 + i)`
///
/// Falls back to 0 when `1 + i == 0`.
pub fn discount_from_rate(rate: f64) -> f64 {
    if 1.0 + rate == 0.0 {
        return 0.0;
    }
    rate / (1.0 + rate)
}

/// Interest rate recovered from a discount rate: `i = d / (1 - d)`
///
/// Returns `None` when `d >= 1`, where the inverse is undefined.
pub fn rate_from_discount(discount: f64) -> Option<f64> {
    if discount < 1.0 {
        Some(discount / (1.0 - discount))
    } else {
        None
    }
}

/// Results of the discount calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountEquivalences {
    /// Discount rate equivalent to the interest rate
    pub discount_rate: f64,

    /// Interest rate recovered from `discount_rate` (None if undefined)
    pub rate_from_discount: Option<f64>,

    /// `FV / (1 + i)^n`
    pub rational_present_value: f64,

    /// `FV * (1 - d_s * n)`
    pub commercial_present_value: f64,

    /// Whether `d_s * n < 1`, outside of which the commercial value is meaningless
    pub commercial_valid: bool,
}

/// Compute every discount magnitude the calculator reports
pub fn discount_equivalences(
    rate: f64,
    future_value: f64,
    periods: u32,
    simple_discount_rate: f64,
) -> DiscountEquivalences {
    let d = discount_from_rate(rate);
    let n = periods as f64;

    DiscountEquivalences {
        discount_rate: d,
        rate_from_discount: rate_from_discount(d),
        rational_present_value: future_value / (1.0 + rate).powi(periods as i32),
        commercial_present_value: future_value * (1.0 - simple_discount_rate * n),
        commercial_valid: simple_discount_rate * n < 1.0,
    }
}
