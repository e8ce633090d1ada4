//! Allocation of a partial payment between accrued interest and principal
//!
//! Interest accrues simply (`C * i * n`, no capitalisation). Absent an
//! agreement to the contrary the payment settles interest first.

use serde::{Deserialize, Serialize};

/// Which debt component a partial payment settles first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AllocationOrder {
    #[default]
    InterestFirst,
    PrincipalFirst,
}

/// How a partial payment was applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub accrued_interest: f64,
    pub interest_portion: f64,
    pub principal_portion: f64,
    pub remaining_interest: f64,
    pub remaining_principal: f64,
    /// Part of the payment exceeding the whole debt under principal-first
    pub unapplied: f64,
    pub order: AllocationOrder,
}

/// Simple interest accrued on `base_capital` over `elapsed_periods`
pub fn accrued_simple_interest(base_capital: f64, periodic_rate: f64, elapsed_periods: u32) -> f64 {
    base_capital * periodic_rate * elapsed_periods as f64
}

/// Allocate a payment interest-first
pub fn allocate(
    base_capital: f64,
    periodic_rate: f64,
    elapsed_periods: u32,
    payment_amount: f64,
) -> Allocation {
    allocate_with_order(
        base_capital,
        periodic_rate,
        elapsed_periods,
        payment_amount,
        AllocationOrder::InterestFirst,
    )
}

/// Allocate a payment in the given order
pub fn allocate_with_order(
    base_capital: f64,
    periodic_rate: f64,
    elapsed_periods: u32,
    payment_amount: f64,
    order: AllocationOrder,
) -> Allocation {
    let accrued_interest = accrued_simple_interest(base_capital, periodic_rate, elapsed_periods);

    let (interest_portion, principal_portion, unapplied) = match order {
        // Any excess over the interest reduces principal, uncapped
        AllocationOrder::InterestFirst => (
            payment_amount.min(accrued_interest),
            (payment_amount - accrued_interest).max(0.0),
            0.0,
        ),
        AllocationOrder::PrincipalFirst => {
            let principal = payment_amount.min(base_capital).max(0.0);
            let rest = payment_amount - principal;
            let interest = rest.min(accrued_interest).max(0.0);
            (interest, principal, (rest - interest).max(0.0))
        }
    };

    Allocation {
        accrued_interest,
        interest_portion,
        principal_portion,
        remaining_interest: (accrued_interest - interest_portion).max(0.0),
        remaining_principal: (base_capital - principal_portion).max(0.0),
        unapplied,
        order,
    }
}
