//! Updating a capital by an accumulated price index plus a pure rate

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexedUpdate {
    pub base_capital: f64,
    /// Multiplicative index accumulated over the period (1.5 = +50%)
    pub accumulated_index: f64,
    pub updated_capital: f64,
    /// Simple interest at the pure rate on the updated capital
    pub pure_interest: f64,
    pub total: f64,
}

pub fn update(
    base_capital: f64,
    periods: u32,
    accumulated_index: f64,
    pure_rate: f64,
) -> IndexedUpdate {
    let updated_capital = base_capital * accumulated_index;
    let pure_interest = updated_capital * pure_rate * periods as f64;

    IndexedUpdate {
        base_capital,
        accumulated_index,
        updated_capital,
        pure_interest,
        total: updated_capital + pure_interest,
    }
}
