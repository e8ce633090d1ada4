//! Simple versus compound interest on a single capital

use serde::{Deserialize, Serialize};

/// Side-by-side simple and compound results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestComparison {
    pub simple_interest: f64,
    pub simple_future_value: f64,
    pub compound_interest: f64,
    pub compound_future_value: f64,
}

/// Future values after `x` periods under both regimes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub period: u32,
    pub simple: f64,
    pub compound: f64,
}

pub fn simple_and_compound(capital: f64, periodic_rate: f64, periods: u32) -> InterestComparison {
    let simple_interest = capital * periodic_rate * periods as f64;
    let compound_future_value = capital * (1.0 + periodic_rate).powi(periods as i32);

    InterestComparison {
        simple_interest,
        simple_future_value: capital + simple_interest,
        compound_interest: compound_future_value - capital,
        compound_future_value,
    }
}

/// Growth curves for periods 0..=periods
pub fn growth_series(capital: f64, periodic_rate: f64, periods: u32) -> Vec<GrowthPoint> {
    (0..=periods)
        .map(|x| GrowthPoint {
            period: x,
            simple: capital * (1.0 + periodic_rate * x as f64),
            compound: capital * (1.0 + periodic_rate).powi(x as i32),
        })
        .collect()
}
