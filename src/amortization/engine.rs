//! Schedule builders for the French, German and American systems

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::schedule::{AmortizationSchedule, PeriodRecord};
use crate::error::CalcError;

/// Balances are rounded to cents between periods
pub const DEFAULT_ROUNDING_DECIMALS: u32 = 2;

/// Finest balance rounding accepted from settings
pub const MAX_ROUNDING_DECIMALS: u32 = 12;

/// Amortization system used to split each installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationMethod {
    /// Equal installments
    French,
    /// Equal principal repayments
    German,
    /// Interest only, principal repaid in the final period
    American,
}

impl AmortizationMethod {
    pub const ALL: [AmortizationMethod; 3] = [
        AmortizationMethod::French,
        AmortizationMethod::German,
        AmortizationMethod::American,
    ];

    /// Builder implementing this method with the given balance rounding
    pub fn builder(self, rounding_decimals: u32) -> Box<dyn ScheduleBuilder> {
        match self {
            AmortizationMethod::French => Box::new(FrenchBuilder { rounding_decimals }),
            AmortizationMethod::German => Box::new(GermanBuilder { rounding_decimals }),
            AmortizationMethod::American => Box::new(AmericanBuilder),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AmortizationMethod::French => "french",
            AmortizationMethod::German => "german",
            AmortizationMethod::American => "american",
        }
    }
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmortizationMethod {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "french" | "frances" | "francés" => Ok(AmortizationMethod::French),
            "german" | "aleman" | "alemán" => Ok(AmortizationMethod::German),
            "american" | "americano" | "bullet" => Ok(AmortizationMethod::American),
            other => Err(CalcError::invalid(
                "method",
                format!("unknown amortization method: {}", other),
            )),
        }
    }
}

/// Produces a complete schedule for one amortization method
///
/// Implementations are stateless apart from their rounding setting, so a
/// builder can be shared across threads.
pub trait ScheduleBuilder: Send + Sync {
    fn method(&self) -> AmortizationMethod;

    /// Build the schedule for periods 1..=term. A zero term yields an empty schedule.
    fn build(&self, principal: f64, periodic_rate: f64, term: u32) -> AmortizationSchedule;
}

/// Level installment for a French schedule
///
/// Standard annuity formula `P * i(1+i)^n / ((1+i)^n - 1)`, `P / n` at a
/// zero rate, and 0 when `term == 0`.
pub fn compute_installment(principal: f64, periodic_rate: f64, term: u32) -> f64 {
    if term == 0 {
        return 0.0;
    }
    if periodic_rate == 0.0 {
        return principal / term as f64;
    }

    let growth = (1.0 + periodic_rate).powi(term as i32);
    principal * (periodic_rate * growth) / (growth - 1.0)
}

/// Build a schedule with the default cent rounding
pub fn build_schedule(
    principal: f64,
    periodic_rate: f64,
    term: u32,
    method: AmortizationMethod,
) -> AmortizationSchedule {
    method
        .builder(DEFAULT_ROUNDING_DECIMALS)
        .build(principal, periodic_rate, term)
}

/// Round on the exact decimal expansion of `value`, ties to even
///
/// Scaling by `10^d` first would itself round, turning values stored just
/// below a tie (617.255 is 617.25499...) into exact ties.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let decimals = decimals.min(MAX_ROUNDING_DECIMALS) as usize;
    format!("{:.*}", decimals, value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Equal-installment builder
///
/// The balance is rounded after every period and the rounded value feeds
/// the next period's interest, so the last closing balance can sit a few
/// cents away from zero.
#[derive(Debug, Clone, Copy)]
pub struct FrenchBuilder {
    pub rounding_decimals: u32,
}

impl ScheduleBuilder for FrenchBuilder {
    fn method(&self) -> AmortizationMethod {
        AmortizationMethod::French
    }

    fn build(&self, principal: f64, periodic_rate: f64, term: u32) -> AmortizationSchedule {
        let installment = compute_installment(principal, periodic_rate, term);
        let mut balance = principal;
        let mut records = Vec::with_capacity(term as usize);

        for period in 1..=term {
            let opening = balance;
            let interest = opening * periodic_rate;
            let amortization = installment - interest;
            balance = round_to(opening - amortization, self.rounding_decimals);

            records.push(PeriodRecord {
                period,
                opening_balance: opening.max(0.0),
                interest,
                amortization,
                installment,
                closing_balance: balance.max(0.0),
            });
        }

        log::debug!(
            "french schedule P={:.2} i={:.6} n={}: installment={:.2} final balance={:.2}",
            principal,
            periodic_rate,
            term,
            installment,
            balance
        );

        AmortizationSchedule::new(self.method(), principal, periodic_rate, term, records)
    }
}

/// Constant-amortization builder
#[derive(Debug, Clone, Copy)]
pub struct GermanBuilder {
    pub rounding_decimals: u32,
}

impl ScheduleBuilder for GermanBuilder {
    fn method(&self) -> AmortizationMethod {
        AmortizationMethod::German
    }

    fn build(&self, principal: f64, periodic_rate: f64, term: u32) -> AmortizationSchedule {
        let amortization = if term == 0 { 0.0 } else { principal / term as f64 };
        let mut balance = principal;
        let mut records = Vec::with_capacity(term as usize);

        for period in 1..=term {
            let opening = balance;
            let interest = opening * periodic_rate;
            let installment = interest + amortization;
            balance = round_to(opening - amortization, self.rounding_decimals);

            records.push(PeriodRecord {
                period,
                opening_balance: opening.max(0.0),
                interest,
                amortization,
                installment,
                closing_balance: balance.max(0.0),
            });
        }

        log::debug!(
            "german schedule P={:.2} i={:.6} n={}: amortization={:.2} final balance={:.2}",
            principal,
            periodic_rate,
            term,
            amortization,
            balance
        );

        AmortizationSchedule::new(self.method(), principal, periodic_rate, term, records)
    }
}

/// Bullet builder: interest every period, principal at maturity
#[derive(Debug, Clone, Copy)]
pub struct AmericanBuilder;

impl ScheduleBuilder for AmericanBuilder {
    fn method(&self) -> AmortizationMethod {
        AmortizationMethod::American
    }

    fn build(&self, principal: f64, periodic_rate: f64, term: u32) -> AmortizationSchedule {
        let interest = principal * periodic_rate;

        let records = (1..=term)
            .map(|period| {
                let last = period == term;
                let amortization = if last { principal } else { 0.0 };
                PeriodRecord {
                    period,
                    opening_balance: principal,
                    interest,
                    amortization,
                    installment: interest + amortization,
                    closing_balance: if last { 0.0 } else { principal },
                }
            })
            .collect();

        AmortizationSchedule::new(self.method(), principal, periodic_rate, term, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_installment_reference_value() {
        let a = compute_installment(100_000.0, 0.02, 12);
        assert_abs_diff_eq!(a, 9455.96, epsilon = 0.005);
    }

    #[test]
    fn test_installment_edge_cases() {
        assert_eq!(compute_installment(1_200.0, 0.0, 12), 100.0);
        assert_eq!(compute_installment(1_200.0, 0.05, 0), 0.0);
        assert_eq!(compute_installment(0.0, 0.05, 12), 0.0);
        // One period repays principal plus one period of interest
        assert_abs_diff_eq!(compute_installment(1_000.0, 0.05, 1), 1_050.0, epsilon = 1e-9);
    }

    #[test]
    fn test_french_schedule() {
        let schedule = build_schedule(100_000.0, 0.02, 12, AmortizationMethod::French);
        assert_eq!(schedule.len(), 12);

        let first = schedule.records()[0];
        assert_eq!(first.period, 1);
        assert_eq!(first.opening_balance, 100_000.0);
        assert_abs_diff_eq!(first.interest, 2_000.0, epsilon = 1e-9);
        assert_eq!(first.closing_balance, 92_544.04);

        let last = schedule.records()[11];
        assert_abs_diff_eq!(last.closing_balance, 0.0, epsilon = 0.12);

        // Every row pays the same installment and balances chain
        for pair in schedule.records().windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
            assert_eq!(pair[1].installment, pair[0].installment);
        }

        let total_amortization: f64 = schedule.records().iter().map(|r| r.amortization).sum();
        assert_abs_diff_eq!(total_amortization, 100_000.0, epsilon = 0.12);
    }

    #[test]
    fn test_french_zero_rate() {
        let schedule = build_schedule(1_200.0, 0.0, 12, AmortizationMethod::French);
        for r in schedule.records() {
            assert_eq!(r.interest, 0.0);
            assert_abs_diff_eq!(r.amortization, 100.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(schedule.summary().final_balance, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_german_schedule() {
        let schedule = build_schedule(100_000.0, 0.02, 12, AmortizationMethod::German);
        let fixed = 100_000.0 / 12.0;

        for r in schedule.records() {
            assert_eq!(r.amortization, fixed);
            assert_abs_diff_eq!(r.installment, r.interest + r.amortization, epsilon = 1e-9);
        }

        // Installments decline as the balance falls
        for pair in schedule.records().windows(2) {
            assert!(pair[1].installment < pair[0].installment);
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }

        assert_abs_diff_eq!(schedule.records()[0].interest, 2_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.summary().final_balance, 0.0, epsilon = 0.12);
    }

    #[test]
    fn test_american_schedule() {
        let schedule = build_schedule(50_000.0, 0.03, 6, AmortizationMethod::American);

        for r in &schedule.records()[..5] {
            assert_eq!(r.amortization, 0.0);
            assert_eq!(r.closing_balance, 50_000.0);
            assert_abs_diff_eq!(r.interest, 1_500.0, epsilon = 1e-9);
            assert_eq!(r.installment, r.interest);
        }

        let last = schedule.records()[5];
        assert_eq!(last.amortization, 50_000.0);
        assert_abs_diff_eq!(last.installment, 51_500.0, epsilon = 1e-9);
        assert_eq!(last.closing_balance, 0.0);
    }

    #[test]
    fn test_zero_term_is_empty() {
        for method in AmortizationMethod::ALL {
            assert!(build_schedule(1_000.0, 0.02, 0, method).is_empty());
        }
    }

    #[test]
    fn test_builder_dispatch() {
        for method in AmortizationMethod::ALL {
            let builder = method.builder(DEFAULT_ROUNDING_DECIMALS);
            assert_eq!(builder.method(), method);
            assert_eq!(builder.build(1_000.0, 0.01, 3).method, method);
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("French".parse::<AmortizationMethod>().unwrap(), AmortizationMethod::French);
        assert_eq!("alemán".parse::<AmortizationMethod>().unwrap(), AmortizationMethod::German);
        assert_eq!("bullet".parse::<AmortizationMethod>().unwrap(), AmortizationMethod::American);
        assert!("balloon".parse::<AmortizationMethod>().is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(92_544.040_337, 2), 92_544.04);
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(1.234_56, 0), 1.0);
    }

    #[test]
    fn test_round_to_uses_stored_value() {
        // Stored just below the tie
        assert_eq!(round_to(617.255, 2), 617.25);
        assert_eq!(round_to(2.675, 2), 2.67);
        // Exact ties go to even
        assert_eq!(round_to(1_131.625, 2), 1_131.62);
        assert_eq!(round_to(925.875, 2), 925.88);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_round_to_large_decimals() {
        assert_eq!(round_to(1.5, u32::MAX), 1.5);
        assert!(round_to(1_234.567_891, 40).is_finite());
    }

    #[test]
    fn test_german_balances_match_reference() {
        let schedule = build_schedule(1_234.5, 0.02, 4, AmortizationMethod::German);
        let closing: Vec<f64> = schedule.records().iter().map(|r| r.closing_balance).collect();
        assert_eq!(closing, vec![925.88, 617.25, 308.62, 0.0]);
    }

    #[test]
    fn test_french_balances_match_reference() {
        let schedule = build_schedule(1_234.5, 0.0, 12, AmortizationMethod::French);
        let closing: Vec<f64> = schedule.records().iter().map(|r| r.closing_balance).collect();
        assert_eq!(
            closing,
            vec![
                1_131.62, 1_028.74, 925.87, 823.0, 720.12, 617.25, 514.38, 411.5, 308.62, 205.75,
                102.88, 0.0
            ]
        );

        let schedule = build_schedule(100_000.0, 0.02, 12, AmortizationMethod::French);
        let closing: Vec<f64> = schedule.records().iter().map(|r| r.closing_balance).collect();
        assert_eq!(
            closing,
            vec![
                92_544.04, 84_938.96, 77_181.78, 69_269.46, 61_198.89, 52_966.91, 44_570.29,
                36_005.74, 27_269.9, 18_359.34, 9_270.57, 0.02
            ]
        );
    }
}
