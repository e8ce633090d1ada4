//! Loan recalculation after a partial prepayment
//!
//! Given a French schedule and a prepayment made at period `t`, two
//! alternative plans are computed side by side:
//! - **Reduced term**: keep the original installment, shorten the loan
//! - **Fixed term**: keep the remaining periods, lower the installment
//!
//! The caller decides which one to present.

use serde::{Deserialize, Serialize};

use crate::amortization::{
    compute_installment, AmortizationMethod, AmortizationSchedule, ScheduleBuilder, FrenchBuilder,
    DEFAULT_ROUNDING_DECIMALS,
};
use crate::error::{validate_amount, CalcError, Result, MAX_PERIODS};

/// Tuning for the reduced-term search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecalculationConfig {
    /// Largest term tried when holding the installment fixed
    pub max_term_search: u32,

    /// Slack allowed above the original installment
    pub installment_tolerance: f64,
}

impl Default for RecalculationConfig {
    fn default() -> Self {
        Self {
            max_term_search: MAX_PERIODS,
            installment_tolerance: 0.01,
        }
    }
}

/// A prepayment against a French loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentEvent {
    pub principal: f64,
    pub periodic_rate: f64,
    pub original_term: u32,
    /// Period after whose installment the prepayment is made (1-based)
    pub prepayment_period: u32,
    pub prepayment_amount: f64,
}

/// Outcome of holding the installment fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReducedTerm {
    /// Smallest number of periods whose installment fits under the original one
    Periods(u32),
    /// Nothing left to repay after the prepayment
    FullyPrepaid,
    /// No term within the search bound fits
    NotFound,
}

impl ReducedTerm {
    /// Single-number encoding in which both fallbacks collapse to 0
    pub fn legacy_value(&self) -> u32 {
        match self {
            ReducedTerm::Periods(n) => *n,
            ReducedTerm::FullyPrepaid | ReducedTerm::NotFound => 0,
        }
    }
}

/// Both recalculated plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalculationResult {
    /// Closing balance of the original schedule at the prepayment period
    pub balance_at_prepayment: f64,

    /// Balance left once the prepayment is applied (never negative)
    pub balance_after_prepayment: f64,

    pub original_installment: f64,

    /// Periods left on the original plan after the prepayment period
    pub remaining_term: u32,

    /// New installment keeping `remaining_term`; 0 when no periods remain
    pub fixed_term_installment: f64,

    /// New term keeping `original_installment`
    pub reduced_term: ReducedTerm,

    /// Fixed-term plan numbered from `prepayment_period + 1`
    pub revised_schedule: Option<AmortizationSchedule>,
}

/// Recomputes French loans after a prepayment
#[derive(Debug, Clone)]
pub struct PrepaymentRecalculator {
    config: RecalculationConfig,
    rounding_decimals: u32,
}

impl Default for PrepaymentRecalculator {
    fn default() -> Self {
        Self::new(RecalculationConfig::default(), DEFAULT_ROUNDING_DECIMALS)
    }
}

impl PrepaymentRecalculator {
    /// `rounding_decimals` is the balance rounding used for plain schedules,
    /// so original and revised plans round the same way.
    pub fn new(config: RecalculationConfig, rounding_decimals: u32) -> Self {
        Self {
            config,
            rounding_decimals,
        }
    }

    pub fn config(&self) -> &RecalculationConfig {
        &self.config
    }

    pub fn rounding_decimals(&self) -> u32 {
        self.rounding_decimals
    }

    /// Build the original French schedule for the event and recalculate it
    pub fn recalculate(&self, event: &PrepaymentEvent) -> Result<RecalculationResult> {
        let schedule = FrenchBuilder {
            rounding_decimals: self.rounding_decimals,
        }
        .build(event.principal, event.periodic_rate, event.original_term);

        self.recalculate_schedule(&schedule, event.prepayment_period, event.prepayment_amount)
    }

    /// Recalculate an existing French schedule for a prepayment at `period`
    pub fn recalculate_schedule(
        &self,
        schedule: &AmortizationSchedule,
        period: u32,
        amount: f64,
    ) -> Result<RecalculationResult> {
        if schedule.method != AmortizationMethod::French {
            return Err(CalcError::invalid(
                "schedule",
                format!("prepayment recalculation needs a french schedule, got {}", schedule.method),
            ));
        }
        validate_amount("prepayment_amount", amount)?;

        let balance_at_prepayment = schedule.closing_balance_at(period).map_err(|e| {
            log::warn!("prepayment period {} outside {}-period schedule", period, schedule.term);
            e
        })?;
        let balance_after_prepayment = (balance_at_prepayment - amount).max(0.0);

        let rate = schedule.periodic_rate;
        let original_installment = compute_installment(schedule.principal, rate, schedule.term);

        let reduced_term = self.reduced_term(balance_after_prepayment, rate, original_installment);

        let remaining_term = schedule.term.saturating_sub(period);
        let (fixed_term_installment, revised_schedule) = if remaining_term > 0 {
            let revised = FrenchBuilder {
                rounding_decimals: self.rounding_decimals,
            }
            .build(balance_after_prepayment, rate, remaining_term)
            .with_period_offset(period);
            (
                compute_installment(balance_after_prepayment, rate, remaining_term),
                Some(revised),
            )
        } else {
            (0.0, None)
        };

        log::debug!(
            "prepayment {:.2} at t={}: balance {:.2} -> {:.2}, installment {:.2} -> {:.2}, reduced term {:?}",
            amount,
            period,
            balance_at_prepayment,
            balance_after_prepayment,
            original_installment,
            fixed_term_installment,
            reduced_term
        );

        Ok(RecalculationResult {
            balance_at_prepayment,
            balance_after_prepayment,
            original_installment,
            remaining_term,
            fixed_term_installment,
            reduced_term,
            revised_schedule,
        })
    }

    /// Linear scan for the first term whose installment fits the ceiling
    ///
    /// The installment is monotone decreasing in the term, so the first hit
    /// is the minimum. A closed-form inverse is avoided because the fixed
    /// tolerance makes it unreliable right at the boundary.
    fn reduced_term(&self, balance: f64, rate: f64, original_installment: f64) -> ReducedTerm {
        if balance <= 0.0 {
            return ReducedTerm::FullyPrepaid;
        }
        if original_installment <= 0.0 {
            return ReducedTerm::NotFound;
        }

        let ceiling = original_installment + self.config.installment_tolerance;
        let found = (1..=self.config.max_term_search)
            .find(|&n| compute_installment(balance, rate, n) <= ceiling);

        match found {
            Some(n) => ReducedTerm::Periods(n),
            None => {
                log::warn!(
                    "no term up to {} keeps installment {:.2} for balance {:.2}",
                    self.config.max_term_search,
                    original_installment,
                    balance
                );
                ReducedTerm::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::build_schedule;
    use approx::assert_abs_diff_eq;

    fn reference_event() -> PrepaymentEvent {
        PrepaymentEvent {
            principal: 1_000_000.0,
            periodic_rate: 0.02,
            original_term: 60,
            prepayment_period: 18,
            prepayment_amount: 200_000.0,
        }
    }

    #[test]
    fn test_reference_prepayment() {
        let result = PrepaymentRecalculator::default()
            .recalculate(&reference_event())
            .unwrap();

        assert_abs_diff_eq!(result.original_installment, 28_767.97, epsilon = 0.005);
        assert_abs_diff_eq!(result.balance_at_prepayment, 812_257.57, epsilon = 0.05);
        assert_abs_diff_eq!(
            result.balance_after_prepayment,
            result.balance_at_prepayment - 200_000.0,
            epsilon = 1e-9
        );
        assert_eq!(result.remaining_term, 42);
        assert_abs_diff_eq!(result.fixed_term_installment, 21_684.51, epsilon = 0.05);
        assert_eq!(result.reduced_term, ReducedTerm::Periods(29));
    }

    #[test]
    fn test_reduced_term_is_minimal() {
        let result = PrepaymentRecalculator::default()
            .recalculate(&reference_event())
            .unwrap();

        let n = result.reduced_term.legacy_value();
        let ceiling = result.original_installment + 0.01;
        assert!(compute_installment(result.balance_after_prepayment, 0.02, n) <= ceiling);
        assert!(compute_installment(result.balance_after_prepayment, 0.02, n - 1) > ceiling);
    }

    #[test]
    fn test_revised_schedule_continues_numbering() {
        let result = PrepaymentRecalculator::default()
            .recalculate(&reference_event())
            .unwrap();

        let revised = result.revised_schedule.unwrap();
        assert_eq!(revised.len(), 42);
        assert_eq!(revised.records()[0].period, 19);
        assert_eq!(revised.records()[41].period, 60);
        assert_eq!(revised.records()[0].opening_balance, result.balance_after_prepayment);
        assert_abs_diff_eq!(revised.summary().final_balance, 0.0, epsilon = 0.5);
    }

    #[test]
    fn test_prepayment_exceeding_balance() {
        let event = PrepaymentEvent {
            prepayment_amount: 5_000_000.0,
            ..reference_event()
        };
        let result = PrepaymentRecalculator::default().recalculate(&event).unwrap();

        assert_eq!(result.balance_after_prepayment, 0.0);
        assert_eq!(result.reduced_term, ReducedTerm::FullyPrepaid);
        assert_eq!(result.reduced_term.legacy_value(), 0);
        assert_eq!(result.fixed_term_installment, 0.0);
    }

    #[test]
    fn test_prepayment_in_final_period() {
        let event = PrepaymentEvent {
            prepayment_period: 60,
            prepayment_amount: 0.0,
            ..reference_event()
        };
        let result = PrepaymentRecalculator::default().recalculate(&event).unwrap();

        assert_eq!(result.remaining_term, 0);
        assert_eq!(result.fixed_term_installment, 0.0);
        assert!(result.revised_schedule.is_none());
    }

    #[test]
    fn test_search_exhausted() {
        let config = RecalculationConfig {
            max_term_search: 10,
            ..Default::default()
        };
        let result = PrepaymentRecalculator::new(config, DEFAULT_ROUNDING_DECIMALS)
            .recalculate(&reference_event())
            .unwrap();

        assert_eq!(result.reduced_term, ReducedTerm::NotFound);
        assert_eq!(result.reduced_term.legacy_value(), 0);
    }

    #[test]
    fn test_rounding_applies_to_both_plans() {
        let result = PrepaymentRecalculator::new(RecalculationConfig::default(), 0)
            .recalculate(&reference_event())
            .unwrap();

        assert_eq!(result.balance_at_prepayment, result.balance_at_prepayment.round());
        for r in result.revised_schedule.unwrap().records() {
            assert_eq!(r.closing_balance, r.closing_balance.round());
        }
    }

    #[test]
    fn test_period_outside_schedule() {
        let event = PrepaymentEvent {
            prepayment_period: 61,
            ..reference_event()
        };
        let err = PrepaymentRecalculator::default().recalculate(&event).unwrap_err();
        assert!(matches!(err, CalcError::PeriodNotFound { period: 61, term: 60 }));

        let event = PrepaymentEvent {
            prepayment_period: 0,
            ..reference_event()
        };
        assert!(PrepaymentRecalculator::default().recalculate(&event).is_err());
    }

    #[test]
    fn test_rejects_non_french_schedule() {
        let schedule = build_schedule(1_000.0, 0.02, 12, AmortizationMethod::German);
        let result = PrepaymentRecalculator::default().recalculate_schedule(&schedule, 3, 100.0);
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_rejects_negative_amount() {
        let schedule = build_schedule(1_000.0, 0.02, 12, AmortizationMethod::French);
        let result = PrepaymentRecalculator::default().recalculate_schedule(&schedule, 3, -1.0);
        assert!(result.is_err());
    }
}
