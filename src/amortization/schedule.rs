//! Schedule output structures for amortization tables

use serde::{Deserialize, Serialize};

use super::AmortizationMethod;
use crate::error::{CalcError, Result};

/// Column names of an exported schedule, in order
pub const SCHEDULE_COLUMNS: [&str; 6] = [
    "Period",
    "Opening Balance",
    "Interest",
    "Amortization",
    "Installment",
    "Closing Balance",
];

/// A single row of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based period index
    pub period: u32,
    pub opening_balance: f64,
    pub interest: f64,
    /// Principal repaid this period
    pub amortization: f64,
    /// Interest + amortization
    pub installment: f64,
    /// Clamped at zero
    pub closing_balance: f64,
}

/// Complete schedule for one (principal, rate, term, method) tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub method: AmortizationMethod,
    pub principal: f64,
    pub periodic_rate: f64,
    pub term: u32,
    records: Vec<PeriodRecord>,
}

impl AmortizationSchedule {
    pub(crate) fn new(
        method: AmortizationMethod,
        principal: f64,
        periodic_rate: f64,
        term: u32,
        records: Vec<PeriodRecord>,
    ) -> Self {
        Self {
            method,
            principal,
            periodic_rate,
            term,
            records,
        }
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the row carrying a given period index
    pub fn period(&self, period: u32) -> Option<&PeriodRecord> {
        self.records.iter().find(|r| r.period == period)
    }

    /// Closing balance at `period`, failing if the period is not in the schedule
    pub fn closing_balance_at(&self, period: u32) -> Result<f64> {
        self.period(period)
            .map(|r| r.closing_balance)
            .ok_or(CalcError::PeriodNotFound {
                period,
                term: self.term,
            })
    }

    /// Same rows renumbered so the first period follows `offset`
    ///
    /// Used to splice a recalculated tail onto an original schedule.
    pub fn with_period_offset(mut self, offset: u32) -> Self {
        for record in &mut self.records {
            record.period += offset;
        }
        self
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_interest: f64 = self.records.iter().map(|r| r.interest).sum();
        let total_amortization: f64 = self.records.iter().map(|r| r.amortization).sum();
        let total_paid: f64 = self.records.iter().map(|r| r.installment).sum();

        let first_installment = self.records.first().map(|r| r.installment).unwrap_or(0.0);
        let last_installment = self.records.last().map(|r| r.installment).unwrap_or(0.0);
        let final_balance = self.records.last().map(|r| r.closing_balance).unwrap_or(0.0);

        ScheduleSummary {
            periods: self.records.len() as u32,
            first_installment,
            last_installment,
            total_interest,
            total_amortization,
            total_paid,
            final_balance,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub periods: u32,
    pub first_installment: f64,
    pub last_installment: f64,
    pub total_interest: f64,
    pub total_amortization: f64,
    pub total_paid: f64,
    pub final_balance: f64,
}
