//! MatFin - financial-mathematics calculator for banking-law education
//!
//! This library provides:
//! - Amortization schedules under the French, German and American systems
//! - Loan recalculation after a partial prepayment
//! - Nominal/effective rate conversion and discount equivalences
//! - Partial-payment allocation between interest and principal
//! - Simple/compound interest and inflation-index updating
//!
//! Every calculation is a pure function of its inputs.

pub mod allocation;
pub mod amortization;
pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod indexation;
pub mod interest;
pub mod prepayment;
pub mod rates;

// Re-export commonly used types
pub use allocation::{allocate, allocate_with_order, Allocation, AllocationOrder};
pub use amortization::{
    build_schedule, compute_installment, AmortizationMethod, AmortizationSchedule, PeriodRecord,
    ScheduleBuilder, ScheduleCache,
};
pub use config::{CalculatorConfig, RateFormat, RateInput};
pub use error::{CalcError, Result};
pub use prepayment::{
    PrepaymentEvent, PrepaymentRecalculator, RecalculationConfig, RecalculationResult, ReducedTerm,
};
pub use rates::{effective_to_nominal, nominal_to_effective, RateConversion};
