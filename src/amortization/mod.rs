//! Amortization engine: installment formula and schedule builders

mod cache;
mod engine;
mod schedule;

pub use cache::{ScheduleCache, ScheduleKey};
pub use engine::{
    build_schedule, compute_installment, AmericanBuilder, AmortizationMethod, FrenchBuilder,
    GermanBuilder, ScheduleBuilder, DEFAULT_ROUNDING_DECIMALS, MAX_ROUNDING_DECIMALS,
};
pub use schedule::{AmortizationSchedule, PeriodRecord, ScheduleSummary, SCHEDULE_COLUMNS};
