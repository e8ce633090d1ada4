//! Interest-rate equivalences
//!
//! - Nominal annual (TNA) to effective annual (TEA) and back, for a given
//!   number of compoundings per year
//! - Interest rate to discount rate and back, plus present values

mod conversion;
mod discount;

pub use conversion::{
    approximate_total_cost, convert, effective_to_nominal, nominal_to_effective, ChargeBreakdown,
    RateConversion, RateQuote, COMPOUNDING_BASES,
};
pub use discount::{
    discount_equivalences, discount_from_rate, rate_from_discount, DiscountEquivalences,
};
