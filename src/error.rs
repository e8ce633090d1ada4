//! Error types for the calculator library

use thiserror::Error;

/// Errors surfaced by the calculators and their I/O helpers
#[derive(Debug, Error)]
pub enum CalcError {
    /// An input outside the domain a formula accepts
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// A period index that does not exist in the schedule being queried
    #[error("Period {period} not found in a {term}-period schedule")]
    PeriodNotFound { period: u32, term: u32 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

/// Upper bound on term and period counts accepted by the input layer
pub const MAX_PERIODS: u32 = 360;

/// Check a capital or principal amount is finite and non-negative
pub fn validate_amount(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(CalcError::invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(value)
}

/// Check a decimal periodic rate lies in [0, 1]
pub fn validate_rate(field: &str, rate: f64) -> Result<f64> {
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return Err(CalcError::invalid(field, format!("must be within [0, 1], got {}", rate)));
    }
    Ok(rate)
}

/// Check a period count lies in [1, MAX_PERIODS]
pub fn validate_periods(field: &str, periods: u32) -> Result<u32> {
    if periods == 0 || periods > MAX_PERIODS {
        return Err(CalcError::invalid(
            field,
            format!("must be within [1, {}], got {}", MAX_PERIODS, periods),
        ));
    }
    Ok(periods)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bounds() {
        assert!(validate_amount("principal", 0.0).is_ok());
        assert!(validate_amount("principal", -1.0).is_err());
        assert!(validate_amount("principal", f64::NAN).is_err());

        assert!(validate_rate("rate", 0.02).is_ok());
        assert!(validate_rate("rate", 1.5).is_err());

        assert!(validate_periods("term", 1).is_ok());
        assert!(validate_periods("term", 360).is_ok());
        assert!(validate_periods("term", 0).is_err());
        assert!(validate_periods("term", 361).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = CalcError::PeriodNotFound { period: 70, term: 60 };
        assert_eq!(err.to_string(), "Period 70 not found in a 60-period schedule");

        let err = CalcError::invalid("term", "must be >= 1");
        assert_eq!(err.to_string(), "Invalid input: term - must be >= 1");
    }
}
