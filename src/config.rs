//! Calculator settings and rate-input handling
//!
//! Settings can be loaded from a JSON file; every field is optional and
//! falls back to the calculator defaults.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use crate::allocation::AllocationOrder;
use crate::amortization::{DEFAULT_ROUNDING_DECIMALS, MAX_ROUNDING_DECIMALS};
use crate::error::{CalcError, Result};
use crate::prepayment::{PrepaymentRecalculator, RecalculationConfig};

/// How rates are typed in by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateFormat {
    /// 0.2 means 20%
    #[default]
    Decimal,
    /// 20 means 20%
    Percent,
}

impl FromStr for RateFormat {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimal" => Ok(RateFormat::Decimal),
            "percent" | "percentage" | "%" => Ok(RateFormat::Percent),
            other => Err(CalcError::invalid("rate_format", format!("unknown format: {}", other))),
        }
    }
}

/// A rate as entered, together with its decimal value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateInput {
    pub decimal: f64,
    pub percent: f64,
}

impl RateInput {
    /// Convert a typed rate to decimal, checking it lies in [0, 1] / [0, 100]
    pub fn parse(field: &str, value: f64, format: RateFormat) -> Result<Self> {
        let (decimal, upper) = match format {
            RateFormat::Decimal => (value, 1.0),
            RateFormat::Percent => (value / 100.0, 100.0),
        };

        if !value.is_finite() || value < 0.0 || value > upper {
            return Err(CalcError::invalid(
                field,
                format!("must be within [0, {}] in {:?} format, got {}", upper, format, value),
            ));
        }

        Ok(Self {
            decimal,
            percent: decimal * 100.0,
        })
    }
}

/// User-level calculator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub rate_format: RateFormat,
    pub prepayment: RecalculationConfig,
    pub allocation_order: AllocationOrder,
    /// Decimal places balances are rounded to between schedule periods
    pub rounding_decimals: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            rate_format: RateFormat::Decimal,
            prepayment: RecalculationConfig::default(),
            allocation_order: AllocationOrder::InterestFirst,
            rounding_decimals: DEFAULT_ROUNDING_DECIMALS,
        }
    }
}

impl CalculatorConfig {
    /// Load settings from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load settings from any reader (e.g., string buffer)
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        log::debug!("loaded calculator config: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rounding_decimals > MAX_ROUNDING_DECIMALS {
            return Err(CalcError::invalid(
                "rounding_decimals",
                format!(
                    "must be at most {}, got {}",
                    MAX_ROUNDING_DECIMALS, self.rounding_decimals
                ),
            ));
        }
        Ok(())
    }

    /// Prepayment recalculator rounding balances like plain schedules
    pub fn recalculator(&self) -> PrepaymentRecalculator {
        PrepaymentRecalculator::new(self.prepayment, self.rounding_decimals)
    }
}
