//! Nominal / effective annual rate conversion

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Compounding bases offered by the calculator (times per year)
pub const COMPOUNDING_BASES: [u32; 5] = [1, 2, 4, 12, 365];

/// Convert a nominal annual rate to the effective annual rate
///
/// The nominal rate is prorated to `nominal / m` per period and compounded
/// `m` times. A zero `compoundings_per_year` is rejected.
pub fn nominal_to_effective(nominal_annual_rate: f64, compoundings_per_year: u32) -> Result<f64> {
    let m = compounding_base(compoundings_per_year)?;
    let per_period = nominal_annual_rate / m;
    Ok((1.0 + per_period).powf(m) - 1.0)
}

/// Convert an effective annual rate (>= -1) back to the nominal annual rate
pub fn effective_to_nominal(effective_annual_rate: f64, compoundings_per_year: u32) -> Result<f64> {
    let m = compounding_base(compoundings_per_year)?;
    let per_period = (1.0 + effective_annual_rate).powf(1.0 / m) - 1.0;
    Ok(per_period * m)
}

fn compounding_base(compoundings_per_year: u32) -> Result<f64> {
    if compoundings_per_year == 0 {
        return Err(CalcError::invalid("compoundings_per_year", "must be at least 1"));
    }
    Ok(compoundings_per_year as f64)
}

/// Which side of the equivalence the caller supplied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RateQuote {
    Nominal(f64),
    Effective(f64),
}

/// Both sides of a nominal/effective equivalence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConversion {
    pub nominal_annual_rate: f64,
    pub effective_annual_rate: f64,
    pub compoundings_per_year: u32,
}

impl RateConversion {
    /// Effective rate for a single compounding period
    pub fn periodic_rate(&self) -> f64 {
        self.nominal_annual_rate / self.compoundings_per_year as f64
    }
}

/// Complete a quote into the full conversion record
pub fn convert(quote: RateQuote, compoundings_per_year: u32) -> Result<RateConversion> {
    let (nominal, effective) = match quote {
        RateQuote::Nominal(tna) => (tna, nominal_to_effective(tna, compoundings_per_year)?),
        RateQuote::Effective(tea) => (effective_to_nominal(tea, compoundings_per_year)?, tea),
    };

    log::debug!(
        "rate conversion m={}: nominal={:.6} effective={:.6}",
        compoundings_per_year,
        nominal,
        effective
    );

    Ok(RateConversion {
        nominal_annual_rate: nominal,
        effective_annual_rate: effective,
        compoundings_per_year,
    })
}

/// Ancillary charges, each expressed in percentage points (3.0 = 3%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub administrative_pct: f64,
    pub insurance_pct: f64,
    pub taxes_pct: f64,
}

impl ChargeBreakdown {
    pub fn total_pct(&self) -> f64 {
        self.administrative_pct + self.insurance_pct + self.taxes_pct
    }
}

/// Rough total financial cost: effective rate plus flat charges
///
/// The real figure depends on how each charge is levied (on balance, as a
/// fixed amount, outside the installment), so this is only indicative.
pub fn approximate_total_cost(effective_annual_rate: f64, charges: &ChargeBreakdown) -> f64 {
    effective_annual_rate + charges.total_pct() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_monthly_sixty_percent_nominal() {
        // 60% TNA monthly: 1.05^12 - 1
        let tea = nominal_to_effective(0.60, 12).unwrap();
        assert_abs_diff_eq!(tea, 0.795856, epsilon = 1e-6);
    }

    #[test]
    fn test_annual_compounding_is_identity() {
        assert_abs_diff_eq!(nominal_to_effective(0.25, 1).unwrap(), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(effective_to_nominal(0.25, 1).unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_all_bases() {
        for &m in COMPOUNDING_BASES.iter() {
            for &tna in &[0.01, 0.12, 0.60, 1.5] {
                let tea = nominal_to_effective(tna, m).unwrap();
                let back = effective_to_nominal(tea, m).unwrap();
                assert_relative_eq!(back, tna, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_convert_from_effective() {
        let conv = convert(RateQuote::Effective(0.796), 12).unwrap();
        assert_eq!(conv.compoundings_per_year, 12);
        assert_abs_diff_eq!(conv.effective_annual_rate, 0.796, epsilon = 1e-12);
        assert_abs_diff_eq!(conv.nominal_annual_rate, 0.60, epsilon = 1e-3);
        assert_abs_diff_eq!(conv.periodic_rate(), 0.05, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_compounding_base_rejected() {
        assert!(matches!(
            nominal_to_effective(0.6, 0),
            Err(CalcError::InvalidInput { field, .. }) if field == "compoundings_per_year"
        ));
        assert!(nominal_to_effective(0.0, 0).is_err());
        assert!(effective_to_nominal(0.7, 0).is_err());
        assert!(convert(RateQuote::Nominal(0.6), 0).is_err());
        assert!(convert(RateQuote::Effective(0.7), 0).is_err());
    }

    #[test]
    fn test_approximate_total_cost() {
        let charges = ChargeBreakdown {
            administrative_pct: 3.0,
            insurance_pct: 2.0,
            taxes_pct: 1.0,
        };
        assert_abs_diff_eq!(approximate_total_cost(0.796, &charges), 0.856, epsilon = 1e-12);
    }
}
