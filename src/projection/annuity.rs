//! Future value of a systematic investment plan (annuity due)

use thiserror::Error;

/// Inputs the annuity formula cannot handle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Contribution must be a finite number, got {0}")]
    NonFiniteContribution(f64),

    #[error("Annual rate must be a finite number, got {0}")]
    NonFiniteRate(f64),

    #[error("Periods per year must be positive")]
    ZeroFrequency,

    #[error("Horizon must be at least one year")]
    ZeroHorizon,

    #[error("{years} years at {periods_per_year} periods per year exceeds {max} periods")]
    TooManyPeriods {
        periods_per_year: u32,
        years: u32,
        max: u32,
    },
}

/// Longest schedule the projector accepts, in contribution periods
pub const MAX_TOTAL_PERIODS: u32 = i32::MAX as u32;

/// Number of contributions over `years`, bounded by [`MAX_TOTAL_PERIODS`]
pub fn total_periods(periods_per_year: u32, years: u32) -> Result<i32, ProjectionError> {
    periods_per_year
        .checked_mul(years)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(ProjectionError::TooManyPeriods {
            periods_per_year,
            years,
            max: MAX_TOTAL_PERIODS,
        })
}

/// Future value of level contributions paid at the start of each period.
///
/// # Arguments
/// * `contribution` - Amount invested each period
/// * `annual_rate` - Annual return as a decimal (0.12 for 12%), any sign
/// * `periods_per_year` - Contributions and compounding per year (12 for monthly)
/// * `years` - Investment horizon
///
/// Inputs are not validated; see [`checked_future_value`]. The period count
/// is taken in floating point, so very long schedules overflow to infinity
/// rather than wrapping.
pub fn future_value(contribution: f64, annual_rate: f64, periods_per_year: u32, years: u32) -> f64 {
    let rate_per_period = annual_rate / periods_per_year as f64;
    let n = periods_per_year as f64 * years as f64;

    if rate_per_period == 0.0 {
        return contribution * n;
    }

    let growth = match total_periods(periods_per_year, years) {
        Ok(periods) => (1.0 + rate_per_period).powi(periods),
        Err(_) => (1.0 + rate_per_period).powf(n),
    };
    contribution * ((growth - 1.0) / rate_per_period) * (1.0 + rate_per_period)
}

/// [`future_value`] behind input validation
pub fn checked_future_value(
    contribution: f64,
    annual_rate: f64,
    periods_per_year: u32,
    years: u32,
) -> Result<f64, ProjectionError> {
    if !contribution.is_finite() {
        return Err(ProjectionError::NonFiniteContribution(contribution));
    }
    if !annual_rate.is_finite() {
        return Err(ProjectionError::NonFiniteRate(annual_rate));
    }
    if periods_per_year == 0 {
        return Err(ProjectionError::ZeroFrequency);
    }
    if years == 0 {
        return Err(ProjectionError::ZeroHorizon);
    }
    total_periods(periods_per_year, years)?;

    Ok(future_value(contribution, annual_rate, periods_per_year, years))
}
