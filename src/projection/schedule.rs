//! Future values across a fixed set of investment horizons

use serde::{Deserialize, Serialize};

use super::annuity::{checked_future_value, ProjectionError};

/// Horizons (years) quoted to investors
pub const DEFAULT_HORIZONS_YEARS: [u32; 8] = [1, 3, 5, 10, 15, 20, 25, 30];

/// Monthly contributions with monthly compounding
pub const MONTHLY_PERIODS: u32 = 12;

/// Projected value at one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonValue {
    pub years: u32,
    pub future_value: f64,
}

/// Round to cents
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Project a recurring contribution at a percentage ROI for each horizon.
///
/// `roi_percent` is the portfolio ROI as produced by the analysis (5.86 for
/// 5.86%); it is converted to a decimal before compounding.
pub fn project_horizons(
    contribution: f64,
    roi_percent: f64,
    periods_per_year: u32,
    horizons: &[u32],
) -> Result<Vec<HorizonValue>, ProjectionError> {
    let annual_rate = roi_percent / 100.0;

    horizons
        .iter()
        .map(|&years| {
            let fv = checked_future_value(contribution, annual_rate, periods_per_year, years)?;
            Ok(HorizonValue {
                years,
                future_value: round_to_cents(fv),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_horizons_at_zero_roi() {
        let table =
            project_horizons(1000.0, 0.0, MONTHLY_PERIODS, &DEFAULT_HORIZONS_YEARS).unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table[0], HorizonValue { years: 1, future_value: 12_000.0 });
        assert_eq!(table[7], HorizonValue { years: 30, future_value: 360_000.0 });
    }

    #[test]
    fn test_percent_is_converted_and_rounded() {
        let table = project_horizons(1000.0, 12.0, MONTHLY_PERIODS, &[1]).unwrap();
        assert_eq!(table[0].future_value, 12_809.33);
    }

    #[test]
    fn test_values_grow_with_horizon() {
        let table =
            project_horizons(2500.0, 7.5, MONTHLY_PERIODS, &DEFAULT_HORIZONS_YEARS).unwrap();
        for pair in table.windows(2) {
            assert!(pair[1].future_value > pair[0].future_value);
        }
    }

    #[test]
    fn test_zero_year_horizon_rejected() {
        assert_eq!(
            project_horizons(1000.0, 5.0, MONTHLY_PERIODS, &[1, 0]),
            Err(ProjectionError::ZeroHorizon)
        );
    }

    #[test]
    fn test_overlong_horizon_rejected() {
        let result = project_horizons(1000.0, 1.0, MONTHLY_PERIODS, &[200_000_000]);
        assert!(matches!(result, Err(ProjectionError::TooManyPeriods { years: 200_000_000, .. })));
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(10.004), 10.0);
        assert_eq!(round_to_cents(10.006), 10.01);
    }
}
