//! Risk and return figures per instrument

use rayon::prelude::*;
use serde::Serialize;

use super::returns::ReturnsTable;
use crate::prices::PriceTable;

/// Return and risk for one instrument. A `None` metric could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentMetrics {
    pub id: String,
    /// Total percentage change from first to last price
    pub roi: Option<f64>,
    /// Sample standard deviation of daily percentage returns
    pub volatility: Option<f64>,
}

/// Sample standard deviation (n - 1 denominator), summed in slice order.
///
/// Returns None for fewer than two observations.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let std = (sum_sq / (n - 1.0)).sqrt();

    std.is_finite().then_some(std)
}

/// Median of the values; the mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Percentage change over the whole window. None if the first price is zero.
pub fn total_roi(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 || !first.is_finite() {
        return None;
    }
    let roi = (last - first) / first * 100.0;
    roi.is_finite().then_some(roi)
}

/// Compute ROI and volatility for every instrument, in column order
pub fn instrument_metrics(prices: &PriceTable, returns: &ReturnsTable) -> Vec<InstrumentMetrics> {
    prices
        .columns
        .par_iter()
        .zip(returns.columns.par_iter())
        .map(|(price_col, return_col)| {
            let roi = match (price_col.prices.first(), price_col.prices.last()) {
                (Some(&first), Some(&last)) => total_roi(first, last),
                _ => None,
            };

            InstrumentMetrics {
                id: price_col.id.clone(),
                roi,
                volatility: sample_std(&return_col.returns),
            }
        })
        .collect()
}
