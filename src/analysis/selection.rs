//! Median thresholds, high-return/low-risk selection, inverse-volatility weights

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::metrics::{median, InstrumentMetrics};
use super::AnalysisError;

/// Medians that an instrument must beat to be selected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionThresholds {
    pub roi_threshold: f64,
    pub volatility_threshold: f64,
}

/// Instrument for which both ROI and volatility are defined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub roi: f64,
    pub volatility: f64,
}

/// Selected instrument with its normalized inverse-volatility weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedInstrument {
    pub id: String,
    pub roi: f64,
    pub volatility: f64,
    pub investment_ratio: f64,
}

/// Keep instruments that have both metrics, in their original order.
pub fn candidates(metrics: &[InstrumentMetrics]) -> Result<Vec<Candidate>, AnalysisError> {
    if metrics.iter().all(|m| m.roi.is_none()) {
        return Err(AnalysisError::InsufficientData(
            "no companies remaining after ROI calculation, check for zero initial prices"
                .to_string(),
        ));
    }

    let both: Vec<Candidate> = metrics
        .iter()
        .filter_map(|m| match (m.roi, m.volatility) {
            (Some(roi), Some(volatility)) => Some(Candidate {
                id: m.id.clone(),
                roi,
                volatility,
            }),
            _ => None,
        })
        .collect();

    let excluded = metrics.len() - both.len();
    if excluded > 0 {
        debug!("{} instruments lack ROI or volatility and are excluded", excluded);
    }

    if both.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "not enough data to calculate ROI and volatility medians".to_string(),
        ));
    }

    Ok(both)
}

/// Median ROI and median volatility over the candidates
pub fn thresholds(candidates: &[Candidate]) -> Result<SelectionThresholds, AnalysisError> {
    let rois: Vec<f64> = candidates.iter().map(|c| c.roi).collect();
    let vols: Vec<f64> = candidates.iter().map(|c| c.volatility).collect();

    match (median(&rois), median(&vols)) {
        (Some(roi_threshold), Some(volatility_threshold)) => Ok(SelectionThresholds {
            roi_threshold,
            volatility_threshold,
        }),
        _ => Err(AnalysisError::InsufficientData(
            "not enough data to calculate ROI and volatility medians".to_string(),
        )),
    }
}

/// Candidates strictly above the ROI median and strictly below the
/// volatility median, sorted by descending ROI.
pub fn select(
    candidates: &[Candidate],
    thresholds: &SelectionThresholds,
) -> Result<Vec<Candidate>, AnalysisError> {
    let mut selected: Vec<Candidate> = candidates
        .iter()
        .filter(|c| {
            c.roi > thresholds.roi_threshold && c.volatility < thresholds.volatility_threshold
        })
        .cloned()
        .collect();

    if selected.is_empty() {
        return Err(AnalysisError::NoQualifyingInstruments);
    }

    selected.sort_by(|a, b| b.roi.total_cmp(&a.roi));
    Ok(selected)
}

/// Normalized inverse-volatility weights. Zero-volatility instruments are
/// dropped; the survivors keep their order.
pub fn inverse_volatility_weights(
    selected: &[Candidate],
) -> Result<Vec<WeightedInstrument>, AnalysisError> {
    let inverse: Vec<(&Candidate, f64)> = selected
        .iter()
        .filter_map(|c| {
            if c.volatility == 0.0 {
                warn!("{} has zero volatility and is left out of the weights", c.id);
                return None;
            }
            let inv = 1.0 / c.volatility;
            inv.is_finite().then_some((c, inv))
        })
        .collect();

    let total: f64 = inverse.iter().map(|(_, inv)| inv).sum();
    if inverse.is_empty() || total == 0.0 {
        return Err(AnalysisError::ZeroVolatilitySum);
    }

    Ok(inverse
        .into_iter()
        .map(|(c, inv)| WeightedInstrument {
            id: c.id.clone(),
            roi: c.roi,
            volatility: c.volatility,
            investment_ratio: inv / total,
        })
        .collect())
}

/// Dot product of ROI and investment ratio, in slice order
pub fn weighted_average_roi(weighted: &[WeightedInstrument]) -> f64 {
    weighted.iter().map(|w| w.roi * w.investment_ratio).sum()
}
