//! End-to-end analysis: raw prices in, weighted portfolio out

use log::info;
use serde::{Deserialize, Serialize};

use super::metrics::instrument_metrics;
use super::returns::daily_returns;
use super::selection::{
    candidates, inverse_volatility_weights, select, thresholds, weighted_average_roi,
    SelectionThresholds, WeightedInstrument,
};
use super::AnalysisError;
use crate::prices::RawPriceTable;

/// Fewest cleaned rows for which a daily return exists
pub const MIN_PRICE_ROWS: usize = 2;

/// Snapshot produced by one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Selected instruments in descending ROI order, with their weights
    pub portfolio: Vec<WeightedInstrument>,
    /// Portfolio ROI in percent
    pub weighted_avg_roi: f64,
    pub thresholds: SelectionThresholds,
    /// Instruments with both metrics defined (the median population)
    pub instruments_analysed: usize,
    /// Rows left after cleaning
    pub price_rows: usize,
}

impl PipelineResult {
    /// (id, roi) pairs in descending ROI order
    pub fn selected_instruments(&self) -> Vec<(String, f64)> {
        self.portfolio
            .iter()
            .map(|w| (w.id.clone(), w.roi))
            .collect()
    }

    /// (id, ratio) pairs in descending ratio order
    pub fn investment_ratios(&self) -> Vec<(String, f64)> {
        let mut ratios: Vec<(String, f64)> = self
            .portfolio
            .iter()
            .map(|w| (w.id.clone(), w.investment_ratio))
            .collect();
        ratios.sort_by(|a, b| b.1.total_cmp(&a.1));
        ratios
    }
}

/// Run the full analysis over a raw price table.
///
/// Steps: coerce → prune/fill → size check → daily returns → metrics →
/// median thresholds → selection → inverse-volatility weights → weighted ROI.
pub fn run_pipeline(raw: &RawPriceTable) -> Result<PipelineResult, AnalysisError> {
    let prices = raw.coerce()?.into_clean()?;

    if prices.row_count() < MIN_PRICE_ROWS {
        return Err(AnalysisError::InsufficientData(format!(
            "need at least {} price rows to calculate daily returns, got {}",
            MIN_PRICE_ROWS,
            prices.row_count()
        )));
    }

    let returns = daily_returns(&prices)?;
    let metrics = instrument_metrics(&prices, &returns);

    let pool = candidates(&metrics)?;
    let thresholds = thresholds(&pool)?;
    info!(
        "Thresholds over {} instruments: ROI > {:.4}%, volatility < {:.4}",
        pool.len(),
        thresholds.roi_threshold,
        thresholds.volatility_threshold
    );

    let selected = select(&pool, &thresholds)?;
    let portfolio = inverse_volatility_weights(&selected)?;
    let weighted_avg_roi = weighted_average_roi(&portfolio);

    info!(
        "Selected {} of {} instruments, weighted average ROI {:.4}%",
        portfolio.len(),
        pool.len(),
        weighted_avg_roi
    );

    Ok(PipelineResult {
        portfolio,
        weighted_avg_roi,
        thresholds,
        instruments_analysed: pool.len(),
        price_rows: prices.row_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::{load_default_prices, load_prices_from_reader};
    use approx::assert_relative_eq;

    fn run_csv(csv: &str) -> Result<PipelineResult, AnalysisError> {
        let raw = load_prices_from_reader(csv.as_bytes()).expect("fixture CSV parses");
        run_pipeline(&raw)
    }

    #[test]
    fn test_sample_file_selects_steady_grower() {
        let raw = load_default_prices().expect("Failed to load sample prices");
        let result = run_pipeline(&raw).expect("sample analysis succeeds");

        // ETA is entirely missing and pruned; the other six are analysed
        assert_eq!(result.instruments_analysed, 6);
        assert_eq!(result.price_rows, 10);
        assert_relative_eq!(result.thresholds.roi_threshold, 8.0, epsilon = 1e-9);

        let ids: Vec<_> = result.portfolio.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["ALPHA"]);
        assert_relative_eq!(result.weighted_avg_roi, 10.0, epsilon = 1e-9);
        assert_relative_eq!(result.portfolio[0].investment_ratio, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_properties_hold_on_mixed_basket() {
        let csv = "\
Date,A,B,C,D,E,F
2024-02-01,100,100,100,100,100,100
2024-02-02,102,101,105,90,99,100.5
2024-02-05,104,103,95,110,98,100
2024-02-06,106,104,110,85,97,101
2024-02-07,108,106,120,95,96,101.5
";
        let result = run_csv(csv).unwrap();

        let total: f64 = result.portfolio.iter().map(|w| w.investment_ratio).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);

        for pair in result.portfolio.windows(2) {
            assert!(pair[0].roi > pair[1].roi);
        }
        for w in &result.portfolio {
            assert!(w.roi > result.thresholds.roi_threshold);
            assert!(w.volatility < result.thresholds.volatility_threshold);
            assert!(w.investment_ratio >= 0.0);
        }

        let dot: f64 = result
            .portfolio
            .iter()
            .map(|w| w.roi * w.investment_ratio)
            .sum();
        assert_relative_eq!(result.weighted_avg_roi, dot, epsilon = 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let raw = load_default_prices().unwrap();
        let first = run_pipeline(&raw).unwrap();
        let second = run_pipeline(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_roi_selects_nothing() {
        let csv = "\
Date,A,B,C
2024-02-01,100,50,10
2024-02-02,105,49,12
2024-02-05,110,55,11
";
        assert_eq!(run_csv(csv), Err(AnalysisError::NoQualifyingInstruments));
    }

    #[test]
    fn test_two_instruments_one_qualifies() {
        // STEADY: ROI 10%, small swings. WILD: ROI 0%, large swings.
        let csv = "\
Date,STEADY,WILD
2024-02-01,100,100
2024-02-02,104,150
2024-02-05,110,100
";
        let result = run_csv(csv).unwrap();
        assert_eq!(result.portfolio.len(), 1);
        assert_eq!(result.portfolio[0].id, "STEADY");
        assert_eq!(result.portfolio[0].investment_ratio, 1.0);
        assert_eq!(result.weighted_avg_roi, result.portfolio[0].roi);
        assert_eq!(
            result.selected_instruments(),
            vec![("STEADY".to_string(), result.portfolio[0].roi)]
        );
    }

    #[test]
    fn test_zero_initial_price_is_excluded() {
        // ZERO's first step has a zero base, so that return row is dropped
        // for every instrument; ZERO itself gets no ROI.
        let csv = "\
Date,ZERO,A,B,C
2024-02-01,0,100,100,100
2024-02-02,5,100,100,100
2024-02-05,6,110,101,90
2024-02-06,7,121,99,95
2024-02-07,8,133,102,80
";
        let result = run_csv(csv).unwrap();
        assert_eq!(result.instruments_analysed, 3);
        for w in &result.portfolio {
            assert_ne!(w.id, "ZERO");
            assert!(w.roi.is_finite());
        }
        assert!(result.weighted_avg_roi.is_finite());
    }

    #[test]
    fn test_single_row_is_insufficient() {
        let csv = "Date,A,B\n2024-02-01,1,2\n";
        assert!(matches!(run_csv(csv), Err(AnalysisError::InsufficientData(_))));
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "Date,A,B\n";
        assert!(matches!(run_csv(csv), Err(AnalysisError::EmptyDataset(_))));
    }

    #[test]
    fn test_unparseable_dates() {
        let csv = "Date,A\nmonday,1\ntuesday,2\n";
        assert!(matches!(run_csv(csv), Err(AnalysisError::DataFormat(_))));
    }

    #[test]
    fn test_ratio_order_follows_weight() {
        let result = run_csv(
            "\
Date,A,B,C,D,E,F
2024-02-01,100,100,100,100,100,100
2024-02-02,102,101,105,90,99,100.5
2024-02-05,104,103,95,110,98,100
2024-02-06,106,104,110,85,97,101
2024-02-07,108,106,120,95,96,101.5
",
        )
        .unwrap();

        let ratios = result.investment_ratios();
        assert_eq!(ratios.len(), result.portfolio.len());
        for pair in ratios.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
