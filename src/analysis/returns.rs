//! Daily percentage returns

use chrono::NaiveDate;
use log::warn;

use super::AnalysisError;
use crate::prices::PriceTable;

/// Per-instrument daily returns, in percent, one row per date after the first
#[derive(Debug, Clone)]
pub struct ReturnsTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<ReturnColumn>,
}

#[derive(Debug, Clone)]
pub struct ReturnColumn {
    pub id: String,
    pub returns: Vec<f64>,
}

/// Percentage change between two prices. None when the base price is zero.
pub fn pct_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let change = (current - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

/// Compute daily returns for every instrument.
///
/// A row is usable only if every instrument has a defined return for it;
/// rows with a zero base price in any column are dropped as a whole.
pub fn daily_returns(prices: &PriceTable) -> Result<ReturnsTable, AnalysisError> {
    let mut dates = Vec::new();
    let mut columns: Vec<ReturnColumn> = prices
        .columns
        .iter()
        .map(|c| ReturnColumn {
            id: c.id.clone(),
            returns: Vec::with_capacity(prices.row_count().saturating_sub(1)),
        })
        .collect();

    let mut skipped = 0usize;
    for t in 1..prices.row_count() {
        let row: Option<Vec<f64>> = prices
            .columns
            .iter()
            .map(|c| pct_change(c.prices[t - 1], c.prices[t]))
            .collect();

        match row {
            Some(values) => {
                dates.push(prices.dates[t]);
                for (col, value) in columns.iter_mut().zip(values) {
                    col.returns.push(value);
                }
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} return rows with a zero base price", skipped);
    }

    if dates.is_empty() {
        return Err(AnalysisError::EmptyDataset(
            "daily returns could not be calculated for any row".to_string(),
        ));
    }

    Ok(ReturnsTable { dates, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::PriceColumn;
    use approx::assert_relative_eq;

    fn table(columns: Vec<(&str, Vec<f64>)>) -> PriceTable {
        let rows = columns[0].1.len();
        PriceTable {
            dates: (0..rows)
                .map(|d| NaiveDate::from_ymd_opt(2024, 3, 1 + d as u32).unwrap())
                .collect(),
            columns: columns
                .into_iter()
                .map(|(id, prices)| PriceColumn { id: id.to_string(), prices })
                .collect(),
        }
    }

    #[test]
    fn test_returns_are_percentages() {
        let prices = table(vec![("AAA", vec![100.0, 110.0, 99.0])]);
        let returns = daily_returns(&prices).unwrap();

        assert_eq!(returns.dates.len(), 2);
        assert_eq!(returns.dates[0], prices.dates[1]);
        assert_relative_eq!(returns.columns[0].returns[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(returns.columns[0].returns[1], -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_base_price_drops_whole_row() {
        let prices = table(vec![
            ("AAA", vec![0.0, 5.0, 10.0]),
            ("BBB", vec![10.0, 20.0, 10.0]),
        ]);
        let returns = daily_returns(&prices).unwrap();

        assert_eq!(returns.dates, vec![prices.dates[2]]);
        assert_eq!(returns.columns[0].returns, vec![100.0]);
        assert_eq!(returns.columns[1].returns, vec![-50.0]);
    }

    #[test]
    fn test_no_usable_rows() {
        let prices = table(vec![("AAA", vec![0.0, 0.0, 0.0])]);
        assert!(matches!(
            daily_returns(&prices),
            Err(AnalysisError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_pct_change_guard() {
        assert_eq!(pct_change(0.0, 1.0), None);
        assert_eq!(pct_change(4.0, 5.0), Some(25.0));
    }
}
