//! Price tables: raw CSV cells, numeric coercion and gap cleaning
//!
//! The cleaning path runs in three stages, each with its own type:
//! `RawPriceTable` (strings as read) → `CoercedTable` (dates parsed, cells
//! `Option<f64>`) → `PriceTable` (no gaps, every cell a finite price).

use chrono::NaiveDate;
use log::{debug, warn};

use super::dates::parse_date;
use crate::analysis::AnalysisError;

/// Header that marks the time axis. Falls back to the first column when absent.
pub const DATE_COLUMN: &str = "Date";

/// Tokens treated as explicitly missing before numeric parsing is attempted
const MISSING_TOKENS: [&str; 6] = ["", "-", "na", "n/a", "null", "none"];

/// Price file contents before any interpretation
#[derive(Debug, Clone, Default)]
pub struct RawPriceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Table with parsed dates and numeric-or-missing cells
#[derive(Debug, Clone)]
pub struct CoercedTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<CoercedColumn>,
}

#[derive(Debug, Clone)]
pub struct CoercedColumn {
    pub id: String,
    pub values: Vec<Option<f64>>,
}

/// One instrument's cleaned closing prices, aligned with `PriceTable::dates`
#[derive(Debug, Clone)]
pub struct PriceColumn {
    pub id: String,
    pub prices: Vec<f64>,
}

/// Cleaned dataset: no missing cells remain
#[derive(Debug, Clone)]
pub struct PriceTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<PriceColumn>,
}

/// Coerce a cell to a price. Unparseable and non-finite values are missing.
pub fn coerce_price(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if MISSING_TOKENS.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Forward-fill then backward-fill a column in place.
///
/// A column with no observations at all is left untouched.
pub fn forward_backward_fill(values: &mut [Option<f64>]) {
    let mut last_seen = None;
    for slot in values.iter_mut() {
        match slot {
            Some(v) => last_seen = Some(*v),
            None => *slot = last_seen,
        }
    }

    let mut next_seen = None;
    for slot in values.iter_mut().rev() {
        match slot {
            Some(v) => next_seen = Some(*v),
            None => *slot = next_seen,
        }
    }
}

impl RawPriceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of the date axis
    fn date_index(&self) -> usize {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(DATE_COLUMN))
            .unwrap_or(0)
    }

    /// Parse every date and coerce every other cell to a number
    pub fn coerce(&self) -> Result<CoercedTable, AnalysisError> {
        if self.headers.is_empty() {
            return Err(AnalysisError::DataFormat(
                "price file has no header row".to_string(),
            ));
        }

        let date_idx = self.date_index();
        let mut dates = Vec::with_capacity(self.rows.len());

        for (line, row) in self.rows.iter().enumerate() {
            let cell = row.get(date_idx).map(String::as_str).unwrap_or("");
            let date = parse_date(cell).ok_or_else(|| {
                AnalysisError::DataFormat(format!(
                    "cannot parse date {:?} in data row {}",
                    cell,
                    line + 1
                ))
            })?;
            dates.push(date);
        }

        let columns = self
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != date_idx)
            .map(|(idx, header)| CoercedColumn {
                id: header.trim().to_string(),
                values: self
                    .rows
                    .iter()
                    .map(|row| row.get(idx).and_then(|cell| coerce_price(cell)))
                    .collect(),
            })
            .collect();

        Ok(CoercedTable { dates, columns })
    }
}

impl CoercedTable {
    /// Drop columns with no observation at all. Returns the dropped ids.
    pub fn prune_empty_columns(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        self.columns.retain(|col| {
            let keep = col.values.iter().any(Option::is_some);
            if !keep {
                dropped.push(col.id.clone());
            }
            keep
        });

        if !dropped.is_empty() {
            warn!("Dropping entirely missing columns: {:?}", dropped);
        }
        dropped
    }

    /// Prune, fill, and drop any row that still has a gap.
    pub fn into_clean(mut self) -> Result<PriceTable, AnalysisError> {
        self.prune_empty_columns();

        if self.columns.is_empty() {
            return Err(AnalysisError::EmptyDataset(
                "no instrument column holds any numeric price".to_string(),
            ));
        }

        for col in &mut self.columns {
            forward_backward_fill(&mut col.values);
        }

        let complete: Vec<bool> = (0..self.dates.len())
            .map(|row| self.columns.iter().all(|col| col.values[row].is_some()))
            .collect();

        let dropped_rows = complete.iter().filter(|ok| !**ok).count();
        if dropped_rows > 0 {
            warn!(
                "{} rows still hold missing prices after filling; dropping them",
                dropped_rows
            );
        }

        let dates: Vec<NaiveDate> = self
            .dates
            .iter()
            .zip(&complete)
            .filter(|(_, ok)| **ok)
            .map(|(d, _)| *d)
            .collect();

        if dates.is_empty() {
            return Err(AnalysisError::EmptyDataset(
                "dataset became empty after dropping rows with missing prices".to_string(),
            ));
        }

        let columns = self
            .columns
            .into_iter()
            .map(|col| PriceColumn {
                id: col.id,
                prices: col
                    .values
                    .into_iter()
                    .zip(&complete)
                    .filter_map(|(v, ok)| if *ok { v } else { None })
                    .collect(),
            })
            .collect();

        debug!("Cleaned price table: {} rows", dates.len());
        Ok(PriceTable { dates, columns })
    }
}

impl PriceTable {
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn instrument_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.id.as_str()).collect()
    }
}
