//! Load closing-price tables from CSV

use super::RawPriceTable;
use csv::ReaderBuilder;
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the closing-price file
pub const DEFAULT_PRICES_PATH: &str = "data/closing_prices.csv";

/// Errors raised while reading the price file from storage
#[derive(Error, Debug)]
pub enum DataError {
    #[error("The data file {} was not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read price data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Load a price table from a CSV file
pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<RawPriceTable, DataError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)?;
    let table = load_prices_from_reader(file)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Load a price table from any reader (e.g., string buffer, request body)
pub fn load_prices_from_reader<R: std::io::Read>(reader: R) -> Result<RawPriceTable, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawPriceTable::new(headers, rows))
}

/// Load the price table from the default location
pub fn load_default_prices() -> Result<RawPriceTable, DataError> {
    load_prices(DEFAULT_PRICES_PATH)
}
