use thiserror::Error;

/// Reasons a pipeline run can fail. All are fatal to that run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid price data: {0}")]
    DataFormat(String),

    #[error("No usable data: {0}")]
    EmptyDataset(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("No companies meet the criteria for high ROI and low volatility")]
    NoQualifyingInstruments,

    #[error("Sum of inverse volatility is zero, cannot calculate investment ratios")]
    ZeroVolatilitySum,
}

impl AnalysisError {
    /// Stable identifier for the error kind, used in API responses and logs
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::DataFormat(_) => "data_format",
            AnalysisError::EmptyDataset(_) => "empty_dataset",
            AnalysisError::InsufficientData(_) => "insufficient_data",
            AnalysisError::NoQualifyingInstruments => "no_qualifying_instruments",
            AnalysisError::ZeroVolatilitySum => "zero_volatility_sum",
        }
    }
}
