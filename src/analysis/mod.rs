//! Portfolio analysis over cleaned closing prices
//!
//! Selects instruments with above-median ROI and below-median volatility and
//! weights them by inverse volatility:
//! - **Returns**: daily percentage changes per instrument
//! - **Metrics**: total ROI and sample volatility
//! - **Selection**: strict median thresholds, inverse-volatility weights
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_planner::prices::load_prices;
//! use portfolio_planner::analysis::run_pipeline;
//!
//! let raw = load_prices("data/closing_prices.csv")?;
//! let result = run_pipeline(&raw)?;
//! println!("Weighted ROI: {:.2}%", result.weighted_avg_roi);
//! ```

mod error;
mod metrics;
mod pipeline;
mod returns;
mod selection;

pub use error::AnalysisError;
pub use metrics::{instrument_metrics, median, sample_std, total_roi, InstrumentMetrics};
pub use pipeline::{run_pipeline, PipelineResult, MIN_PRICE_ROWS};
pub use returns::{daily_returns, pct_change, ReturnColumn, ReturnsTable};
pub use selection::{
    candidates, inverse_volatility_weights, select, thresholds, weighted_average_roi, Candidate,
    SelectionThresholds, WeightedInstrument,
};
