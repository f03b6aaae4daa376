//! Portfolio Planner - Low-volatility basket selection and SIP projection
//!
//! This library provides:
//! - Closing-price loading and gap cleaning
//! - Daily returns, ROI and volatility per instrument
//! - Median-threshold selection with inverse-volatility weights
//! - Annuity-due future value projection for monthly investments
//! - A memoized service layer shared by the CLI and the Lambda handler

pub mod prices;
pub mod analysis;
pub mod projection;
pub mod config;
pub mod cache;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use analysis::{run_pipeline, AnalysisError, PipelineResult};
pub use cache::AnalysisCache;
pub use config::PlanConfig;
pub use error::PlanError;
pub use projection::{future_value, project_horizons};
pub use service::{PlanRequest, PlanService};
