//! Errors surfaced at the planner boundary

use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::prices::DataError;
use crate::projection::ProjectionError;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("{0}")]
    InvalidInvestment(String),
}

impl PlanError {
    /// User-facing message, prefixed by error family
    pub fn user_message(&self) -> String {
        match self {
            PlanError::Data(e) => format!("Data file error: {}", e),
            PlanError::Analysis(e) => format!("Data analysis error: {}", e),
            PlanError::Projection(e) => format!("Invalid input: {}", e),
            PlanError::InvalidInvestment(msg) => format!("Invalid input: {}", msg),
        }
    }

    /// HTTP-style status: caller mistakes are 400, everything else 500
    pub fn status_code(&self) -> u16 {
        match self {
            PlanError::Data(_) | PlanError::Analysis(_) => 500,
            PlanError::Projection(_) | PlanError::InvalidInvestment(_) => 400,
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::Data(DataError::NotFound(_)) => "data_not_found",
            PlanError::Data(_) => "data_unreadable",
            PlanError::Analysis(e) => e.kind(),
            PlanError::Projection(_) => "invalid_projection_input",
            PlanError::InvalidInvestment(_) => "invalid_investment",
        }
    }
}
