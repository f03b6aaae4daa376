//! Planner configuration
//!
//! Defaults match the published plan: monthly contributions of at least 1000,
//! quoted at 1 to 30 year horizons. A JSON file may override any field.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::prices::loader::DEFAULT_PRICES_PATH;
use crate::projection::{total_periods, DEFAULT_HORIZONS_YEARS, MONTHLY_PERIODS};

/// Environment variable that overrides the price file location
pub const DATA_PATH_ENV: &str = "PLAN_DATA_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Closing-price CSV
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Horizons reported by the future value calculation
    #[serde(default = "default_horizons")]
    pub horizons_years: Vec<u32>,

    /// Contributions and compounding per year
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,

    /// Smallest accepted monthly investment
    #[serde(default = "default_min_monthly_investment")]
    pub min_monthly_investment: f64,
}

fn default_data_path() -> PathBuf { PathBuf::from(DEFAULT_PRICES_PATH) }
fn default_horizons() -> Vec<u32> { DEFAULT_HORIZONS_YEARS.to_vec() }
fn default_periods_per_year() -> u32 { MONTHLY_PERIODS }
fn default_min_monthly_investment() -> f64 { 1000.0 }

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            horizons_years: default_horizons(),
            periods_per_year: default_periods_per_year(),
            min_monthly_investment: default_min_monthly_investment(),
        }
    }
}

impl PlanConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PlanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Defaults with the data path taken from `PLAN_DATA_PATH` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            if !path.trim().is_empty() {
                config.data_path = PathBuf::from(path);
            }
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.periods_per_year == 0 {
            return Err(ConfigError::Invalid("periods_per_year must be positive".into()));
        }
        if self.horizons_years.is_empty() {
            return Err(ConfigError::Invalid("horizons_years must not be empty".into()));
        }
        if self.horizons_years.contains(&0) {
            return Err(ConfigError::Invalid("horizons_years must all be positive".into()));
        }
        for &years in &self.horizons_years {
            total_periods(self.periods_per_year, years)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        if !self.min_monthly_investment.is_finite() {
            return Err(ConfigError::Invalid("min_monthly_investment must be finite".into()));
        }
        Ok(())
    }
}
