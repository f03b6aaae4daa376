//! Request handling shared by the CLI and the Lambda handler
//!
//! Wraps the cached analysis and the projector behind the two plan
//! operations, and renders the `{success, ...}` JSON envelopes.

use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::analysis::PipelineResult;
use crate::cache::AnalysisCache;
use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::projection::{project_horizons, HorizonValue};

/// Operations accepted by the planner
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanRequest {
    PlanDetails,
    CalculateFutureValue {
        /// Number or numeric string
        #[serde(default)]
        monthly_investment: Value,
    },
}

/// Selected portfolio as exposed to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDetails {
    #[serde(serialize_with = "ordered_map::serialize")]
    pub selected_companies_roi: Vec<(String, f64)>,
    #[serde(serialize_with = "ordered_map::serialize")]
    pub investment_ratios: Vec<(String, f64)>,
    pub weighted_avg_roi: f64,
}

impl From<&PipelineResult> for PlanDetails {
    fn from(result: &PipelineResult) -> Self {
        Self {
            selected_companies_roi: result.selected_instruments(),
            investment_ratios: result.investment_ratios(),
            weighted_avg_roi: result.weighted_avg_roi,
        }
    }
}

/// Future values for every configured horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FutureValueQuote {
    pub future_values: Vec<HorizonValue>,
    /// Portfolio ROI (percent) the projection used
    pub weighted_roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    PlanDetails {
        success: bool,
        data: PlanDetails,
    },
    FutureValues {
        success: bool,
        future_values: Vec<HorizonValue>,
        weighted_roi: f64,
    },
    Error {
        success: bool,
        error: String,
        kind: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl PlanResponse {
    fn ok(body: ResponseBody) -> Self {
        Self { status_code: 200, body }
    }

    fn failure(err: &PlanError) -> Self {
        error!("Request failed ({}): {}", err.kind(), err);
        Self {
            status_code: err.status_code(),
            body: ResponseBody::Error {
                success: false,
                error: err.user_message(),
                kind: err.kind(),
            },
        }
    }
}

/// Coerce a JSON investment amount (number or numeric string) to f64
pub fn parse_investment(value: &Value) -> Result<f64, PlanError> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.ok_or_else(|| {
        PlanError::InvalidInvestment(format!("monthly_investment must be a number, got {}", value))
    })
}

#[derive(Debug)]
pub struct PlanService {
    config: PlanConfig,
    cache: AnalysisCache,
}

impl PlanService {
    /// Service reading prices from `config.data_path`
    pub fn new(config: PlanConfig) -> Self {
        let cache = AnalysisCache::from_path(config.data_path.clone());
        Self { config, cache }
    }

    /// Service over a caller-supplied cache
    pub fn with_cache(config: PlanConfig, cache: AnalysisCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Run the analysis ahead of the first request
    pub fn warm_up(&self) -> Result<Arc<PipelineResult>, PlanError> {
        let result = self.cache.get_or_compute()?;
        info!(
            "Initial analysis complete: {} instruments selected",
            result.portfolio.len()
        );
        Ok(result)
    }

    pub fn plan_details(&self) -> Result<PlanDetails, PlanError> {
        let result = self.cache.get_or_compute()?;
        Ok(PlanDetails::from(result.as_ref()))
    }

    /// Project `monthly_investment` at the portfolio's weighted ROI
    pub fn future_values(&self, monthly_investment: f64) -> Result<FutureValueQuote, PlanError> {
        self.validate_investment(monthly_investment)?;

        let result = self.cache.get_or_compute()?;
        let future_values = project_horizons(
            monthly_investment,
            result.weighted_avg_roi,
            self.config.periods_per_year,
            &self.config.horizons_years,
        )?;

        Ok(FutureValueQuote {
            future_values,
            weighted_roi: result.weighted_avg_roi,
        })
    }

    fn validate_investment(&self, amount: f64) -> Result<(), PlanError> {
        if !amount.is_finite() || amount <= 0.0 || amount < self.config.min_monthly_investment {
            return Err(PlanError::InvalidInvestment(format!(
                "Please enter a monthly investment amount of {} or greater",
                self.config.min_monthly_investment
            )));
        }
        Ok(())
    }

    /// Dispatch a request and render the response envelope
    pub fn handle(&self, request: &PlanRequest) -> PlanResponse {
        match request {
            PlanRequest::PlanDetails => match self.plan_details() {
                Ok(data) => PlanResponse::ok(ResponseBody::PlanDetails { success: true, data }),
                Err(e) => PlanResponse::failure(&e),
            },
            PlanRequest::CalculateFutureValue { monthly_investment } => {
                match parse_investment(monthly_investment).and_then(|amt| self.future_values(amt)) {
                    Ok(quote) => PlanResponse::ok(ResponseBody::FutureValues {
                        success: true,
                        future_values: quote.future_values,
                        weighted_roi: quote.weighted_roi,
                    }),
                    Err(e) => PlanResponse::failure(&e),
                }
            }
        }
    }
}

/// Serialize `(key, value)` pairs as a JSON object, keeping their order
mod ordered_map {
    use serde::ser::{SerializeMap, Serializer};

    pub fn serialize<S: Serializer>(
        pairs: &[(String, f64)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, value) in pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisError;
    use serde_json::json;

    fn sample_service() -> PlanService {
        PlanService::new(PlanConfig::default())
    }

    #[test]
    fn test_plan_details_from_sample() {
        let service = sample_service();
        let details = service.plan_details().unwrap();
        assert_eq!(details.selected_companies_roi.len(), 1);
        assert_eq!(details.investment_ratios, vec![("ALPHA".to_string(), 1.0)]);

        let body = serde_json::to_value(&details).unwrap();
        assert_eq!(body["investment_ratios"], json!({"ALPHA": 1.0}));
    }

    #[test]
    fn test_future_values_use_cached_roi() {
        let service = sample_service();
        let quote = service.future_values(1000.0).unwrap();

        assert_eq!(quote.future_values.len(), 8);
        assert_eq!(quote.future_values[0].years, 1);
        assert!((quote.weighted_roi - 10.0).abs() < 1e-9);
        assert_eq!(service.cache().cache_misses(), 1);

        service.future_values(5000.0).unwrap();
        assert_eq!(service.cache().cache_misses(), 1);
    }

    #[test]
    fn test_investment_below_minimum() {
        let service = sample_service();
        let err = service.future_values(999.0).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInvestment(_)));
        assert_eq!(err.status_code(), 400);
        // Validation happens before the analysis runs
        assert_eq!(service.cache().cache_misses(), 0);
    }

    #[test]
    fn test_parse_investment() {
        assert_eq!(parse_investment(&json!(2500)).unwrap(), 2500.0);
        assert_eq!(parse_investment(&json!(" 1500.5 ")).unwrap(), 1500.5);
        assert!(parse_investment(&json!(null)).is_err());
        assert!(parse_investment(&json!("lots")).is_err());
    }

    #[test]
    fn test_request_routing() {
        let service = sample_service();

        let request: PlanRequest = serde_json::from_value(json!({
            "action": "calculate_future_value",
            "monthly_investment": "2000"
        }))
        .unwrap();
        let response = service.handle(&request);
        assert_eq!(response.status_code, 200);
        let body = serde_json::to_value(&response.body).unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["future_values"].as_array().unwrap().len(), 8);

        let request: PlanRequest =
            serde_json::from_value(json!({"action": "plan_details"})).unwrap();
        let body = serde_json::to_value(&service.handle(&request).body).unwrap();
        assert_eq!(body["data"]["selected_companies_roi"]["ALPHA"], json!(result_roi(&service)));
    }

    fn result_roi(service: &PlanService) -> f64 {
        service.cache().peek().unwrap().portfolio[0].roi
    }

    #[test]
    fn test_analysis_failure_envelope() {
        let cache = AnalysisCache::new(Box::new(|| -> Result<PipelineResult, PlanError> {
            Err(AnalysisError::ZeroVolatilitySum.into())
        }));
        let service = PlanService::with_cache(PlanConfig::default(), cache);

        let response = service.handle(&PlanRequest::PlanDetails);
        assert_eq!(response.status_code, 500);
        match response.body {
            ResponseBody::Error { success, error, kind } => {
                assert!(!success);
                assert!(error.starts_with("Data analysis error:"));
                assert_eq!(kind, "zero_volatility_sum");
            }
            other => panic!("expected error body, got {:?}", other),
        }
    }
}
