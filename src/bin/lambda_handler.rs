//! AWS Lambda handler for the portfolio planner
//!
//! Accepts `{"action": "plan_details"}` or
//! `{"action": "calculate_future_value", "monthly_investment": 5000}` and
//! returns `{status_code, body}` with the `{success, ...}` envelope as body.
//!
//! The analysis runs once at cold start and is served from the cache after.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{error, info};
use portfolio_planner::service::{PlanRequest, PlanResponse, PlanService};
use portfolio_planner::PlanConfig;
use std::sync::Arc;

async fn handler(
    service: &PlanService,
    event: LambdaEvent<PlanRequest>,
) -> Result<PlanResponse, Error> {
    let LambdaEvent { payload: request, context } = event;
    info!("Request {}: {:?}", context.request_id, request);
    Ok(service.handle(&request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = PlanConfig::from_env();
    info!("Performing initial stock data analysis from {}", config.data_path.display());
    let service = Arc::new(PlanService::new(config));

    // Without an analysis nothing can be served
    if let Err(e) = service.warm_up() {
        error!("Failed to perform initial data analysis: {}", e.user_message());
        return Err(e.into());
    }

    run(service_fn(move |event: LambdaEvent<PlanRequest>| {
        let service = Arc::clone(&service);
        async move { handler(&service, event).await }
    }))
    .await
}
