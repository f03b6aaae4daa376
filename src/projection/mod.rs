//! Future value projection for recurring investments

mod annuity;
mod schedule;

pub use annuity::{
    checked_future_value, future_value, total_periods, ProjectionError, MAX_TOTAL_PERIODS,
};
pub use schedule::{
    project_horizons, round_to_cents, HorizonValue, DEFAULT_HORIZONS_YEARS, MONTHLY_PERIODS,
};
