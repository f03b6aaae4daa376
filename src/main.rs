//! Portfolio Planner CLI
//!
//! Command-line interface for the portfolio analysis and SIP projections

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portfolio_planner::{PlanConfig, PlanService};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "portfolio_planner", version, about = "Low-volatility portfolio planner")]
struct Cli {
    /// Closing-price CSV (overrides the config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the selected instruments, weights and weighted ROI
    Plan,
    /// Project a monthly investment over the configured horizons
    Project {
        #[arg(long)]
        monthly_investment: f64,
    },
}

fn load_config(cli: &Cli) -> Result<PlanConfig> {
    let mut config = match &cli.config {
        Some(path) => PlanConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlanConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let service = PlanService::new(config);

    match cli.command {
        Command::Plan => {
            let details = service.plan_details().map_err(|e| anyhow::anyhow!(e.user_message()))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&details)?);
                return Ok(());
            }

            println!("Selected instruments ({}):", details.selected_companies_roi.len());
            println!("{:<16} {:>12}", "Instrument", "ROI %");
            println!("{}", "-".repeat(29));
            for (id, roi) in &details.selected_companies_roi {
                println!("{:<16} {:>12.4}", id, roi);
            }

            println!("\nInvestment ratios:");
            for (id, ratio) in &details.investment_ratios {
                println!("{:<16} {:>11.2}%", id, ratio * 100.0);
            }

            println!("\nWeighted average ROI: {:.4}%", details.weighted_avg_roi);
        }
        Command::Project { monthly_investment } => {
            let quote = service
                .future_values(monthly_investment)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
                return Ok(());
            }

            println!(
                "Monthly investment {:.2} at weighted ROI {:.4}%",
                monthly_investment, quote.weighted_roi
            );
            println!("{:>6} {:>18}", "Years", "Future value");
            println!("{}", "-".repeat(25));
            for row in &quote.future_values {
                println!("{:>6} {:>18.2}", row.years, row.future_value);
            }
        }
    }

    Ok(())
}
