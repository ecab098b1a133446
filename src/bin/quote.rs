//! Single-quote CLI
//!
//! Prices one quote request against a rate table and a factor directory and
//! prints the breakdown. Run with `RUST_LOG=debug` to see every rounding
//! checkpoint and applied factor.

use anyhow::{anyhow, Context};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use rating_engine::calculator::LogTrace;
use rating_engine::factors::FactorEngine;
use rating_engine::rates;
use rating_engine::{PremiumCalculator, QuoteRequest};

#[derive(Debug, Parser)]
#[command(name = "quote", about = "Price a single quote request")]
struct Args {
    /// Quote request JSON file
    request: PathBuf,

    /// Rate table JSON file
    #[arg(long, default_value = "data/rate_table.json")]
    rates: PathBuf,

    /// Directory of factor CSV tables
    #[arg(long, default_value = "data/rating_factors")]
    factors: PathBuf,

    /// Emit the result as JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let rate_table = rates::load_rate_table(&args.rates)
        .map_err(|e| anyhow!("loading rate table {}: {e}", args.rates.display()))?;
    let factor_engine = FactorEngine::load_dir(&args.factors)
        .map_err(|e| anyhow!("loading factor tables {}: {e}", args.factors.display()))?;
    if factor_engine.skipped_rows() > 0 {
        eprintln!("warning: {} factor rows skipped", factor_engine.skipped_rows());
    }

    let file = File::open(&args.request)
        .with_context(|| format!("opening {}", args.request.display()))?;
    let request: QuoteRequest = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", args.request.display()))?;

    let trace = LogTrace;
    let calculator = PremiumCalculator::with_trace(&rate_table, &factor_engine, &trace);
    let result = calculator.quote(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Premium Quote (Rule 2)");
    println!("======================\n");
    println!(
        "Policy: {} to {}{}",
        result.policy_summary.effective_date,
        result.policy_summary.expiry_date,
        if result.policy_summary.is_multi_year { " (multi-year)" } else { "" },
    );
    println!(
        "Vehicle: {} {} {} ({}, {})",
        result.vehicle_summary.year,
        result.vehicle_summary.make,
        result.vehicle_summary.model,
        result.vehicle_summary.vehicle_type,
        result.vehicle_summary.usage,
    );
    println!(
        "Primary Driver: {} (age {})\n",
        result.primary_driver.name, result.primary_driver.age,
    );

    for (coverage_type, line) in &result.coverage_breakdown {
        println!(
            "{:<28} ${:>8}   limit ${:.0}, deductible ${:.0}{}",
            coverage_type.to_string(),
            line.premium,
            line.limit,
            line.deductible,
            if line.is_required { " (required)" } else { "" },
        );
    }

    println!("\nTotal Premium: ${}", result.total_premium);

    Ok(())
}
