//! Batch quoting over a scenario file
//!
//! Reads a JSON array of named quote requests, prices them in parallel
//! against shared read-only tables, and writes a CSV summary.

use anyhow::{anyhow, Context};
use clap::Parser;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use rating_engine::error::RatingError;
use rating_engine::factors::FactorEngine;
use rating_engine::rates;
use rating_engine::{PremiumCalculator, QuoteRequest, QuoteResult};

#[derive(Debug, Parser)]
#[command(name = "batch_quote", about = "Price a batch of quote scenarios")]
struct Args {
    /// JSON file with a list of named quote requests
    scenarios: PathBuf,

    /// Rate table JSON file
    #[arg(long, default_value = "data/rate_table.json")]
    rates: PathBuf,

    /// Directory of factor CSV tables
    #[arg(long, default_value = "data/rating_factors")]
    factors: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = "batch_quotes.csv")]
    output: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    #[serde(flatten)]
    request: QuoteRequest,
}

/// Write one summary row per result; returns the failure count. Field
/// escaping is the writer's job, so scenario names and error strings may
/// contain commas or quotes.
fn write_summary<W: Write>(
    writer: &mut csv::Writer<W>,
    results: &[(String, Result<QuoteResult, RatingError>)],
) -> Result<usize, csv::Error> {
    writer.write_record(["Scenario", "TotalPremium", "MultiYear", "Coverages", "Error"])?;

    let mut failures = 0usize;
    for (name, result) in results {
        match result {
            Ok(quote) => writer.write_record([
                name.clone(),
                quote.total_premium.to_string(),
                quote.policy_summary.is_multi_year.to_string(),
                quote.coverage_breakdown.len().to_string(),
                String::new(),
            ])?,
            Err(e) => {
                failures += 1;
                writer.write_record([
                    name.clone(),
                    String::new(),
                    String::new(),
                    String::new(),
                    e.to_string(),
                ])?;
            }
        }
    }

    Ok(failures)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let rate_table = rates::load_rate_table(&args.rates)
        .map_err(|e| anyhow!("loading rate table {}: {e}", args.rates.display()))?;
    let factor_engine = FactorEngine::load_dir(&args.factors)
        .map_err(|e| anyhow!("loading factor tables {}: {e}", args.factors.display()))?;

    let file = File::open(&args.scenarios)
        .with_context(|| format!("opening {}", args.scenarios.display()))?;
    let scenarios: Vec<Scenario> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", args.scenarios.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    // The tables are read-only, so every worker shares the same references
    let quote_start = Instant::now();
    let results: Vec<(String, Result<_, _>)> = scenarios
        .par_iter()
        .map(|scenario| {
            let calculator = PremiumCalculator::new(&rate_table, &factor_engine);
            (scenario.name.clone(), calculator.quote(&scenario.request))
        })
        .collect();
    println!("Priced {} scenarios in {:?}", results.len(), quote_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let failures = write_summary(&mut writer, &results)?;
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    if failures > 0 {
        println!("{failures} scenarios failed to price");
    }
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_engine::calculator::{
        CoverageBreakdown, DriverSummary, PolicySummary, VehicleSummary,
    };
    use rating_engine::policy::{CoverageType, VehicleType, VehicleUsage};
    use std::collections::BTreeMap;

    fn sample_result() -> QuoteResult {
        let mut coverage_breakdown = BTreeMap::new();
        coverage_breakdown.insert(
            CoverageType::BodilyInjury,
            CoverageBreakdown {
                premium: 150,
                limit: 100_000.0,
                deductible: 0.0,
                is_required: true,
            },
        );
        QuoteResult {
            total_premium: 150,
            coverage_breakdown,
            policy_summary: PolicySummary {
                effective_date: "2024-01-01".parse().unwrap(),
                expiry_date: "2025-01-01".parse().unwrap(),
                is_renewal: false,
                is_multi_year: false,
            },
            vehicle_summary: VehicleSummary {
                year: 2022,
                make: "Toyota".to_string(),
                model: "Camry".to_string(),
                vehicle_type: VehicleType::Sedan,
                usage: VehicleUsage::Commuting,
            },
            primary_driver: DriverSummary { name: "A".to_string(), age: 34 },
        }
    }

    #[test]
    fn test_summary_rows_carry_names_and_escape_fields() {
        let results = vec![
            ("plain".to_string(), Ok(sample_result())),
            (
                "fleet, \"west\"".to_string(),
                Err(RatingError::EmptyDriverList),
            ),
        ];

        let mut writer = csv::Writer::from_writer(Vec::new());
        let failures = write_summary(&mut writer, &results).unwrap();
        assert_eq!(failures, 1);

        let bytes = writer.into_inner().unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(&rows[0][0], "plain");
        assert_eq!(&rows[0][1], "150");
        assert_eq!(&rows[0][4], "");

        // Commas and quotes in the name survive the round trip, and the
        // error row keeps its scenario name
        assert_eq!(&rows[1][0], "fleet, \"west\"");
        assert_eq!(&rows[1][1], "");
        assert!(rows[1][4].contains("no driver"));
    }
}
