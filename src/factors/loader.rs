//! CSV factor table loader
//!
//! One logical table per CSV file, named after the file stem. Each row
//! carries the common `factor_type`, `factor_name`, `factor_value`,
//! `description` columns plus category-specific condition columns. This is
//! the only place that understands the per-category columns; everything
//! after load works on [`Condition`] values.

use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use super::{Condition, FactorRecord, FactorType};

/// Result of scanning a factor directory.
#[derive(Debug, Default)]
pub struct LoadedTables {
    pub tables: BTreeMap<String, Vec<FactorRecord>>,
    /// Rows dropped because a column failed to parse
    pub skipped_rows: usize,
}

/// Load every `*.csv` table found in `dir`.
///
/// A missing directory is a warning, not an error. A table whose file
/// cannot be opened or whose header is unreadable is skipped with a
/// warning. Individual malformed rows are skipped and counted.
pub fn load_factor_dir(dir: &Path) -> Result<LoadedTables, Box<dyn Error>> {
    let mut loaded = LoadedTables::default();

    if !dir.is_dir() {
        warn!("factors directory {} not found", dir.display());
        return Ok(loaded);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(table) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!("skipping factor table {}: {e}", path.display());
                continue;
            }
        };
        match load_table_from_reader(&table, BufReader::new(file)) {
            Ok((records, skipped)) => {
                info!("loaded {} factors from {table}", records.len());
                loaded.skipped_rows += skipped;
                loaded.tables.insert(table, records);
            }
            Err(e) => warn!("skipping factor table {table}: {e}"),
        }
    }

    Ok(loaded)
}

/// Parse one factor table from any reader. Returns the parsed records and
/// the number of rows skipped.
pub fn load_table_from_reader<R: Read>(
    table: &str,
    reader: R,
) -> Result<(Vec<FactorRecord>, usize), csv::Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in csv_reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed row in {table}: {e}");
                skipped += 1;
                continue;
            }
        };
        match parse_factor_row(&headers, &row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("skipping factor row in {table}: {e}");
                skipped += 1;
            }
        }
    }

    Ok((records, skipped))
}

/// Parse a single row using the table's header for column addressing.
/// Empty cells count as absent.
fn parse_factor_row(
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
) -> Result<FactorRecord, Box<dyn Error>> {
    let get = |name: &str| -> Option<&str> {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let factor_type: FactorType = get("factor_type").ok_or("missing factor_type")?.parse()?;
    let factor_name = get("factor_name").unwrap_or_default().to_string();
    let factor_value: f64 = match get("factor_value") {
        Some(v) => v.parse()?,
        None => 1.0,
    };
    let description = get("description").unwrap_or_default().to_string();

    let mut conditions = Vec::new();
    match factor_type {
        FactorType::DriverAge => {
            if let Some(v) = get("min_age") {
                conditions.push(Condition::MinAge(v.parse()?));
            }
            if let Some(v) = get("max_age") {
                conditions.push(Condition::MaxAge(v.parse()?));
            }
        }
        FactorType::VehicleType => {
            if let Some(v) = get("vehicle_type") {
                conditions.push(Condition::VehicleType(v.parse()?));
            }
        }
        FactorType::VehicleUsage => {
            if let Some(v) = get("vehicle_usage") {
                conditions.push(Condition::VehicleUsage(v.parse()?));
            }
        }
        FactorType::SafetyFeatures => {
            if let Some(v) = get("safety_feature") {
                conditions.push(Condition::SafetyFeature(v.to_string()));
            }
        }
        FactorType::AccidentHistory => {
            if let Some(v) = get("accident_count") {
                conditions.push(Condition::AccidentCount(v.parse()?));
            }
            if let Some(v) = get("accident_type") {
                conditions.push(Condition::AccidentClass(v.parse()?));
            }
        }
        FactorType::ViolationHistory => {
            if let Some(v) = get("violation_count") {
                conditions.push(Condition::ViolationCount(v.parse()?));
            }
            if let Some(v) = get("violation_type") {
                conditions.push(Condition::ViolationClass(v.parse()?));
            }
        }
        FactorType::MultiCar => {
            if let Some(v) = get("car_count") {
                conditions.push(Condition::CarCount(v.parse()?));
            }
            if let Some(v) = get("min_count") {
                conditions.push(Condition::MinCount(v.parse()?));
            }
            if let Some(v) = get("max_count") {
                conditions.push(Condition::MaxCount(v.parse()?));
            }
        }
        FactorType::Location => {
            if let Some(v) = get("state") {
                conditions.push(Condition::State(v.to_string()));
            }
            if let Some(v) = get("region") {
                conditions.push(Condition::Region(v.to_string()));
            }
        }
        // No condition columns; credit tiers always apply when present
        FactorType::CreditScore => {}
    }

    Ok(FactorRecord { factor_type, factor_name, factor_value, description, conditions })
}
