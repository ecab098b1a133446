//! Rating factor tables and the condition-matching engine
//!
//! Factor rows come from CSV tables (one table per category, see
//! [`loader`]). Category-specific condition columns are parsed into the
//! [`Condition`] variants at load time, so matching itself is
//! category-agnostic: a record applies when every one of its conditions
//! holds against the calculation context, and a record with no conditions
//! always applies.
//!
//! Tables are built once at construction and read-only afterwards;
//! concurrent read-only use from multiple threads needs no locking.

pub mod loader;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::context::CalcContext;
use crate::policy::{AccidentClass, VehicleType, VehicleUsage, ViolationClass};

/// Factor categories, one per source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorType {
    DriverAge,
    VehicleType,
    VehicleUsage,
    MultiCar,
    SafetyFeatures,
    AccidentHistory,
    ViolationHistory,
    Location,
    CreditScore,
}

impl FactorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorType::DriverAge => "DRIVER_AGE",
            FactorType::VehicleType => "VEHICLE_TYPE",
            FactorType::VehicleUsage => "VEHICLE_USAGE",
            FactorType::MultiCar => "MULTI_CAR",
            FactorType::SafetyFeatures => "SAFETY_FEATURES",
            FactorType::AccidentHistory => "ACCIDENT_HISTORY",
            FactorType::ViolationHistory => "VIOLATION_HISTORY",
            FactorType::Location => "LOCATION",
            FactorType::CreditScore => "CREDIT_SCORE",
        }
    }
}

impl fmt::Display for FactorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRIVER_AGE" => Ok(FactorType::DriverAge),
            "VEHICLE_TYPE" => Ok(FactorType::VehicleType),
            "VEHICLE_USAGE" => Ok(FactorType::VehicleUsage),
            "MULTI_CAR" => Ok(FactorType::MultiCar),
            "SAFETY_FEATURES" => Ok(FactorType::SafetyFeatures),
            "ACCIDENT_HISTORY" => Ok(FactorType::AccidentHistory),
            "VIOLATION_HISTORY" => Ok(FactorType::ViolationHistory),
            "LOCATION" => Ok(FactorType::Location),
            "CREDIT_SCORE" => Ok(FactorType::CreditScore),
            other => Err(format!("unknown factor type: {other:?}")),
        }
    }
}

/// One condition attached to a factor record, built once when the row is
/// parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Driver age at or above the bound
    MinAge(u32),
    /// Driver age at or below the bound
    MaxAge(u32),
    /// Car count at or above the bound
    MinCount(u32),
    /// Car count at or below the bound
    MaxCount(u32),
    /// Exact accident count
    AccidentCount(u32),
    /// Exact violation count
    ViolationCount(u32),
    /// Exact car count
    CarCount(u32),
    VehicleType(VehicleType),
    VehicleUsage(VehicleUsage),
    /// Named feature present on the vehicle
    SafetyFeature(String),
    AccidentClass(AccidentClass),
    ViolationClass(ViolationClass),
    /// Driver's license state
    State(String),
    /// Rating region; the standard context carries none, so this only
    /// matches when a caller populates one
    Region(String),
}

impl Condition {
    /// Whether this condition holds against the context. A condition
    /// referencing an absent context field is unsatisfied.
    pub fn matches(&self, ctx: &CalcContext) -> bool {
        match self {
            Condition::MinAge(min) => ctx.driver_age >= *min,
            Condition::MaxAge(max) => ctx.driver_age <= *max,
            Condition::MinCount(min) => ctx.car_count >= *min,
            Condition::MaxCount(max) => ctx.car_count <= *max,
            Condition::AccidentCount(n) => ctx.accident_count == *n,
            Condition::ViolationCount(n) => ctx.violation_count == *n,
            Condition::CarCount(n) => ctx.car_count == *n,
            Condition::VehicleType(vt) => ctx.vehicle_type == *vt,
            Condition::VehicleUsage(vu) => ctx.vehicle_usage == *vu,
            Condition::SafetyFeature(feature) => {
                ctx.safety_features.iter().any(|f| f == feature)
            }
            Condition::AccidentClass(class) => ctx.accident_class == *class,
            Condition::ViolationClass(class) => ctx.violation_class == *class,
            Condition::State(state) => ctx.state == *state,
            Condition::Region(region) => ctx.region.as_deref() == Some(region.as_str()),
        }
    }
}

/// Individual factor record parsed from a table row.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorRecord {
    pub factor_type: FactorType,
    pub factor_name: String,
    pub factor_value: f64,
    pub description: String,
    pub conditions: Vec<Condition>,
}

impl FactorRecord {
    /// A record applies iff every condition holds. No conditions means it
    /// always applies.
    pub fn applies(&self, ctx: &CalcContext) -> bool {
        self.conditions.iter().all(|c| c.matches(ctx))
    }
}

/// Factor engine holding every loaded table, keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct FactorEngine {
    tables: BTreeMap<String, Vec<FactorRecord>>,
    skipped_rows: usize,
    factors_dir: Option<PathBuf>,
}

impl FactorEngine {
    /// Load every `*.csv` table in a directory. A missing directory yields
    /// an empty engine with a warning; malformed rows are skipped and
    /// counted, not fatal.
    pub fn load_dir(dir: impl Into<PathBuf>) -> Result<Self, Box<dyn Error>> {
        let dir = dir.into();
        let loaded = loader::load_factor_dir(&dir)?;
        Ok(Self {
            tables: loaded.tables,
            skipped_rows: loaded.skipped_rows,
            factors_dir: Some(dir),
        })
    }

    /// Build an engine from already-parsed tables.
    pub fn from_tables(tables: BTreeMap<String, Vec<FactorRecord>>) -> Self {
        Self { tables, skipped_rows: 0, factors_dir: None }
    }

    /// Re-read the source directory. No-op for engines built from
    /// in-memory tables.
    pub fn reload(&mut self) -> Result<(), Box<dyn Error>> {
        if let Some(dir) = &self.factors_dir {
            let loaded = loader::load_factor_dir(dir)?;
            self.tables = loaded.tables;
            self.skipped_rows = loaded.skipped_rows;
        }
        Ok(())
    }

    /// Every record, across every table, that applies to the context.
    /// Reported in table-name order for stable tracing; order never affects
    /// the numeric total.
    pub fn applicable_factors(&self, ctx: &CalcContext) -> Vec<&FactorRecord> {
        self.tables
            .values()
            .flatten()
            .filter(|record| record.applies(ctx))
            .collect()
    }

    /// Product of `factor_value` over every applicable record; `1.0` when
    /// nothing applies.
    pub fn total_factor(&self, ctx: &CalcContext) -> f64 {
        self.applicable_factors(ctx)
            .iter()
            .map(|record| record.factor_value)
            .product()
    }

    /// Rows dropped during the most recent load because a column failed to
    /// parse.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Record counts per loaded table.
    pub fn table_counts(&self) -> BTreeMap<&str, usize> {
        self.tables
            .iter()
            .map(|(name, records)| (name.as_str(), records.len()))
            .collect()
    }
}
