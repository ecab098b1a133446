//! Date-effective base rate tables
//!
//! A rate table is built once by the loader and read-only afterwards, so
//! shared references can be used freely across threads.

pub mod loader;

pub use loader::{load_rate_table, rate_table_from_reader, save_rate_table};

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::RatingError;
use crate::policy::{CoverageType, VehicleType, VehicleUsage};

/// Age band descriptor attached to a rate table entry.
///
/// Exactly one interpretation applies per string form: `"A-B"` is an
/// inclusive interval, `"N+"` is open above, and a bare number matches that
/// age only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeRange {
    /// Inclusive interval `A-B`
    Range(u32, u32),
    /// Open upper interval `N+`
    Open(u32),
    /// Single exact age
    Exact(u32),
}

impl AgeRange {
    pub fn contains(&self, age: u32) -> bool {
        match *self {
            AgeRange::Range(min, max) => min <= age && age <= max,
            AgeRange::Open(min) => age >= min,
            AgeRange::Exact(n) => age == n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid age range: {0:?}")]
pub struct ParseAgeRangeError(pub String);

impl FromStr for AgeRange {
    type Err = ParseAgeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseAgeRangeError(s.to_string());

        if let Some(min) = s.strip_suffix('+') {
            let min: u32 = min.parse().map_err(|_| malformed())?;
            return Ok(AgeRange::Open(min));
        }

        if let Some((min, max)) = s.split_once('-') {
            let min: u32 = min.parse().map_err(|_| malformed())?;
            let max: u32 = max.parse().map_err(|_| malformed())?;
            if min > max {
                return Err(malformed());
            }
            return Ok(AgeRange::Range(min, max));
        }

        let age: u32 = s.parse().map_err(|_| malformed())?;
        Ok(AgeRange::Exact(age))
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AgeRange::Range(min, max) => write!(f, "{min}-{max}"),
            AgeRange::Open(min) => write!(f, "{min}+"),
            AgeRange::Exact(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for AgeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AgeRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// The persisted form uses an empty string for "no expiry".
fn deserialize_expiry<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(D::Error::custom),
    }
}

fn serialize_expiry<S: Serializer>(
    value: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(date) => serializer.serialize_str(&date.to_string()),
        None => serializer.serialize_str(""),
    }
}

/// Individual rate table entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableEntry {
    pub coverage_type: CoverageType,
    pub vehicle_type: VehicleType,
    pub usage: VehicleUsage,
    pub age_range: AgeRange,
    pub base_rate: f64,
    pub effective_date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        serialize_with = "serialize_expiry"
    )]
    pub expiry_date: Option<NaiveDate>,
}

impl RateTableEntry {
    fn in_force_on(&self, date: NaiveDate) -> bool {
        self.effective_date <= date && self.expiry_date.map_or(true, |expiry| expiry >= date)
    }
}

/// Rate table: searched by exact categorical match plus date-range and
/// age-range containment. Insertion order is irrelevant.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    entries: Vec<RateTableEntry>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RateTableEntry>) -> Self {
        Self { entries }
    }

    pub fn add_entry(&mut self, entry: RateTableEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RateTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the base rate for a lookup key on a rate date.
    ///
    /// Among entries matching the key, in force on the date, and whose age
    /// band contains the driver age, the one with the latest effective date
    /// wins. No match is a hard `RateNotFound`; a tie on the latest
    /// effective date is a hard `AmbiguousRate`.
    pub fn base_rate(
        &self,
        coverage_type: CoverageType,
        vehicle_type: VehicleType,
        usage: VehicleUsage,
        driver_age: u32,
        rate_date: NaiveDate,
    ) -> Result<f64, RatingError> {
        let matching: Vec<&RateTableEntry> = self
            .entries
            .iter()
            .filter(|e| {
                e.coverage_type == coverage_type
                    && e.vehicle_type == vehicle_type
                    && e.usage == usage
                    && e.in_force_on(rate_date)
                    && e.age_range.contains(driver_age)
            })
            .collect();

        let Some(latest) = matching.iter().map(|e| e.effective_date).max() else {
            return Err(RatingError::RateNotFound {
                coverage_type: coverage_type.to_string(),
                vehicle_type: vehicle_type.to_string(),
                usage: usage.to_string(),
                driver_age,
                rate_date,
            });
        };

        let tied: Vec<_> = matching
            .iter()
            .filter(|e| e.effective_date == latest)
            .collect();
        match tied.as_slice() {
            [winner] => Ok(winner.base_rate),
            _ => Err(RatingError::AmbiguousRate {
                coverage_type: coverage_type.to_string(),
                vehicle_type: vehicle_type.to_string(),
                usage: usage.to_string(),
                driver_age,
                effective_date: latest,
                count: tied.len(),
            }),
        }
    }
}
