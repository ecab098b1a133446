//! Policy data structures matching the quote request format

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Insurance coverage types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoverageType {
    /// Liability - bodily injury
    #[serde(rename = "Bodily Injury")]
    BodilyInjury,
    /// Liability - property damage
    #[serde(rename = "Property Damage")]
    PropertyDamage,
    #[serde(rename = "Personal Injury Protection")]
    PersonalInjuryProtection,
    #[serde(rename = "Uninsured Motorist")]
    UninsuredMotorist,
    #[serde(rename = "Underinsured Motorist")]
    UnderinsuredMotorist,
    Collision,
    Comprehensive,
}

impl CoverageType {
    /// String form used in rate tables and result breakdowns
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::BodilyInjury => "Bodily Injury",
            CoverageType::PropertyDamage => "Property Damage",
            CoverageType::PersonalInjuryProtection => "Personal Injury Protection",
            CoverageType::UninsuredMotorist => "Uninsured Motorist",
            CoverageType::UnderinsuredMotorist => "Underinsured Motorist",
            CoverageType::Collision => "Collision",
            CoverageType::Comprehensive => "Comprehensive",
        }
    }
}

impl fmt::Display for CoverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual coverage configuration. Fixed input, never mutated during
/// a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coverage {
    pub coverage_type: CoverageType,

    /// Coverage limit amount
    pub limit: f64,

    /// Deductible amount
    #[serde(default)]
    pub deductible: f64,

    /// Whether this coverage is mandatory
    #[serde(default)]
    pub is_required: bool,
}

/// Vehicle type classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Truck,
    Motorcycle,
    Commercial,
    Agricultural,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Sedan => "Sedan",
            VehicleType::Suv => "SUV",
            VehicleType::Truck => "Truck",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Commercial => "Commercial",
            VehicleType::Agricultural => "Agricultural",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sedan" => Ok(VehicleType::Sedan),
            "SUV" => Ok(VehicleType::Suv),
            "Truck" => Ok(VehicleType::Truck),
            "Motorcycle" => Ok(VehicleType::Motorcycle),
            "Commercial" => Ok(VehicleType::Commercial),
            "Agricultural" => Ok(VehicleType::Agricultural),
            other => Err(format!("unknown vehicle type: {other:?}")),
        }
    }
}

/// Vehicle usage types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleUsage {
    Commuting,
    Business,
    Agricultural,
    Pleasure,
}

impl VehicleUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleUsage::Commuting => "Commuting",
            VehicleUsage::Business => "Business",
            VehicleUsage::Agricultural => "Agricultural",
            VehicleUsage::Pleasure => "Pleasure",
        }
    }
}

impl fmt::Display for VehicleUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleUsage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Commuting" => Ok(VehicleUsage::Commuting),
            "Business" => Ok(VehicleUsage::Business),
            "Agricultural" => Ok(VehicleUsage::Agricultural),
            "Pleasure" => Ok(VehicleUsage::Pleasure),
            other => Err(format!("unknown vehicle usage: {other:?}")),
        }
    }
}

/// Vehicle information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub year: u16,
    pub make: String,
    pub model: String,
    pub vehicle_type: VehicleType,
    pub usage: VehicleUsage,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub safety_features: Vec<String>,
}

/// A recorded accident on a driver's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accident {
    #[serde(default)]
    pub at_fault: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Violation types appearing on a driving record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Dui,
    Major,
    Speeding,
    Minor,
}

impl ViolationKind {
    /// DUI and explicitly-major violations classify the whole record as major
    pub fn is_major(&self) -> bool {
        matches!(self, ViolationKind::Dui | ViolationKind::Major)
    }
}

/// A recorded traffic violation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    #[serde(default)]
    pub description: Option<String>,
}

/// Accident-history classification derived from a driver's record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccidentClass {
    /// No accidents on record
    None,
    /// Accidents on record, none at fault
    Any,
    /// At least one at-fault accident
    AtFault,
}

impl fmt::Display for AccidentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccidentClass::None => "none",
            AccidentClass::Any => "any",
            AccidentClass::AtFault => "at_fault",
        };
        f.write_str(s)
    }
}

impl FromStr for AccidentClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AccidentClass::None),
            "any" => Ok(AccidentClass::Any),
            "at_fault" => Ok(AccidentClass::AtFault),
            other => Err(format!("unknown accident class: {other:?}")),
        }
    }
}

/// Violation-history classification derived from a driver's record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationClass {
    None,
    Minor,
    Major,
}

impl fmt::Display for ViolationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationClass::None => "none",
            ViolationClass::Minor => "minor",
            ViolationClass::Major => "major",
        };
        f.write_str(s)
    }
}

impl FromStr for ViolationClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ViolationClass::None),
            "minor" => Ok(ViolationClass::Minor),
            "major" => Ok(ViolationClass::Major),
            other => Err(format!("unknown violation class: {other:?}")),
        }
    }
}

/// Driver information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub name: String,
    pub birth_date: NaiveDate,
    pub license_number: String,
    pub license_state: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub accidents: Vec<Accident>,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

impl Driver {
    /// Calendar age at a reference date: year difference, minus one when the
    /// reference month/day falls before the birthday.
    pub fn age_on(&self, reference: NaiveDate) -> u32 {
        let mut age = reference.year() - self.birth_date.year();
        if (reference.month(), reference.day()) < (self.birth_date.month(), self.birth_date.day())
        {
            age -= 1;
        }
        age.max(0) as u32
    }

    /// Classify the accident history: `none`, `any`, or `at_fault`.
    pub fn accident_class(&self) -> AccidentClass {
        if self.accidents.is_empty() {
            AccidentClass::None
        } else if self.accidents.iter().any(|a| a.at_fault) {
            AccidentClass::AtFault
        } else {
            AccidentClass::Any
        }
    }

    /// Classify the violation history: `none`, `minor`, or `major`.
    pub fn violation_class(&self) -> ViolationClass {
        if self.violations.is_empty() {
            ViolationClass::None
        } else if self.violations.iter().any(|v| v.kind.is_major()) {
            ViolationClass::Major
        } else {
            ViolationClass::Minor
        }
    }
}

/// Policy term dates and renewal status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyTerm {
    pub effective_date: NaiveDate,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub is_renewal: bool,
    #[serde(default)]
    pub renewal_date: Option<NaiveDate>,
}

impl PolicyTerm {
    /// The date used for every rate and factor table lookup: the renewal
    /// date for renewals that carry one, otherwise the effective date.
    pub fn rate_date(&self) -> NaiveDate {
        if self.is_renewal {
            if let Some(renewal) = self.renewal_date {
                return renewal;
            }
        }
        self.effective_date
    }
}
