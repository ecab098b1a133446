//! Calculation context for factor matching
//!
//! A fixed-shape snapshot of the inputs a factor condition can reference.
//! Built fresh per coverage calculation and never persisted; it is pure
//! input to the factor engine.

use chrono::NaiveDate;

use crate::policy::{
    AccidentClass, Coverage, CoverageType, Driver, PolicyTerm, Vehicle, VehicleType, VehicleUsage,
    ViolationClass,
};

/// Context snapshot consumed by factor matching.
#[derive(Debug, Clone)]
pub struct CalcContext {
    pub coverage_type: CoverageType,
    pub vehicle_type: VehicleType,
    pub vehicle_usage: VehicleUsage,
    /// Driver age at the rate date
    pub driver_age: u32,
    pub safety_features: Vec<String>,
    pub accident_count: u32,
    pub accident_class: AccidentClass,
    pub violation_count: u32,
    pub violation_class: ViolationClass,
    /// Number of cars on the policy; defaults to 1 unless overridden
    pub car_count: u32,
    /// Driver's license state
    pub state: String,
    /// Rating region; not populated by the standard context build, so
    /// region conditions only apply when a caller sets one
    pub region: Option<String>,
    pub is_renewal: bool,
    pub effective_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

impl CalcContext {
    /// Build the context for one coverage calculation. The driver age is
    /// taken at the term's rate date.
    pub fn build(
        coverage: &Coverage,
        vehicle: &Vehicle,
        driver: &Driver,
        term: &PolicyTerm,
    ) -> Self {
        Self {
            coverage_type: coverage.coverage_type,
            vehicle_type: vehicle.vehicle_type,
            vehicle_usage: vehicle.usage,
            driver_age: driver.age_on(term.rate_date()),
            safety_features: vehicle.safety_features.clone(),
            accident_count: driver.accidents.len() as u32,
            accident_class: driver.accident_class(),
            violation_count: driver.violations.len() as u32,
            violation_class: driver.violation_class(),
            car_count: 1,
            state: driver.license_state.clone(),
            region: None,
            is_renewal: term.is_renewal,
            effective_date: term.effective_date,
            expiry_date: term.expiry_date,
        }
    }

    /// Override the default single-car count.
    pub fn with_car_count(mut self, car_count: u32) -> Self {
        self.car_count = car_count;
        self
    }
}
