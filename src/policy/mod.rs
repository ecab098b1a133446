//! Policy input records: coverages, terms, vehicles, drivers
//!
//! Plain immutable value types consumed by the rating pipeline. Nothing in
//! here is mutated during a calculation.

mod data;

pub use data::{
    Accident, AccidentClass, Coverage, CoverageType, Driver, PolicyTerm, Vehicle, VehicleType,
    VehicleUsage, Violation, ViolationClass, ViolationKind,
};
