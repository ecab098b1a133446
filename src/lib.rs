//! Rating Engine - Rule 2 premium calculation for auto insurance policies
//!
//! This library provides:
//! - Date-effective base rate tables with age-band matching
//! - A condition-matching factor engine over CSV-defined rating factors
//! - Calendar-accurate term proration and multi-year splitting
//! - The mandated Rule 2 rounding pipeline and premium orchestration
//!
//! Rate and factor tables are built once by their loaders and never mutated
//! afterwards; every calculation is a pure function of those tables and its
//! inputs. Shared references to the tables can therefore be used from
//! multiple threads without locking.

pub mod calculator;
pub mod context;
pub mod error;
pub mod factors;
pub mod policy;
pub mod rates;
pub mod rounding;
pub mod term;

// Re-export commonly used types
pub use calculator::{CoverageCalculator, PremiumCalculator, QuoteRequest, QuoteResult};
pub use context::CalcContext;
pub use error::RatingError;
pub use factors::{FactorEngine, FactorRecord};
pub use policy::{Coverage, CoverageType, Driver, PolicyTerm, Vehicle};
pub use rates::{RateTable, RateTableEntry};
