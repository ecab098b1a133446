//! Premium calculation pipeline for Rule 2
//!
//! Composes rate lookup, factor matching, term proration, and the mandated
//! rounding checkpoints into per-coverage and whole-policy premiums.

mod coverage;
mod premium;
mod trace;

pub use coverage::CoverageCalculator;
pub use premium::{
    CoverageBreakdown, DriverSummary, PolicySummary, PremiumCalculator, QuoteRequest, QuoteResult,
    VehicleSummary,
};
pub use trace::{LogTrace, NullTrace, TraceSink};
