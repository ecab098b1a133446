//! Per-coverage premium pipeline

use crate::context::CalcContext;
use crate::error::RatingError;
use crate::factors::FactorEngine;
use crate::policy::{Coverage, Driver, PolicyTerm, Vehicle};
use crate::rates::RateTable;
use crate::rounding::{round3, round_to_integer};
use crate::term::{policy_years, term_factor};

use super::trace::{NullTrace, TraceSink};

static NULL_TRACE: NullTrace = NullTrace;

/// Calculator for individual coverage premiums.
///
/// Holds shared references to the read-only tables; cheap to construct per
/// quote. The rounding checkpoints inside [`coverage_premium`] are
/// contractual: base rate, total factor, factored premium, and term factor
/// are each rounded to three decimals before the next multiplication, and
/// the final product rounds to an integer.
///
/// [`coverage_premium`]: CoverageCalculator::coverage_premium
pub struct CoverageCalculator<'a> {
    rate_table: &'a RateTable,
    factor_engine: &'a FactorEngine,
    trace: &'a dyn TraceSink,
}

impl<'a> CoverageCalculator<'a> {
    pub fn new(rate_table: &'a RateTable, factor_engine: &'a FactorEngine) -> Self {
        Self { rate_table, factor_engine, trace: &NULL_TRACE }
    }

    pub fn with_trace(
        rate_table: &'a RateTable,
        factor_engine: &'a FactorEngine,
        trace: &'a dyn TraceSink,
    ) -> Self {
        Self { rate_table, factor_engine, trace }
    }

    fn checkpoint(&self, step: &str, raw: f64) -> f64 {
        let rounded = round3(raw);
        self.trace.rounding_step(step, raw, rounded);
        rounded
    }

    /// Single-year pipeline: base rate, factors, and term factor on the
    /// policy's rate date.
    pub fn coverage_premium(
        &self,
        coverage: &Coverage,
        vehicle: &Vehicle,
        driver: &Driver,
        term: &PolicyTerm,
    ) -> Result<i64, RatingError> {
        let rate_date = term.rate_date();
        let driver_age = driver.age_on(rate_date);

        let base_rate = self.rate_table.base_rate(
            coverage.coverage_type,
            vehicle.vehicle_type,
            vehicle.usage,
            driver_age,
            rate_date,
        )?;
        let base_rate = self.checkpoint("base rate", base_rate);

        let ctx = CalcContext::build(coverage, vehicle, driver, term);
        let mut total_factor = 1.0;
        for record in self.factor_engine.applicable_factors(&ctx) {
            total_factor *= record.factor_value;
            self.trace.factor_applied(record);
        }
        let total_factor = self.checkpoint("total factor", total_factor);

        let factored = self.checkpoint("factored premium", base_rate * total_factor);

        let term_factor = term_factor(term.effective_date, term.expiry_date, rate_date);
        let term_factor = self.checkpoint("term factor", term_factor);

        Ok(round_to_integer(factored * term_factor))
    }

    /// Multi-year pipeline: split the span into calendar-year sub-terms,
    /// price each with the single-year pipeline, and sum the
    /// already-rounded integer results. Rounding happens per sub-year,
    /// before summation.
    pub fn multi_year_premium(
        &self,
        coverage: &Coverage,
        vehicle: &Vehicle,
        driver: &Driver,
        term: &PolicyTerm,
    ) -> Result<i64, RatingError> {
        let mut total = 0i64;

        for sub in policy_years(term.effective_date, term.expiry_date) {
            let sub_term = PolicyTerm {
                effective_date: sub.start,
                expiry_date: sub.end,
                is_renewal: term.is_renewal,
                // Each sub-year of a renewal rates as of its own start
                renewal_date: term.is_renewal.then_some(sub.start),
            };
            let premium = self.coverage_premium(coverage, vehicle, driver, &sub_term)?;
            self.trace.year_premium(sub.year, sub.start, sub.end, premium);
            total += premium;
        }

        Ok(total)
    }
}
