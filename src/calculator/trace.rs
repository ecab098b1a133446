//! Calculation trace sink
//!
//! The pipeline is pure; tracing is a side channel that never affects the
//! returned value. Callers inject a sink to observe intermediate values
//! (each rounding checkpoint, each applied factor, each sub-year premium).

use chrono::NaiveDate;

use crate::factors::FactorRecord;

/// Observer for intermediate calculation values. All methods default to
/// no-ops so implementations pick what they care about.
pub trait TraceSink {
    /// A rounding checkpoint was applied.
    fn rounding_step(&self, step: &str, raw: f64, rounded: f64) {
        let _ = (step, raw, rounded);
    }

    /// A factor record matched the context and was multiplied in.
    fn factor_applied(&self, record: &FactorRecord) {
        let _ = record;
    }

    /// One sub-year of a multi-year calculation completed.
    fn year_premium(&self, year: i32, start: NaiveDate, end: NaiveDate, premium: i64) {
        let _ = (year, start, end, premium);
    }
}

/// Discards everything. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {}

/// Forwards every trace event to `log::debug!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn rounding_step(&self, step: &str, raw: f64, rounded: f64) {
        log::debug!("{step}: {raw:.6} -> {rounded:.3}");
    }

    fn factor_applied(&self, record: &FactorRecord) {
        log::debug!(
            "applied {}: {} ({})",
            record.factor_name,
            record.factor_value,
            record.description
        );
    }

    fn year_premium(&self, year: i32, start: NaiveDate, end: NaiveDate, premium: i64) {
        log::debug!("year {year} ({start} to {end}): premium {premium}");
    }
}
