//! Error types for the rating engine

use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by the premium calculation path.
///
/// Lookup and date failures abort the enclosing coverage calculation; there
/// is no fallback rate and nothing is retried. Malformed factor-table rows
/// are not represented here because they are skipped (and counted) at load
/// time rather than failing a calculation.
#[derive(Debug, Error)]
pub enum RatingError {
    /// No rate table entry matched the lookup key on the rate date.
    #[error("no rate found for {coverage_type} / {vehicle_type} / {usage}, age {driver_age} on {rate_date}")]
    RateNotFound {
        coverage_type: String,
        vehicle_type: String,
        usage: String,
        driver_age: u32,
        rate_date: NaiveDate,
    },

    /// Multiple surviving entries share the maximal effective date for the
    /// same lookup key. Surfaced as an error rather than resolved by
    /// iteration order.
    #[error("{count} rate entries tie on effective date {effective_date} for {coverage_type} / {vehicle_type} / {usage}, age {driver_age}")]
    AmbiguousRate {
        coverage_type: String,
        vehicle_type: String,
        usage: String,
        driver_age: u32,
        effective_date: NaiveDate,
        count: usize,
    },

    /// Malformed date string. Dates inside persisted documents surface
    /// through their loaders; this variant is the `?` conversion for
    /// callers parsing ISO date strings directly.
    #[error("invalid date: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// A total-premium calculation was requested with no drivers.
    #[error("no driver supplied for premium calculation")]
    EmptyDriverList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parse_conversion() {
        fn parse(s: &str) -> Result<NaiveDate, RatingError> {
            Ok(s.parse::<NaiveDate>()?)
        }

        assert_eq!(parse("2024-01-01").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(matches!(parse("not-a-date").unwrap_err(), RatingError::DateParse(_)));
    }
}
