//! Term proration utilities
//!
//! Pro-rata term factors for non-annual policies and the calendar-year
//! partition used for multi-year spans.

use chrono::{Datelike, NaiveDate};

/// One calendar-year slice of a multi-year policy span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyYear {
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn jan_1(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date")
}

fn dec_31(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date")
}

/// Number of days in a calendar year (365 or 366).
pub fn days_in_year(year: i32) -> i64 {
    (jan_1(year + 1) - jan_1(year)).num_days()
}

/// Pro-rata term factor for a policy span.
///
/// The numerator is the span length in whole days; the denominator is the
/// day count of the calendar year containing `rate_date` — always a single
/// year's count, even when the span straddles a year boundary.
pub fn term_factor(start: NaiveDate, end: NaiveDate, rate_date: NaiveDate) -> f64 {
    let policy_days = (end - start).num_days();
    policy_days as f64 / days_in_year(rate_date.year()) as f64
}

/// Strict calendar-anniversary test for an annual policy.
///
/// True iff `end` falls on the same month/day as `start` exactly one year
/// later. A 365-day Jan 1 → Dec 31 span is deliberately *not* annual under
/// this rule and prices at 365/366 in a leap year.
pub fn is_annual_policy(start: NaiveDate, end: NaiveDate) -> bool {
    start.month() == end.month() && start.day() == end.day() && end.year() - start.year() == 1
}

/// Split a policy span into per-calendar-year sub-intervals.
///
/// Produces one entry per calendar year from `start.year()` through
/// `end.year()`, clamped to the span. The sequence is contiguous and
/// gap-free; its union is exactly `[start, end]`.
pub fn policy_years(start: NaiveDate, end: NaiveDate) -> Vec<PolicyYear> {
    (start.year()..=end.year())
        .map(|year| PolicyYear {
            year,
            start: start.max(jan_1(year)),
            end: end.min(dec_31(year)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_days_in_year() {
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2023), 365);
        assert_eq!(days_in_year(2100), 365); // century, not a leap year
    }

    #[test]
    fn test_annual_policy_detection() {
        assert!(is_annual_policy(d("2024-01-01"), d("2025-01-01")));
        assert!(is_annual_policy(d("2024-07-15"), d("2025-07-15")));
        // 365 days but not an anniversary
        assert!(!is_annual_policy(d("2024-01-01"), d("2024-12-31")));
        assert!(!is_annual_policy(d("2024-01-01"), d("2024-06-30")));
        // Anniversary but two years out
        assert!(!is_annual_policy(d("2024-01-01"), d("2026-01-01")));
        assert!(!is_annual_policy(d("2024-01-01"), d("2025-12-31")));
    }

    #[test]
    fn test_term_factor() {
        // 365-day span in a 366-day rate year
        let f = term_factor(d("2024-01-01"), d("2024-12-31"), d("2024-01-01"));
        assert_relative_eq!(f, 365.0 / 366.0, epsilon = 1e-12);

        // Half-year span
        let f = term_factor(d("2024-01-01"), d("2024-06-30"), d("2024-01-01"));
        assert_relative_eq!(f, 181.0 / 366.0, epsilon = 1e-12);

        // Exact anniversary in a non-leap year
        let f = term_factor(d("2023-03-01"), d("2024-03-01"), d("2023-03-01"));
        assert_relative_eq!(f, 366.0 / 365.0, epsilon = 1e-12);
    }

    #[test]
    fn test_term_factor_denominator_follows_rate_date() {
        // Same span, different rate years: 2023 has 365 days, 2024 has 366.
        let span = (d("2023-12-01"), d("2024-03-01"));
        let f23 = term_factor(span.0, span.1, d("2023-12-01"));
        let f24 = term_factor(span.0, span.1, d("2024-01-15"));
        assert_relative_eq!(f23, 91.0 / 365.0, epsilon = 1e-12);
        assert_relative_eq!(f24, 91.0 / 366.0, epsilon = 1e-12);
    }

    #[test]
    fn test_policy_years_partition() {
        let years = policy_years(d("2024-03-15"), d("2026-09-10"));
        assert_eq!(
            years,
            vec![
                PolicyYear { year: 2024, start: d("2024-03-15"), end: d("2024-12-31") },
                PolicyYear { year: 2025, start: d("2025-01-01"), end: d("2025-12-31") },
                PolicyYear { year: 2026, start: d("2026-01-01"), end: d("2026-09-10") },
            ]
        );

        // Gap-free and non-overlapping: each sub-start is the day after the
        // previous sub-end.
        for pair in years.windows(2) {
            assert_eq!(pair[1].start, pair[0].end + chrono::Days::new(1));
        }
        assert_eq!(years.first().unwrap().start, d("2024-03-15"));
        assert_eq!(years.last().unwrap().end, d("2026-09-10"));
    }

    #[test]
    fn test_policy_years_single_year_span() {
        let years = policy_years(d("2024-02-01"), d("2024-07-31"));
        assert_eq!(
            years,
            vec![PolicyYear { year: 2024, start: d("2024-02-01"), end: d("2024-07-31") }]
        );
    }
}
