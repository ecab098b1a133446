//! Whole-policy premium orchestrator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RatingError;
use crate::factors::FactorEngine;
use crate::policy::{Coverage, CoverageType, Driver, PolicyTerm, Vehicle, VehicleType, VehicleUsage};
use crate::rates::RateTable;
use crate::term::is_annual_policy;

use super::coverage::CoverageCalculator;
use super::trace::{NullTrace, TraceSink};

static NULL_TRACE: NullTrace = NullTrace;

/// A complete quote request: what to price, against which inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub coverages: Vec<Coverage>,
    pub vehicle: Vehicle,
    pub drivers: Vec<Driver>,
    pub policy: PolicyTerm,
}

/// Per-coverage line in the quote breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageBreakdown {
    pub premium: i64,
    pub limit: f64,
    pub deductible: f64,
    pub is_required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicySummary {
    pub effective_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub is_renewal: bool,
    pub is_multi_year: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSummary {
    pub year: u16,
    pub make: String,
    pub model: String,
    pub vehicle_type: VehicleType,
    pub usage: VehicleUsage,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverSummary {
    pub name: String,
    /// Age at the rate date
    pub age: u32,
}

/// Result of a total-premium calculation.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResult {
    pub total_premium: i64,
    pub coverage_breakdown: BTreeMap<CoverageType, CoverageBreakdown>,
    pub policy_summary: PolicySummary,
    pub vehicle_summary: VehicleSummary,
    pub primary_driver: DriverSummary,
}

/// Orchestrator for whole-policy quotes: picks the primary driver, decides
/// annual vs multi-year, prices each coverage, and aggregates.
pub struct PremiumCalculator<'a> {
    rate_table: &'a RateTable,
    factor_engine: &'a FactorEngine,
    trace: &'a dyn TraceSink,
}

impl<'a> PremiumCalculator<'a> {
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

    /// Single-coverage convenience entry point.
    pub fn coverage_premium(
        &self,
        coverage: &Coverage,
        vehicle: &Vehicle,
        driver: &Driver,
        term: &PolicyTerm,
    ) -> Result<i64, RatingError> {
        CoverageCalculator::with_trace(self.rate_table, self.factor_engine, self.trace)
            .coverage_premium(coverage, vehicle, driver, term)
    }

    /// Price every coverage against the primary driver and aggregate.
    ///
    /// The primary driver is the first driver flagged primary, falling back
    /// to the first driver in the list; an empty list is an error. Policies
    /// that are not exact calendar anniversaries go through the multi-year
    /// pipeline, which degrades to a single sub-interval for spans inside
    /// one calendar year.
    pub fn total_premium(
        &self,
        coverages: &[Coverage],
        vehicle: &Vehicle,
        drivers: &[Driver],
        term: &PolicyTerm,
    ) -> Result<QuoteResult, RatingError> {
        let primary = drivers
            .iter()
            .find(|d| d.is_primary)
            .or_else(|| drivers.first())
            .ok_or(RatingError::EmptyDriverList)?;

        let is_multi_year = !is_annual_policy(term.effective_date, term.expiry_date);
        let calculator =
            CoverageCalculator::with_trace(self.rate_table, self.factor_engine, self.trace);

        let mut coverage_breakdown = BTreeMap::new();
        let mut total_premium = 0i64;

        for coverage in coverages {
            let premium = if is_multi_year {
                calculator.multi_year_premium(coverage, vehicle, primary, term)?
            } else {
                calculator.coverage_premium(coverage, vehicle, primary, term)?
            };

            coverage_breakdown.insert(
                coverage.coverage_type,
                CoverageBreakdown {
                    premium,
                    limit: coverage.limit,
                    deductible: coverage.deductible,
                    is_required: coverage.is_required,
                },
            );
            total_premium += premium;
        }

        Ok(QuoteResult {
            total_premium,
            coverage_breakdown,
            policy_summary: PolicySummary {
                effective_date: term.effective_date,
                expiry_date: term.expiry_date,
                is_renewal: term.is_renewal,
                is_multi_year,
            },
            vehicle_summary: VehicleSummary {
                year: vehicle.year,
                make: vehicle.make.clone(),
                model: vehicle.model.clone(),
                vehicle_type: vehicle.vehicle_type,
                usage: vehicle.usage,
            },
            primary_driver: DriverSummary {
                name: primary.name.clone(),
                age: primary.age_on(term.rate_date()),
            },
        })
    }

    /// Price a whole request in one call.
    pub fn quote(&self, request: &QuoteRequest) -> Result<QuoteResult, RatingError> {
        self.total_premium(
            &request.coverages,
            &request.vehicle,
            &request.drivers,
            &request.policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateTableEntry;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn rates() -> RateTable {
        let band = |coverage_type, base_rate| RateTableEntry {
            coverage_type,
            vehicle_type: VehicleType::Sedan,
            usage: VehicleUsage::Commuting,
            age_range: "18-99".parse().unwrap(),
            base_rate,
            effective_date: d("2020-01-01"),
            expiry_date: None,
        };
        RateTable::from_entries(vec![
            band(CoverageType::BodilyInjury, 150.0),
            band(CoverageType::PropertyDamage, 100.0),
        ])
    }

    fn vehicle() -> Vehicle {
        Vehicle {
            year: 2022,
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            vehicle_type: VehicleType::Sedan,
            usage: VehicleUsage::Commuting,
            vin: None,
            safety_features: vec![],
        }
    }

    fn driver(name: &str, is_primary: bool) -> Driver {
        Driver {
            name: name.to_string(),
            birth_date: d("1990-01-01"),
            license_number: "D1".to_string(),
            license_state: "CA".to_string(),
            is_primary,
            accidents: vec![],
            violations: vec![],
        }
    }

    fn coverages() -> Vec<Coverage> {
        vec![
            Coverage {
                coverage_type: CoverageType::BodilyInjury,
                limit: 100_000.0,
                deductible: 0.0,
                is_required: true,
            },
            Coverage {
                coverage_type: CoverageType::PropertyDamage,
                limit: 50_000.0,
                deductible: 500.0,
                is_required: true,
            },
        ]
    }

    fn annual_term() -> PolicyTerm {
        PolicyTerm {
            effective_date: d("2024-01-01"),
            expiry_date: d("2025-01-01"),
            is_renewal: false,
            renewal_date: None,
        }
    }

    #[test]
    fn test_total_premium_annual() {
        let rates = rates();
        let factors = FactorEngine::default();
        let calc = PremiumCalculator::new(&rates, &factors);

        let result = calc
            .total_premium(&coverages(), &vehicle(), &[driver("A", true)], &annual_term())
            .unwrap();

        assert_eq!(result.total_premium, 150 + 100);
        assert!(!result.policy_summary.is_multi_year);

        let bi = &result.coverage_breakdown[&CoverageType::BodilyInjury];
        assert_eq!(bi.premium, 150);
        assert_eq!(bi.limit, 100_000.0);
        assert!(bi.is_required);

        let pd = &result.coverage_breakdown[&CoverageType::PropertyDamage];
        assert_eq!(pd.premium, 100);
        assert_eq!(pd.deductible, 500.0);
    }

    #[test]
    fn test_primary_driver_selection() {
        let rates = rates();
        let factors = FactorEngine::default();
        let calc = PremiumCalculator::new(&rates, &factors);

        // Second driver is flagged primary
        let drivers = vec![driver("First", false), driver("Second", true)];
        let result = calc
            .total_premium(&coverages(), &vehicle(), &drivers, &annual_term())
            .unwrap();
        assert_eq!(result.primary_driver.name, "Second");

        // Nobody flagged: fall back to the first driver
        let drivers = vec![driver("First", false), driver("Second", false)];
        let result = calc
            .total_premium(&coverages(), &vehicle(), &drivers, &annual_term())
            .unwrap();
        assert_eq!(result.primary_driver.name, "First");
    }

    #[test]
    fn test_empty_driver_list_fails() {
        let rates = rates();
        let factors = FactorEngine::default();
        let calc = PremiumCalculator::new(&rates, &factors);

        let err = calc
            .total_premium(&coverages(), &vehicle(), &[], &annual_term())
            .unwrap_err();
        assert!(matches!(err, RatingError::EmptyDriverList));
    }

    #[test]
    fn test_empty_coverage_list_is_zero_without_lookups() {
        // An empty rate table would fail any lookup, proving none happens
        let rates = RateTable::new();
        let factors = FactorEngine::default();
        let calc = PremiumCalculator::new(&rates, &factors);

        let result = calc
            .total_premium(&[], &vehicle(), &[driver("A", true)], &annual_term())
            .unwrap();
        assert_eq!(result.total_premium, 0);
        assert!(result.coverage_breakdown.is_empty());
    }

    #[test]
    fn test_short_span_uses_multi_year_path() {
        let rates = rates();
        let factors = FactorEngine::default();
        let calc = PremiumCalculator::new(&rates, &factors);

        // Six months is not an anniversary, so this routes through the
        // multi-year pipeline and degrades to a single sub-interval.
        let term = PolicyTerm {
            effective_date: d("2024-01-01"),
            expiry_date: d("2024-06-30"),
            is_renewal: false,
            renewal_date: None,
        };
        let result = calc
            .total_premium(&coverages(), &vehicle(), &[driver("A", true)], &term)
            .unwrap();

        assert!(result.policy_summary.is_multi_year);
        // BI: 150 * 0.495 = 74.25 -> 74; PD: 100 * 0.495 = 49.5 -> 50
        assert_eq!(result.coverage_breakdown[&CoverageType::BodilyInjury].premium, 74);
        assert_eq!(result.coverage_breakdown[&CoverageType::PropertyDamage].premium, 50);
        assert_eq!(result.total_premium, 124);
    }

    #[test]
    fn test_multi_year_total() {
        let rates = rates();
        let factors = FactorEngine::default();
        let calc = PremiumCalculator::new(&rates, &factors);

        let term = PolicyTerm {
            effective_date: d("2024-01-01"),
            expiry_date: d("2026-01-01"),
            is_renewal: false,
            renewal_date: None,
        };
        let result = calc
            .total_premium(&coverages(), &vehicle(), &[driver("A", true)], &term)
            .unwrap();
        assert!(result.policy_summary.is_multi_year);

        // BI per year: 2024 Jan1-Dec31 = 365/366 -> 0.997, 150*0.997 =
        // 149.55 -> 150; 2025 Jan1-Dec31 = 364/365 -> 0.997 -> 150;
        // 2026 Jan1-Jan1 = 0 days -> 0.
        // PD per year: 100*0.997 = 99.7 -> 100 twice, then 0.
        assert_eq!(result.coverage_breakdown[&CoverageType::BodilyInjury].premium, 300);
        assert_eq!(result.coverage_breakdown[&CoverageType::PropertyDamage].premium, 200);
        assert_eq!(result.total_premium, 500);
    }
}
