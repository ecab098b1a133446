//! JSON rate table loader
//!
//! The persisted form is a document with a top-level `entries` list, ISO
//! date strings, and an empty string for "no expiry".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use super::{RateTable, RateTableEntry};

#[derive(Debug, Serialize, Deserialize)]
struct RateTableDoc {
    #[serde(default)]
    entries: Vec<RateTableEntry>,
}

/// Load a rate table from a JSON file. Any malformed entry (bad date, bad
/// age range, unknown category) fails the whole load.
pub fn load_rate_table(path: &Path) -> Result<RateTable, Box<dyn Error>> {
    let file = File::open(path)?;
    let table = rate_table_from_reader(BufReader::new(file))?;
    log::info!("loaded {} rate entries from {}", table.len(), path.display());
    Ok(table)
}

/// Parse the persisted rate table form from any reader.
pub fn rate_table_from_reader<R: Read>(reader: R) -> Result<RateTable, serde_json::Error> {
    let doc: RateTableDoc = serde_json::from_reader(reader)?;
    Ok(RateTable::from_entries(doc.entries))
}

/// Write a rate table back out in the persisted form.
pub fn save_rate_table(table: &RateTable, path: &Path) -> Result<(), Box<dyn Error>> {
    let doc = RateTableDoc { entries: table.entries().to_vec() };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &doc)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{CoverageType, VehicleType, VehicleUsage};
    use crate::rates::AgeRange;

    const SAMPLE: &str = r#"{
        "entries": [
            {
                "coverage_type": "Bodily Injury",
                "vehicle_type": "Sedan",
                "usage": "Commuting",
                "age_range": "25-30",
                "base_rate": 150.0,
                "effective_date": "2024-01-01",
                "expiry_date": ""
            },
            {
                "coverage_type": "Collision",
                "vehicle_type": "SUV",
                "usage": "Pleasure",
                "age_range": "65+",
                "base_rate": 210.5,
                "effective_date": "2024-01-01",
                "expiry_date": "2024-12-31"
            }
        ]
    }"#;

    #[test]
    fn test_parse_persisted_form() {
        let table = rate_table_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.entries()[0];
        assert_eq!(first.coverage_type, CoverageType::BodilyInjury);
        assert_eq!(first.vehicle_type, VehicleType::Sedan);
        assert_eq!(first.usage, VehicleUsage::Commuting);
        assert_eq!(first.age_range, AgeRange::Range(25, 30));
        assert_eq!(first.expiry_date, None);

        let second = &table.entries()[1];
        assert_eq!(second.age_range, AgeRange::Open(65));
        assert_eq!(second.expiry_date, Some("2024-12-31".parse().unwrap()));
    }

    #[test]
    fn test_round_trip() {
        let table = rate_table_from_reader(SAMPLE.as_bytes()).unwrap();
        let doc = RateTableDoc { entries: table.entries().to_vec() };
        let json = serde_json::to_string(&doc).unwrap();
        // Absent expiry serializes as the empty string, matching the
        // persisted form
        assert!(json.contains("\"expiry_date\":\"\""));

        let back = rate_table_from_reader(json.as_bytes()).unwrap();
        assert_eq!(back.len(), table.len());
        assert_eq!(back.entries()[0].expiry_date, None);
    }

    #[test]
    fn test_malformed_entry_fails_load() {
        let bad_date = SAMPLE.replace("2024-01-01", "not-a-date");
        assert!(rate_table_from_reader(bad_date.as_bytes()).is_err());

        let bad_range = SAMPLE.replace("25-30", "25-30-35");
        assert!(rate_table_from_reader(bad_range.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_document() {
        let table = rate_table_from_reader("{}".as_bytes()).unwrap();
        assert!(table.is_empty());
    }
}
