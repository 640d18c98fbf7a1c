//! CSV export of prescribed treatments.
//!
//! Produces a flat report of persisted treatments, one row each, suitable
//! for spreadsheets or downstream tooling. Exports append to an existing
//! file without repeating the header row.

use crate::types::Treatment;
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    drug: String,
    regimen: String,
    starts_on: String,
    stops_on: String,
    direction_mode: String,
}

impl From<&Treatment> for CsvRow {
    fn from(treatment: &Treatment) -> Self {
        CsvRow {
            id: treatment.id.clone().unwrap_or_default(),
            drug: treatment.drug.name.clone(),
            regimen: treatment.dosage.regimen(),
            starts_on: treatment.starts_on.to_string(),
            stops_on: treatment.stops_on.to_string(),
            direction_mode: treatment.direction_mode.to_string(),
        }
    }
}

/// Append the given treatments to a CSV file, creating it (with headers)
/// when needed. Returns the number of rows written.
pub fn treatments_to_csv(treatments: &[Treatment], csv_path: &Path) -> Result<usize> {
    if treatments.is_empty() {
        tracing::info!("No treatments to export");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Headers only go into a fresh (empty) file
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for treatment in treatments {
        let row = CsvRow::from(treatment);
        writer.serialize(row)?;
    }

    writer.flush()?;

    tracing::info!("Exported {} treatments to {:?}", treatments.len(), csv_path);
    Ok(treatments.len())
}
