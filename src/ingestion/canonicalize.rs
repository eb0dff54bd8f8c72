//! Conversion of validated CSV rows into canonical records.
//!
//! Numeric cells are parsed leniently: an empty or unparsable cell becomes `0.0` instead of
//! rejecting the row (an absent titer means zero). Nothing here validates values.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CSV_COLUMNS, CanonicalRecord, Subtype};

const LATITUDE: usize = 0;
const LONGITUDE: usize = 1;
const SPECIES: usize = 2;
const TIMESTAMP: usize = 7;
const PROVENANCE: usize = 8;

/// Convert data rows (header excluded) into canonical records, preserving order.
///
/// The validator only checks the header width, so a short data row can still arrive here; it
/// is reported as an internal consistency error. Cells past the expected layout are ignored.
pub fn canonicalize(data_rows: &[Vec<String>]) -> IngestionResult<Vec<CanonicalRecord>> {
    data_rows
        .iter()
        .enumerate()
        .map(|(idx0, row)| canonicalize_row(idx0 + 2, row))
        .collect()
}

fn canonicalize_row(user_row: usize, row: &[String]) -> IngestionResult<CanonicalRecord> {
    if row.len() < CSV_COLUMNS.len() {
        return Err(IngestionError::Internal {
            message: format!(
                "row {user_row} has {} cell(s), expected {}",
                row.len(),
                CSV_COLUMNS.len()
            ),
        });
    }

    let mut record = CanonicalRecord {
        latitude: lenient_f64(&row[LATITUDE]),
        longitude: lenient_f64(&row[LONGITUDE]),
        species: row[SPECIES].clone(),
        timestamp: row[TIMESTAMP].clone(),
        provenance: row[PROVENANCE].clone(),
        ..Default::default()
    };
    for subtype in Subtype::ALL {
        record.set_measurement(subtype, lenient_f64(&row[subtype.csv_column()]));
    }
    Ok(record)
}

/// Parse a float, falling back to `0.0` for empty or malformed cells.
///
/// Non-finite values (`NaN`, `inf`) also fall back: they have no JSON representation.
pub fn lenient_f64(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
