//! Structural validation.
//!
//! CSV and JSON uploads are checked by different rules on purpose:
//!
//! - [`validate_csv_rows`] checks *shape* only: cells are untyped strings, and numeric cells are
//!   interpreted leniently later by [`super::canonicalize`].
//! - [`validate_records`] checks *values*: decoding already enforced types, so what remains is
//!   the record-level business rule (non-zero coordinates, non-empty species).
//!
//! A CSV with the right column count but garbage coordinates therefore passes here and
//! canonicalizes to zeros.
//!
//! Zero latitude or longitude is treated as missing. This rejects genuine observations on the
//! equator or the prime meridian.

use crate::error::{IngestionError, IngestionResult, RecordViolation};
use crate::types::{CSV_COLUMNS, CanonicalRecord};

/// Check decoded CSV rows (header included) before canonicalization.
pub fn validate_csv_rows(rows: &[Vec<String>]) -> IngestionResult<()> {
    let header = rows
        .first()
        .ok_or_else(|| IngestionError::format("csv is empty: expected a header row"))?;

    if header.len() != CSV_COLUMNS.len() {
        return Err(IngestionError::format(format!(
            "csv header has {} column(s), expected {} ({})",
            header.len(),
            CSV_COLUMNS.len(),
            CSV_COLUMNS.join(",")
        )));
    }

    if rows.len() < 2 {
        return Err(IngestionError::format(
            "csv has a header but no data rows",
        ));
    }

    Ok(())
}

/// Check already-typed records; reports every offending record, not just the first.
pub fn validate_records(records: &[CanonicalRecord]) -> IngestionResult<()> {
    let violations: Vec<RecordViolation> = records
        .iter()
        .enumerate()
        .filter_map(|(idx0, r)| {
            let problems = record_problems(r);
            (!problems.is_empty()).then(|| RecordViolation {
                record: idx0 + 1,
                problems,
            })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(IngestionError::InvalidRecords { violations })
    }
}

fn record_problems(r: &CanonicalRecord) -> Vec<String> {
    let mut problems = Vec::new();
    if r.latitude == 0.0 {
        problems.push("latitude is zero".to_string());
    }
    if r.longitude == 0.0 {
        problems.push("longitude is zero".to_string());
    }
    if r.species.is_empty() {
        problems.push("species is empty".to_string());
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn csv_rules_accept_header_plus_one_row() {
        let rows = vec![row(&CSV_COLUMNS), row(&["x"; 9])];
        validate_csv_rows(&rows).unwrap();
    }

    #[test]
    fn csv_rules_reject_header_only() {
        let err = validate_csv_rows(&[row(&CSV_COLUMNS)]).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn record_rules_collect_all_problems_per_record() {
        let records = vec![
            CanonicalRecord {
                latitude: 1.0,
                longitude: 1.0,
                species: "Mallard".into(),
                ..Default::default()
            },
            CanonicalRecord::default(),
        ];
        match validate_records(&records).unwrap_err() {
            IngestionError::InvalidRecords { violations } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].record, 2);
                assert_eq!(violations[0].problems.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
