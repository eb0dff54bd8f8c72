//! CSV decoding.
//!
//! CSV is only ever read: uploads are decoded into untyped rows here, shape-checked by
//! [`super::validate::validate_csv_rows`], and converted by [`super::canonicalize`].

use std::io::Read;

use crate::error::IngestionResult;

/// Decoded CSV rows, header row included as row 0.
pub type CsvRows = Vec<Vec<String>>;

/// Decode an in-memory CSV document into rows of string fields.
pub fn decode_csv(content: &[u8]) -> IngestionResult<CsvRows> {
    decode_csv_from_reader(content)
}

/// Decode CSV from any reader.
///
/// Rules:
///
/// - the header is not interpreted; it is returned as the first row
/// - rows may differ in width; column counts are checked by validation and canonicalization
/// - fields must be valid UTF-8
pub fn decode_csv_from_reader<R: Read>(reader: R) -> IngestionResult<CsvRows> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}
