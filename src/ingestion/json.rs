//! JSON decoding.
//!
//! The only accepted shape is a top-level array of record objects:
//! `[{"latitude": 46.5, "longitude": 6.6, "species": "Mallard", ...}]`.
//!
//! Decoding enforces types, so records come out already canonical. Missing fields take their
//! zero value and unknown fields are ignored; value checks happen in
//! [`super::validate::validate_records`].

use crate::error::IngestionResult;
use crate::types::CanonicalRecord;

/// Decode an in-memory JSON document into canonical records.
pub fn decode_json(content: &[u8]) -> IngestionResult<Vec<CanonicalRecord>> {
    Ok(serde_json::from_slice(content)?)
}
