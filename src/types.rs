//! Core data model types.
//!
//! Every accepted upload, whatever its encoding, is normalized into a list of
//! [`CanonicalRecord`]s and persisted under a [`DatasetName`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};

/// Column layout every CSV upload must carry, in order.
pub const CSV_COLUMNS: [&str; 9] = [
    "latitude",
    "longitude",
    "species",
    "H5N1",
    "H5N2",
    "H7N2",
    "H7N8",
    "timestamp",
    "provenance",
];

/// Dataset served when a caller does not name one.
pub const DEFAULT_DATASET: &str = "fake_bird_data_switzerland_v2";

/// Viral subtypes measured on every observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtype {
    H5N1,
    H5N2,
    H7N2,
    H7N8,
}

impl Subtype {
    /// All subtypes, in CSV column order.
    pub const ALL: [Subtype; 4] = [Self::H5N1, Self::H5N2, Self::H7N2, Self::H7N8];

    /// Column header and JSON field name of this subtype.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H5N1 => "H5N1",
            Self::H5N2 => "H5N2",
            Self::H7N2 => "H7N2",
            Self::H7N8 => "H7N8",
        }
    }

    /// Index of this subtype's column in a CSV row.
    pub const fn csv_column(self) -> usize {
        match self {
            Self::H5N1 => 3,
            Self::H5N2 => 4,
            Self::H7N2 => 5,
            Self::H7N8 => 6,
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One geolocated observation.
///
/// Absent JSON fields decode to their zero value; validation decides whether that is acceptable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalRecord {
    /// Decimal degrees.
    pub latitude: f64,
    /// Decimal degrees.
    pub longitude: f64,
    /// Common name of the sampled bird, e.g. `Mallard`.
    pub species: String,
    /// Measured titer per subtype; `0.0` when absent.
    #[serde(rename = "H5N1")]
    pub h5n1: f64,
    #[serde(rename = "H5N2")]
    pub h5n2: f64,
    #[serde(rename = "H7N2")]
    pub h7n2: f64,
    #[serde(rename = "H7N8")]
    pub h7n8: f64,
    /// Opaque; never parsed as a date.
    pub timestamp: String,
    /// Free-text source of the observation.
    pub provenance: String,
}

impl CanonicalRecord {
    /// Measured titer for `subtype`.
    pub fn measurement(&self, subtype: Subtype) -> f64 {
        match subtype {
            Subtype::H5N1 => self.h5n1,
            Subtype::H5N2 => self.h5n2,
            Subtype::H7N2 => self.h7n2,
            Subtype::H7N8 => self.h7n8,
        }
    }

    /// Overwrite the titer for `subtype`.
    pub fn set_measurement(&mut self, subtype: Subtype, value: f64) {
        let slot = match subtype {
            Subtype::H5N1 => &mut self.h5n1,
            Subtype::H5N2 => &mut self.h5n2,
            Subtype::H7N2 => &mut self.h7n2,
            Subtype::H7N8 => &mut self.h7n8,
        };
        *slot = value;
    }
}

/// A validated dataset identifier.
///
/// Names map one-to-one onto files in a flat directory, so they may not contain path
/// separators or NUL and may not be `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetName(String);

impl DatasetName {
    /// Wrap `name`, failing with a format error if it cannot name a dataset file.
    pub fn new(name: impl Into<String>) -> IngestionResult<Self> {
        let name = name.into();
        if !is_valid_dataset_name(&name) {
            return Err(IngestionError::format(format!("invalid dataset name '{name}'")));
        }
        Ok(Self(name))
    }

    /// Derive a dataset name from an uploaded file name: base name, final extension removed.
    ///
    /// ```
    /// use avian_flu_ingest::types::DatasetName;
    ///
    /// assert_eq!(DatasetName::from_file_name("uploads/foo.csv").unwrap().as_str(), "foo");
    /// assert_eq!(DatasetName::from_file_name("foo.json").unwrap().as_str(), "foo");
    /// ```
    pub fn from_file_name(file_name: &str) -> IngestionResult<Self> {
        let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
        let stem = match base.rfind('.') {
            Some(0) | None => base,
            Some(idx) => &base[..idx],
        };
        Self::new(stem)
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_valid_dataset_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
