//! Upload encoding detection.

use std::fmt;

/// Encoding of an uploaded file, decided by its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestionFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of canonical records.
    Json,
    /// Anything else.
    Unsupported,
}

impl IngestionFormat {
    /// Classify a file name by its suffix (ASCII case-insensitive). No content sniffing.
    pub fn detect(file_name: &str) -> Self {
        let ext = match file_name.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => return Self::Unsupported,
        };
        Self::from_extension(ext)
    }

    /// Parse a format from a bare extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Self::Csv,
            "json" => Self::Json,
            _ => Self::Unsupported,
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Unsupported => "unsupported",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::IngestionFormat;

    #[test]
    fn detects_by_suffix_only() {
        assert_eq!(IngestionFormat::detect("birds.csv"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::detect("BIRDS.CSV"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::detect("dir.v2/birds.json"), IngestionFormat::Json);
        assert_eq!(IngestionFormat::detect("birds.txt"), IngestionFormat::Unsupported);
        assert_eq!(IngestionFormat::detect("birds"), IngestionFormat::Unsupported);
        assert_eq!(IngestionFormat::detect("birds.csv.bak"), IngestionFormat::Unsupported);
        assert_eq!(IngestionFormat::detect("birds.ndjson"), IngestionFormat::Unsupported);
    }
}
