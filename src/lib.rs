//! `avian-flu-ingest` ingests avian influenza surveillance records into named datasets.
//!
//! Uploads arrive as CSV or JSON. Either way they are normalized into a list of
//! [`types::CanonicalRecord`]s and persisted through a [`store::DatasetStore`], from which a
//! querying client reads them back by dataset name.
//!
//! The primary entrypoints are [`ingestion::ingest_bytes`] and [`ingestion::ingest_from_path`];
//! [`service::SurveillanceService`] bundles them with a store and configuration for a request
//! layer.
//!
//! ## What you can ingest
//!
//! **File formats (detected by file name suffix only):**
//!
//! - **CSV**: `.csv`, header row plus at least one data row, exactly 9 columns:
//!   `latitude,longitude,species,H5N1,H5N2,H7N2,H7N8,timestamp,provenance`
//! - **JSON**: `.json`, an array of record objects using the same field names
//!
//! **Validation differs by format:**
//!
//! - CSV is checked for *shape* (column count, at least one data row). Numeric cells are parsed
//!   leniently: empty or unparsable values become `0.0`.
//! - JSON is checked for *values*: every record needs non-zero latitude and longitude and a
//!   non-empty species.
//!
//! The dataset name is the uploaded file's base name without its extension; a later upload with
//! the same name replaces the whole dataset.
//!
//! ## Quick example
//!
//! ```rust
//! use avian_flu_ingest::ingestion::{ingest_bytes, IngestionOptions};
//! use avian_flu_ingest::store::{DatasetStore, MemoryStore};
//!
//! # fn main() -> Result<(), avian_flu_ingest::IngestionError> {
//! let store = MemoryStore::new();
//! let json = r#"[{"latitude":46.5,"longitude":6.6,"species":"Mallard","H5N1":1.0,
//!                "timestamp":"2024-01-01","provenance":"FieldSurveyA"}]"#;
//!
//! ingest_bytes(&store, "lake_geneva.json", json.as_bytes(), &IngestionOptions::default())?;
//!
//! let records = store.get("lake_geneva")?;
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].species, "Mallard");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: detection, decoding, validation, canonicalization and the pipeline itself
//! - [`store`]: dataset persistence (flat directory or in-memory)
//! - [`service`]: request-layer boundary and wire replies
//! - [`types`]: canonical record and dataset types
//! - [`credentials`]: flat-file username/password lookup
//! - [`config`]: service configuration
//! - [`error`]: error types and their classification

pub mod config;
pub mod credentials;
pub mod error;
pub mod ingestion;
pub mod service;
pub mod store;
pub mod types;

pub use error::{ErrorKind, IngestionError, IngestionResult};
