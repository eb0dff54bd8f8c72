//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_bytes`] or [`ingest_from_path`] (from [`unified`]) which:
//!
//! - detect the encoding from the file name suffix
//! - decode, validate and (for CSV) canonicalize the upload
//! - persist the result through a [`crate::store::DatasetStore`]
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! The individual stages are also available under:
//! - [`format`]
//! - [`csv`]
//! - [`json`]
//! - [`validate`]
//! - [`canonicalize`]

pub mod bulk;
pub mod canonicalize;
pub mod csv;
pub mod format;
pub mod json;
pub mod observability;
pub mod unified;
pub mod validate;

pub use bulk::{BulkEntry, BulkOptions, ingest_directory};
pub use format::IngestionFormat;
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver, TracingObserver,
};
pub use unified::{IngestReceipt, IngestionOptions, IngestionRequest, IngestionStage, ingest_bytes, ingest_from_path};
