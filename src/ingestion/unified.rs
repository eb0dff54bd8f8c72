//! Unified ingestion entrypoint.
//!
//! Each upload runs through a linear pipeline of fallible stages:
//!
//! ```text
//! CSV:  Received -> Detected -> Decoded -> Validated -> Canonicalized -> Stored
//! JSON: Received -> Detected -> Decoded -> Validated -> Stored
//! ```
//!
//! The first failing stage rejects the upload with its error. Nothing is written to the store
//! unless every earlier stage succeeded, and the write itself replaces the whole dataset.
//!
//! If an [`super::observability::IngestionObserver`] is configured, success, failure and alerts
//! are reported to it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::store::DatasetStore;
use crate::types::{CanonicalRecord, DatasetName};

use super::canonicalize::canonicalize;
use super::csv::decode_csv;
use super::format::IngestionFormat;
use super::json::decode_json;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::validate::{validate_csv_rows, validate_records};

/// Pipeline stages an upload moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionStage {
    Received,
    Detected,
    Decoded,
    Validated,
    /// CSV only.
    Canonicalized,
    Stored,
}

/// Options controlling ingestion reporting.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReceipt {
    /// Dataset the records were stored under.
    pub dataset: DatasetName,
    pub format: IngestionFormat,
    /// Number of records persisted.
    pub records: usize,
    /// Stages passed, in order, ending with [`IngestionStage::Stored`].
    pub stages: Vec<IngestionStage>,
}

/// Ingest an uploaded file held in memory.
///
/// The dataset name is the file's base name without its extension, so `foo.csv` and
/// `foo.json` both write dataset `foo` and the later upload replaces the earlier one.
///
/// # Examples
///
/// ```
/// use avian_flu_ingest::ingestion::{ingest_bytes, IngestionOptions};
/// use avian_flu_ingest::store::{DatasetStore, MemoryStore};
///
/// # fn main() -> Result<(), avian_flu_ingest::IngestionError> {
/// let store = MemoryStore::new();
/// let csv = "latitude,longitude,species,H5N1,H5N2,H7N2,H7N8,timestamp,provenance\n\
///            46.5,6.6,Mallard,0.1,,,,2024-01-01,FieldSurveyA\n";
///
/// let receipt = ingest_bytes(&store, "survey.csv", csv.as_bytes(), &IngestionOptions::default())?;
/// assert_eq!(receipt.dataset.as_str(), "survey");
///
/// let records = store.get("survey")?;
/// assert_eq!(records[0].h5n1, 0.1);
/// assert_eq!(records[0].h5n2, 0.0);
/// # Ok(())
/// # }
/// ```
pub fn ingest_bytes<S: DatasetStore + ?Sized>(
    store: &S,
    file_name: &str,
    content: &[u8],
    options: &IngestionOptions,
) -> IngestionResult<IngestReceipt> {
    let mut run = PipelineRun::new(file_name);
    let result = run.execute(store, content);

    let ctx = run.context();
    match &result {
        Ok(receipt) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(
                    &ctx,
                    receipt.dataset.as_str(),
                    IngestionStats {
                        records: receipt.records,
                    },
                );
            }
        }
        Err(e) => report_failure(options, &ctx, e),
    }

    result
}

/// Ingest a local file, using its file name to pick the format and dataset name.
///
/// A file that cannot be read is rejected as a decode failure at the `Received` stage.
pub fn ingest_from_path<S: DatasetStore + ?Sized>(
    store: &S,
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<IngestReceipt> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match fs::read(path) {
        Ok(content) => ingest_bytes(store, &file_name, &content, options),
        Err(e) => {
            let err = IngestionError::Source(e);
            let ctx = IngestionContext {
                format: IngestionFormat::detect(&file_name),
                file_name,
                stage: IngestionStage::Received,
            };
            report_failure(options, &ctx, &err);
            Err(err)
        }
    }
}

fn report_failure(options: &IngestionOptions, ctx: &IngestionContext, e: &IngestionError) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = IngestionSeverity::for_error(e);
        obs.on_failure(ctx, sev, e);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, e);
        }
    }
}

struct PipelineRun<'a> {
    file_name: &'a str,
    format: IngestionFormat,
    stages: Vec<IngestionStage>,
}

impl<'a> PipelineRun<'a> {
    fn new(file_name: &'a str) -> Self {
        Self {
            file_name,
            format: IngestionFormat::Unsupported,
            stages: vec![IngestionStage::Received],
        }
    }

    fn advance(&mut self, stage: IngestionStage) {
        self.stages.push(stage);
    }

    fn context(&self) -> IngestionContext {
        IngestionContext {
            file_name: self.file_name.to_owned(),
            format: self.format,
            stage: self
                .stages
                .last()
                .copied()
                .unwrap_or(IngestionStage::Received),
        }
    }

    fn execute<S: DatasetStore + ?Sized>(
        &mut self,
        store: &S,
        content: &[u8],
    ) -> IngestionResult<IngestReceipt> {
        self.format = IngestionFormat::detect(self.file_name);
        if !self.format.is_supported() {
            return Err(IngestionError::UnsupportedFormat {
                file_name: self.file_name.to_owned(),
            });
        }
        let dataset = DatasetName::from_file_name(self.file_name)?;
        self.advance(IngestionStage::Detected);

        let records = match self.format {
            IngestionFormat::Csv => self.csv_records(content)?,
            IngestionFormat::Json => self.json_records(content)?,
            IngestionFormat::Unsupported => {
                return Err(IngestionError::UnsupportedFormat {
                    file_name: self.file_name.to_owned(),
                });
            }
        };

        store.put(&dataset, &records)?;
        self.advance(IngestionStage::Stored);

        Ok(IngestReceipt {
            dataset,
            format: self.format,
            records: records.len(),
            stages: self.stages.clone(),
        })
    }

    fn csv_records(&mut self, content: &[u8]) -> IngestionResult<Vec<CanonicalRecord>> {
        let rows = decode_csv(content)?;
        self.advance(IngestionStage::Decoded);

        validate_csv_rows(&rows)?;
        self.advance(IngestionStage::Validated);

        // Row 0 is the header.
        let records = canonicalize(rows.get(1..).unwrap_or_default())?;
        self.advance(IngestionStage::Canonicalized);
        Ok(records)
    }

    fn json_records(&mut self, content: &[u8]) -> IngestionResult<Vec<CanonicalRecord>> {
        let records = decode_json(content)?;
        self.advance(IngestionStage::Decoded);

        validate_records(&records)?;
        self.advance(IngestionStage::Validated);
        Ok(records)
    }
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue ingestion work in a job system.
#[derive(Clone)]
pub struct IngestionRequest {
    /// File name as uploaded.
    pub file_name: String,
    /// Raw upload bytes.
    pub content: Vec<u8>,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("file_name", &self.file_name)
            .field("content_len", &self.content.len())
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_bytes`].
    pub fn run<S: DatasetStore + ?Sized>(&self, store: &S) -> IngestionResult<IngestReceipt> {
        ingest_bytes(store, &self.file_name, &self.content, &self.options)
    }
}
