//! Seeding a store from a directory of uploads.
//!
//! Files are grouped by the dataset name they derive. Groups are ingested in parallel on a
//! dedicated thread pool; files within one group run sequentially in path order, so when
//! `foo.csv` and `foo.json` sit side by side the result is deterministic (`foo.json` wins).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{IngestionError, IngestionResult};
use crate::store::DatasetStore;
use crate::types::DatasetName;

use super::format::IngestionFormat;
use super::unified::{IngestReceipt, IngestionOptions, ingest_from_path};

/// Configuration for [`ingest_directory`].
#[derive(Debug, Clone)]
pub struct BulkOptions {
    /// Number of worker threads.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Options applied to every file.
    pub ingestion: IngestionOptions,
}

impl Default for BulkOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            ingestion: IngestionOptions::default(),
        }
    }
}

/// Per-file outcome of a bulk ingestion.
#[derive(Debug)]
pub struct BulkEntry {
    /// File that was ingested.
    pub path: PathBuf,
    /// Its receipt, or the error that rejected it.
    pub result: IngestionResult<IngestReceipt>,
}

/// Ingest every `.csv`/`.json` file directly inside `dir`.
///
/// Files with other suffixes and subdirectories are skipped. A failing file does not stop the
/// others; per-file results are returned sorted by path. Only failure to list `dir` or to start
/// the worker pool fails the whole call.
pub fn ingest_directory<S: DatasetStore + ?Sized>(
    store: &S,
    dir: impl AsRef<Path>,
    options: &BulkOptions,
) -> IngestionResult<Vec<BulkEntry>> {
    let dir = dir.as_ref();
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let message = format!("failed to list {}: {e}", dir.display());
            match e.into_io_error() {
                Some(io) => IngestionError::storage(message, io),
                None => IngestionError::Storage {
                    message,
                    source: None,
                },
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !IngestionFormat::detect(&file_name).is_supported() {
            continue;
        }
        // Unusable names still get their own group so the per-file error is reported.
        let key = match DatasetName::from_file_name(&file_name) {
            Ok(name) => name.into_string(),
            Err(_) => format!("\0{file_name}"),
        };
        groups.entry(key).or_default().push(entry.into_path());
    }

    let mut builder = ThreadPoolBuilder::new();
    if let Some(n) = options.num_threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().map_err(|e| IngestionError::Storage {
        message: format!("failed to build ingestion thread pool: {e}"),
        source: None,
    })?;

    let groups: Vec<Vec<PathBuf>> = groups.into_values().collect();
    let mut entries: Vec<BulkEntry> = pool.install(|| {
        groups
            .into_par_iter()
            .flat_map_iter(|paths| {
                paths.into_iter().map(move |path| {
                    let result = ingest_from_path(store, &path, &options.ingestion);
                    BulkEntry { path, result }
                })
            })
            .collect()
    });
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::info!(
        dir = %dir.display(),
        files = entries.len(),
        failed = entries.iter().filter(|e| e.result.is_err()).count(),
        "bulk ingestion finished"
    );
    Ok(entries)
}
