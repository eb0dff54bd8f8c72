use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::Builder;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CanonicalRecord, DatasetName, is_valid_dataset_name};

use super::DatasetStore;

const DATASET_EXTENSION: &str = "json";

/// Flat-directory dataset store: `<root>/<name>.json`, one file per dataset.
///
/// Writes go to a temporary file in the same directory, are flushed, then renamed over the
/// destination. Writes to the same name are serialized by a per-name lock; different names
/// proceed in parallel.
pub struct DirectoryStore {
    root: PathBuf,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DirectoryStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> IngestionResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            IngestionError::storage(
                format!("failed to create data directory {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            write_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Directory holding the dataset files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding dataset `name`.
    pub fn dataset_path(&self, name: &DatasetName) -> PathBuf {
        self.root
            .join(format!("{}.{DATASET_EXTENSION}", name.as_str()))
    }

    fn lock_for(&self, name: &DatasetName) -> Arc<Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(name.as_str().to_owned())
            .or_default()
            .clone()
    }
}

impl fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryStore")
            .field("root", &self.root)
            .finish()
    }
}

impl DatasetStore for DirectoryStore {
    fn put(&self, name: &DatasetName, records: &[CanonicalRecord]) -> IngestionResult<()> {
        let dest = self.dataset_path(name);
        let bytes = serde_json::to_vec(records).map_err(|e| {
            IngestionError::storage(format!("failed to encode dataset '{name}'"), e.into())
        })?;

        let lock = self.lock_for(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut tmp = Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(|e| {
                IngestionError::storage(
                    format!("failed to create temp file in {}", self.root.display()),
                    e,
                )
            })?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| {
                IngestionError::storage(format!("failed to write dataset '{name}'"), e)
            })?;
        tmp.persist(&dest).map_err(|e| {
            IngestionError::storage(
                format!("failed to move dataset into place ({})", dest.display()),
                e.error,
            )
        })?;

        tracing::debug!(
            dataset = %name,
            records = records.len(),
            bytes = bytes.len(),
            path = %dest.display(),
            "dataset written"
        );
        Ok(())
    }

    fn get(&self, name: &str) -> IngestionResult<Vec<CanonicalRecord>> {
        let not_found = || IngestionError::NotFound {
            name: name.to_owned(),
        };
        if !is_valid_dataset_name(name) {
            return Err(not_found());
        }

        let path = self.root.join(format!("{name}.{DATASET_EXTENSION}"));
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => {
                return Err(IngestionError::storage(
                    format!("failed to read {}", path.display()),
                    e,
                ));
            }
        };

        let records: Vec<CanonicalRecord> = serde_json::from_slice(&bytes).map_err(|e| {
            IngestionError::storage(format!("corrupt dataset file {}", path.display()), e.into())
        })?;
        tracing::debug!(dataset = name, records = records.len(), "dataset read");
        Ok(records)
    }

    fn list(&self) -> IngestionResult<Vec<String>> {
        let root = self.root.to_str().ok_or_else(|| IngestionError::Storage {
            message: format!("data directory is not valid UTF-8: {}", self.root.display()),
            source: None,
        })?;
        let pattern = format!("{}/*.{DATASET_EXTENSION}", glob::Pattern::escape(root));
        let entries = glob::glob(&pattern).map_err(|e| IngestionError::Storage {
            message: format!("bad dataset pattern '{pattern}': {e}"),
            source: None,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                IngestionError::storage("failed to list data directory", io::Error::from(e))
            })?;
            if !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_dataset_name(stem) {
                    names.push(stem.to_owned());
                }
            }
        }
        Ok(names)
    }
}
