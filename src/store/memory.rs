use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CanonicalRecord, DatasetName};

use super::DatasetStore;

/// In-memory dataset store.
///
/// Replacement happens under a single write lock, so readers never see a partial dataset.
#[derive(Default)]
pub struct MemoryStore {
    datasets: RwLock<HashMap<String, Vec<CanonicalRecord>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.datasets.read().map(|m| m.len()).unwrap_or_default();
        f.debug_struct("MemoryStore")
            .field("datasets_len", &len)
            .finish()
    }
}

fn poisoned() -> IngestionError {
    IngestionError::Storage {
        message: "memory store lock poisoned".to_string(),
        source: None,
    }
}

impl DatasetStore for MemoryStore {
    fn put(&self, name: &DatasetName, records: &[CanonicalRecord]) -> IngestionResult<()> {
        let mut map = self.datasets.write().map_err(|_| poisoned())?;
        map.insert(name.as_str().to_owned(), records.to_vec());
        Ok(())
    }

    fn get(&self, name: &str) -> IngestionResult<Vec<CanonicalRecord>> {
        let map = self.datasets.read().map_err(|_| poisoned())?;
        map.get(name).cloned().ok_or_else(|| IngestionError::NotFound {
            name: name.to_owned(),
        })
    }

    fn list(&self) -> IngestionResult<Vec<String>> {
        let map = self.datasets.read().map_err(|_| poisoned())?;
        Ok(map.keys().cloned().collect())
    }
}
