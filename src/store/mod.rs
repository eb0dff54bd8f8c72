//! Dataset persistence.
//!
//! A store is a key-value map from dataset name to record list. The pipeline only talks to the
//! [`DatasetStore`] trait, so the same orchestration runs against:
//!
//! - [`DirectoryStore`]: one `<name>.json` file per dataset in a flat directory
//! - [`MemoryStore`]: an in-process map, for tests and embedding
//!
//! Every backend guarantees whole-dataset replacement: a reader sees either the old records or
//! the new ones, never a mix.

mod directory;
mod memory;

use std::sync::Arc;

use crate::error::IngestionResult;
use crate::types::{CanonicalRecord, DatasetName};

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

/// Named dataset persistence.
pub trait DatasetStore: Send + Sync {
    /// Persist `records` under `name`, fully replacing any previous dataset of that name.
    fn put(&self, name: &DatasetName, records: &[CanonicalRecord]) -> IngestionResult<()>;

    /// Load the records stored under `name`.
    ///
    /// Fails with [`crate::IngestionError::NotFound`] when no such dataset exists.
    fn get(&self, name: &str) -> IngestionResult<Vec<CanonicalRecord>>;

    /// Names of all stored datasets, in no particular order.
    fn list(&self) -> IngestionResult<Vec<String>>;
}

impl<S: DatasetStore + ?Sized> DatasetStore for Arc<S> {
    fn put(&self, name: &DatasetName, records: &[CanonicalRecord]) -> IngestionResult<()> {
        (**self).put(name, records)
    }

    fn get(&self, name: &str) -> IngestionResult<Vec<CanonicalRecord>> {
        (**self).get(name)
    }

    fn list(&self) -> IngestionResult<Vec<String>> {
        (**self).list()
    }
}
