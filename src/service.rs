//! Boundary used by the request layer.
//!
//! [`SurveillanceService`] wires a store, configuration and ingestion options together and
//! exposes the operations the HTTP layer calls. [`IngestReply`] and [`FetchReply`] are the
//! wire shapes it answers with:
//!
//! ```text
//! {"ok": true, "datasetName": "survey"}
//! {"ok": true, "records": [...]}
//! {"ok": false, "errorKind": "FormatError", "message": "..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::credentials::CredentialList;
use crate::error::{ErrorKind, IngestionResult};
use crate::ingestion::{IngestReceipt, IngestionOptions, ingest_bytes};
use crate::store::{DatasetStore, DirectoryStore};
use crate::types::CanonicalRecord;

/// Ingestion and retrieval over one dataset store.
#[derive(Debug)]
pub struct SurveillanceService<S> {
    store: S,
    config: ServiceConfig,
    options: IngestionOptions,
}

impl SurveillanceService<DirectoryStore> {
    /// Open a directory-backed service at `config.data_dir`.
    pub fn open(config: ServiceConfig) -> IngestionResult<Self> {
        let store = DirectoryStore::open(&config.data_dir)?;
        Ok(Self::new(store, config))
    }
}

impl<S: DatasetStore> SurveillanceService<S> {
    /// Build a service over `store` with default ingestion options.
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            store,
            config,
            options: IngestionOptions::default(),
        }
    }

    /// Replace the ingestion options (observer, alert threshold).
    pub fn with_options(mut self, options: IngestionOptions) -> Self {
        self.options = options;
        self
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration the service was built with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Ingest one uploaded file.
    pub fn ingest(&self, file_name: &str, content: &[u8]) -> IngestionResult<IngestReceipt> {
        ingest_bytes(&self.store, file_name, content, &self.options)
    }

    /// Records of `dataset`, or of the configured default dataset when none (or an empty name)
    /// is given.
    pub fn fetch(&self, dataset: Option<&str>) -> IngestionResult<Vec<CanonicalRecord>> {
        let name = dataset
            .filter(|n| !n.is_empty())
            .unwrap_or(self.config.default_dataset.as_str());
        self.store.get(name)
    }

    /// Names of all stored datasets, sorted.
    pub fn list_datasets(&self) -> IngestionResult<Vec<String>> {
        let mut names = self.store.list()?;
        names.sort();
        Ok(names)
    }

    /// Look the pair up in the configured credential list.
    ///
    /// The list is re-read on every call so edits take effect without a restart.
    pub fn check_credentials(&self, username: &str, password: &str) -> IngestionResult<bool> {
        let list = CredentialList::load(&self.config.credentials_path)?;
        Ok(list.verify(username, password))
    }
}

/// Wire reply for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IngestReply {
    /// HTTP status the request layer should answer with.
    pub fn http_status(&self) -> u16 {
        self.error_kind.map_or(200, ErrorKind::http_status)
    }
}

impl From<IngestionResult<IngestReceipt>> for IngestReply {
    fn from(result: IngestionResult<IngestReceipt>) -> Self {
        match result {
            Ok(receipt) => Self {
                ok: true,
                dataset_name: Some(receipt.dataset.into_string()),
                error_kind: None,
                message: None,
            },
            Err(e) => Self {
                ok: false,
                dataset_name: None,
                error_kind: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}

/// Wire reply for a dataset fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<CanonicalRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchReply {
    /// HTTP status the request layer should answer with.
    pub fn http_status(&self) -> u16 {
        self.error_kind.map_or(200, ErrorKind::http_status)
    }
}

impl From<IngestionResult<Vec<CanonicalRecord>>> for FetchReply {
    fn from(result: IngestionResult<Vec<CanonicalRecord>>) -> Self {
        match result {
            Ok(records) => Self {
                ok: true,
                records: Some(records),
                error_kind: None,
                message: None,
            },
            Err(e) => Self {
                ok: false,
                records: None,
                error_kind: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}
