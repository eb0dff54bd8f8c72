//! Service configuration.

use std::path::PathBuf;

use crate::types::DEFAULT_DATASET;

/// Environment variable overriding [`ServiceConfig::data_dir`].
pub const ENV_DATA_DIR: &str = "FLU_DATA_DIR";
/// Environment variable overriding [`ServiceConfig::default_dataset`].
pub const ENV_DEFAULT_DATASET: &str = "FLU_DEFAULT_DATASET";
/// Environment variable overriding [`ServiceConfig::credentials_path`].
pub const ENV_CREDENTIALS_PATH: &str = "FLU_CREDENTIALS_PATH";

/// Where datasets and credentials live, and what to serve by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Flat directory holding one `<name>.json` per dataset.
    pub data_dir: PathBuf,
    /// Dataset returned when a fetch names none.
    pub default_dataset: String,
    /// CSV file with a `username,password` header.
    pub credentials_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            default_dataset: DEFAULT_DATASET.to_string(),
            credentials_path: PathBuf::from("login/users.csv"),
        }
    }
}

impl ServiceConfig {
    /// Defaults, overridden by any of the `FLU_*` environment variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for each `FLU_*` key.
    ///
    /// Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();
        if let Some(v) = get(ENV_DATA_DIR) {
            cfg.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_DEFAULT_DATASET) {
            cfg.default_dataset = v;
        }
        if let Some(v) = get(ENV_CREDENTIALS_PATH) {
            cfg.credentials_path = PathBuf::from(v);
        }
        cfg
    }
}
