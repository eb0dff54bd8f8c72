use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ErrorKind, IngestionError};

use super::format::IngestionFormat;
use super::unified::IngestionStage;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the upload was rejected).
    Error,
    /// Critical error (storage or other infrastructure failures).
    Critical,
}

impl IngestionSeverity {
    /// Severity of a failed ingestion: storage and source I/O are Critical, bad input is Error.
    pub fn for_error(e: &IngestionError) -> Self {
        match e {
            IngestionError::Source(_) => Self::Critical,
            IngestionError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            _ if e.kind() == ErrorKind::StorageError => Self::Critical,
            _ => Self::Error,
        }
    }
}

/// Context about one ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// File name as uploaded.
    pub file_name: String,
    /// Detected encoding.
    pub format: IngestionFormat,
    /// Last stage the pipeline reached.
    pub stage: IngestionStage,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of records persisted.
    pub records: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when a dataset was stored.
    fn on_success(&self, _ctx: &IngestionContext, _dataset: &str, _stats: IngestionStats) {}

    /// Called when ingestion is rejected.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a rejection meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, dataset: &str, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, dataset, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, dataset: &str, stats: IngestionStats) {
        eprintln!(
            "[ingest][ok] format={} file={} dataset={} records={}",
            ctx.format, ctx.file_name, dataset, stats.records
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ingest][{:?}] format={} file={} stage={:?} kind={} err={}",
            severity,
            ctx.format,
            ctx.file_name,
            ctx.stage,
            error.kind(),
            error
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ALERT][ingest][{:?}] format={} file={} stage={:?} kind={} err={}",
            severity,
            ctx.format,
            ctx.file_name,
            ctx.stage,
            error.kind(),
            error
        );
    }
}

/// Emits ingestion events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, dataset: &str, stats: IngestionStats) {
        tracing::info!(
            format = %ctx.format,
            file = %ctx.file_name,
            dataset,
            records = stats.records,
            "ingestion stored"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        match severity {
            IngestionSeverity::Info | IngestionSeverity::Warning => tracing::warn!(
                format = %ctx.format,
                file = %ctx.file_name,
                stage = ?ctx.stage,
                kind = %error.kind(),
                error = %error,
                "ingestion rejected"
            ),
            IngestionSeverity::Error | IngestionSeverity::Critical => tracing::error!(
                severity = ?severity,
                format = %ctx.format,
                file = %ctx.file_name,
                stage = ?ctx.stage,
                kind = %error.kind(),
                error = %error,
                "ingestion rejected"
            ),
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(
            alert = true,
            severity = ?severity,
            format = %ctx.format,
            file = %ctx.file_name,
            stage = ?ctx.stage,
            error = %error,
            "ingestion alert"
        );
    }
}

/// Appends ingestion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, dataset: &str, stats: IngestionStats) {
        self.append_line(&format!(
            "{} ok format={} file={} dataset={} records={}",
            unix_ts(),
            ctx.format,
            ctx.file_name,
            dataset,
            stats.records
        ));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={} file={} stage={:?} kind={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.file_name,
            ctx.stage,
            error.kind(),
            error
        ));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={} file={} stage={:?} kind={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.file_name,
            ctx.stage,
            error.kind(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
