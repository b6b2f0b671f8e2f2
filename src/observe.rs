//! Observer hooks for operation outcomes.
//!
//! Each top-level operation returns its summary as a value; observers are an
//! optional side channel for callers that additionally want logs or alerts
//! (the CLI's `-v` flag installs [`StdErrObserver`]).

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PipelineError;

/// Severity classification for failed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpSeverity {
    /// Error-level event (operation failed on a structural problem).
    Error,
    /// Critical error (missing input or other infrastructure failures).
    Critical,
}

/// Classify an error for observer callbacks.
pub fn severity_for_error(e: &PipelineError) -> OpSeverity {
    match e {
        PipelineError::NotFound { .. } | PipelineError::Io(_) => OpSeverity::Critical,
        PipelineError::Csv(err) => match err.kind() {
            csv::ErrorKind::Io(_) => OpSeverity::Critical,
            _ => OpSeverity::Error,
        },
        #[cfg(feature = "excel")]
        PipelineError::Excel(_) => OpSeverity::Error,
        PipelineError::MissingColumn { .. }
        | PipelineError::InvalidQuery { .. }
        | PipelineError::DecodeFailure { .. }
        | PipelineError::Json(_) => OpSeverity::Error,
    }
}

/// Context about an operation attempt.
#[derive(Debug, Clone)]
pub struct OpContext {
    /// Operation name (`clean`, `search`, `report`).
    pub op: &'static str,
    /// Primary input path for the operation.
    pub input: PathBuf,
}

/// Minimal stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpStats {
    /// Rows in the operation's result.
    pub rows: usize,
}

/// Observer interface for operation outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when an operation succeeds.
    fn on_success(&self, _ctx: &OpContext, _stats: OpStats) {}

    /// Called when an operation fails.
    fn on_failure(&self, _ctx: &OpContext, _severity: OpSeverity, _error: &PipelineError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
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

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &OpContext, stats: OpStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &OpContext, severity: OpSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }
}

/// Logs operation events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_success(&self, ctx: &OpContext, stats: OpStats) {
        eprintln!(
            "[{op}][ok] input={input} rows={rows}",
            op = ctx.op,
            input = ctx.input.display(),
            rows = stats.rows
        );
    }

    fn on_failure(&self, ctx: &OpContext, severity: OpSeverity, error: &PipelineError) {
        eprintln!(
            "[{op}][{severity:?}] input={input} err={error}",
            op = ctx.op,
            input = ctx.input.display(),
        );
    }
}

/// Appends operation events to a local log file.
///
/// Writes are best-effort; failures to open/write the log file are ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
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

impl PipelineObserver for FileObserver {
    fn on_success(&self, ctx: &OpContext, stats: OpStats) {
        self.append_line(&format!(
            "{ts} ok op={op} input={input} rows={rows}",
            ts = unix_ts(),
            op = ctx.op,
            input = ctx.input.display(),
            rows = stats.rows
        ));
    }

    fn on_failure(&self, ctx: &OpContext, severity: OpSeverity, error: &PipelineError) {
        self.append_line(&format!(
            "{ts} fail severity={severity:?} op={op} input={input} err={error}",
            ts = unix_ts(),
            op = ctx.op,
            input = ctx.input.display(),
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
