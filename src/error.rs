use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type shared by the clean/search/report operations.
///
/// Only structural problems surface here: a missing input file, a column the
/// requested operation needs, an unreadable source, or a malformed query bound.
/// Row-level data quality (an unparseable date cell, a missing value) never
/// errors; those cells degrade to the `"Unknown"` sentinel during cleaning.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file/path does not exist.
    #[error("input file not found: {path}")]
    NotFound { path: PathBuf },

    /// A column required by the requested operation is absent.
    #[error("missing required column '{column}'. columns={available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A query time bound could not be parsed as any accepted timestamp format.
    #[error("invalid time bound '{raw}': not a recognized date/time")]
    InvalidQuery { raw: String },

    /// Underlying I/O error (e.g. permission denied, unwritable output).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decode/encode error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encode error (machine-readable summary output).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Excel decode error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The source file is not in a format this pipeline can decode.
    #[error("cannot decode '{path}': {message}")]
    DecodeFailure { path: PathBuf, message: String },
}
