//! Raw-table decode/encode.
//!
//! The cleaner accepts either a spreadsheet export or a plain CSV; format is
//! inferred from the file extension by [`read_raw_table`]. The canonical
//! persisted form is always CSV, via [`csv::write_csv_to_path`] and
//! [`csv::read_csv_from_path`].

use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::Table;

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;

pub use csv::{read_csv_from_path, read_csv_from_reader, write_csv_to_path, write_csv_to_writer};

/// Supported raw input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl SourceFormat {
    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Read a raw input file into a [`Table`], inferring the format from the file
/// extension.
///
/// `sheet` selects the worksheet for Excel sources and is ignored for CSV.
/// Fails with [`PipelineError::NotFound`] when the path does not exist.
pub fn read_raw_table(path: impl AsRef<Path>, sheet: Option<&str>) -> PipelineResult<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PipelineError::NotFound {
            path: path.to_path_buf(),
        });
    }

    match infer_format(path)? {
        SourceFormat::Csv => csv::read_csv_from_path(path),
        SourceFormat::Excel => read_excel_dispatch(path, sheet),
    }
}

fn infer_format(path: &Path) -> PipelineResult<SourceFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PipelineError::DecodeFailure {
            path: path.to_path_buf(),
            message: "cannot infer format: path has no extension".to_string(),
        })?;

    SourceFormat::from_extension(ext).ok_or_else(|| PipelineError::DecodeFailure {
        path: path.to_path_buf(),
        message: format!("cannot infer format from extension '{ext}'"),
    })
}

fn read_excel_dispatch(path: &Path, sheet: Option<&str>) -> PipelineResult<Table> {
    // Avoid unused warnings when the feature is off.
    let _ = sheet;

    #[cfg(feature = "excel")]
    {
        excel::read_excel_from_path(path, sheet)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(PipelineError::DecodeFailure {
            path: path.to_path_buf(),
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
