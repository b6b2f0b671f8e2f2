#![cfg(feature = "excel")]

//! Excel decode for raw sighting exports.
//!
//! Behavior:
//! - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
//! - Detects the first non-empty row as the header row; its cells become the column set
//! - Reads remaining rows as-is: text stays text, numbers stay numeric (so date
//!   normalization can later recognize Excel serial dates), empty cells are missing

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Cell, Table};

/// Read one sheet of an Excel workbook (`.xlsx`, `.xls`, `.ods`, etc.) into a
/// raw [`Table`].
pub fn read_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> PipelineResult<Table> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_owned(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PipelineError::DecodeFailure {
                path: path.to_path_buf(),
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    read_sheet_range(path, &sheet, &range)
}

fn read_sheet_range(
    path: &Path,
    sheet: &str,
    range: &calamine::Range<Data>,
) -> PipelineResult<Table> {
    let mut header_row_idx: Option<usize> = None;
    let mut columns: Vec<String> = Vec::new();

    for (idx0, row) in range.rows().enumerate() {
        if row.iter().any(|c| !matches!(c, Data::Empty)) {
            header_row_idx = Some(idx0);
            columns = row.iter().map(cell_to_header_string).collect();
            break;
        }
    }

    let header_row_idx = header_row_idx.ok_or_else(|| PipelineError::DecodeFailure {
        path: path.to_path_buf(),
        message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
    })?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if idx0 <= header_row_idx {
            continue;
        }
        let mut out_row: Vec<Cell> = Vec::with_capacity(columns.len());
        for col_idx in 0..columns.len() {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            out_row.push(convert_cell(cell));
        }
        rows.push(out_row);
    }

    Ok(Table::new(columns, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_owned(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Missing,
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Missing
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        // Excel stores date cells as serial numbers; keep the serial so the
        // cleaner's date normalization can convert it.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{e:?}")),
    }
}
