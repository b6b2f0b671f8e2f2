//! The cleaning/normalization pass.
//!
//! [`clean`] turns a raw [`Table`] into the canonical form in three ordered
//! steps:
//!
//! 1. **Deduplication**: exact-duplicate rows (full value equality on raw,
//!    pre-imputation values) are collapsed to their first occurrence; surviving
//!    row order is unchanged.
//! 2. **Imputation**: every missing cell becomes the literal `"Unknown"`.
//!    Running this after dedup means imputation cannot create new duplicate
//!    collisions that dedup would otherwise have removed.
//! 3. **Date normalization** (only if a `date` column exists): each cell is
//!    rewritten to canonical ISO 8601 (`YYYY-MM-DDTHH:MM:SS`) when parseable,
//!    `"Unknown"` otherwise. Numeric cells are treated as Excel serial dates.
//!
//! Data quality never fails a run; every anomaly degrades to `"Unknown"`.

use std::collections::HashSet;

use serde::Serialize;

use crate::dates::{format_iso, from_excel_serial, parse_date};
use crate::types::{Cell, Table, UNKNOWN};

/// Column treated specially by date normalization.
pub const DATE_COLUMN: &str = "date";

/// Counts reported by a cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    /// Rows in the raw input.
    pub input_rows: usize,
    /// Rows in the canonical output.
    pub output_rows: usize,
    /// Exact-duplicate rows collapsed (`input_rows - output_rows`).
    pub duplicates_removed: usize,
}

/// Clean a raw table into its canonical form.
///
/// Returns the canonical [`Table`] plus a [`CleaningSummary`]. The input is
/// not mutated; cleaning an already-canonical table is a no-op (same rows,
/// zero duplicates removed).
pub fn clean(raw: &Table) -> (Table, CleaningSummary) {
    let input_rows = raw.row_count();

    let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(input_rows);
    let deduped = raw.filter_rows(|row| seen.insert(row.iter().map(CellKey::from).collect()));
    let output_rows = deduped.row_count();

    let date_idx = deduped.index_of(DATE_COLUMN);
    let rows = deduped
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(idx, cell)| {
                    let cell = impute(cell);
                    if Some(idx) == date_idx {
                        normalize_date(cell)
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect();

    let canonical = Table::new(deduped.columns, rows);
    let summary = CleaningSummary {
        input_rows,
        output_rows,
        duplicates_removed: input_rows - output_rows,
    };
    (canonical, summary)
}

/// Hashable key over raw cell values, used for exact-duplicate detection.
/// Numbers key on their bit pattern; cleaning never does arithmetic on them.
#[derive(PartialEq, Eq, Hash)]
enum CellKey {
    Missing,
    Text(String),
    Number(u64),
}

impl From<&Cell> for CellKey {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Missing => CellKey::Missing,
            Cell::Text(s) => CellKey::Text(s.clone()),
            Cell::Number(n) => CellKey::Number(n.to_bits()),
        }
    }
}

fn impute(cell: Cell) -> Cell {
    match cell {
        Cell::Missing => Cell::Text(UNKNOWN.to_string()),
        other => other,
    }
}

fn normalize_date(cell: Cell) -> Cell {
    // "Unknown" means the cell was absent; leave it as the sentinel.
    let parsed = if cell.is_unknown() {
        None
    } else {
        match &cell {
            Cell::Text(s) => parse_date(s),
            Cell::Number(n) => from_excel_serial(*n),
            Cell::Missing => None,
        }
    };
    match parsed {
        Some(dt) => Cell::Text(format_iso(dt)),
        None => Cell::Text(UNKNOWN.to_string()),
    }
}
