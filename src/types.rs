//! Core data model types for the sighting pipeline.
//!
//! Raw spreadsheet/CSV input is decoded into an in-memory [`Table`]: an ordered
//! list of column names plus row-major [`Cell`] storage. Unlike a declared-schema
//! model, the column set is discovered from the source header; operations that
//! need specific columns validate up front via [`Table::require_column`].

use crate::error::{PipelineError, PipelineResult};

/// The literal replacement value for any missing or unparseable cell.
pub const UNKNOWN: &str = "Unknown";

/// A single scalar value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing/empty value. Never present after cleaning.
    Missing,
    /// Text value.
    Text(String),
    /// Numeric value (as decoded from a spreadsheet number cell).
    Number(f64),
}

impl Cell {
    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render the cell for CSV output. Missing renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }

    /// True if the cell holds the `"Unknown"` sentinel.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Cell::Text(s) if s == UNKNOWN)
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Cell>>` in source-file order, one cell per
/// column name in `columns`. Insertion order is significant and preserved
/// through cleaning and filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Ordered column names, matching the source header row.
    pub columns: Vec<String>,
    /// Row-major cell storage.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the index of a column, or [`PipelineError::MissingColumn`].
    pub fn require_column(&self, name: &str) -> PipelineResult<usize> {
        self.index_of(name)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_owned(),
                available: self.columns.clone(),
            })
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original columns and row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
