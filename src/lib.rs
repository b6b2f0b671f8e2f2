//! `tick-sightings` is a small library (and CLI) for turning raw
//! wildlife-sighting survey exports into a canonical, queryable dataset.
//!
//! The pipeline has three stages, always in this order:
//!
//! 1. **Clean** ([`cleaning::clean`] / [`ops::clean_file`]): decode a
//!    spreadsheet or CSV into an in-memory [`types::Table`], collapse exact
//!    duplicates (first occurrence wins), impute every missing cell to the
//!    literal `"Unknown"`, and normalize the `date` column to ISO 8601
//!    (`YYYY-MM-DDTHH:MM:SS`) or `"Unknown"`. The canonical result is
//!    persisted as UTF-8 CSV.
//! 2. **Search** ([`query::search`] / [`ops::search_file`]): inclusive
//!    time-range and case-insensitive location filters over the canonical
//!    table, composed by conjunction, always returning an order-preserving
//!    subsequence.
//! 3. **Report** ([`report::render_report`] / [`ops::report_file`]): regional
//!    counts plus monthly and ISO-week trend buckets, rendered as a fixed
//!    four-section text document.
//!
//! Row-level data quality never fails a run; anomalies degrade to the
//! `"Unknown"` sentinel. Structural problems (missing file, missing required
//! column, malformed query bound, undecodable source) surface as
//! [`error::PipelineError`].
//!
//! ## Quick example
//!
//! ```rust
//! use tick_sightings::cleaning::clean;
//! use tick_sightings::query::{search, MatchMode, TimeRange};
//! use tick_sightings::types::{Cell, Table};
//!
//! # fn main() -> Result<(), tick_sightings::PipelineError> {
//! let raw = Table::new(
//!     vec!["date".to_string(), "location".to_string()],
//!     vec![
//!         vec![Cell::Text("2024-01-05".into()), Cell::Text("London".into())],
//!         vec![Cell::Text("2024-01-05".into()), Cell::Text("London".into())],
//!         vec![Cell::Missing, Cell::Text("Leeds".into())],
//!     ],
//! );
//!
//! let (canonical, summary) = clean(&raw);
//! assert_eq!(summary.duplicates_removed, 1);
//!
//! let range = TimeRange::parse(Some("2024-01-01"), Some("2024-01-31"))?;
//! let hits = search(&canonical, &range, Some("london"), MatchMode::Exact)?;
//! assert_eq!(hits.row_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the in-memory [`types::Table`] / [`types::Cell`] data model
//! - [`ingestion`]: spreadsheet/CSV decode and canonical CSV encode
//! - [`dates`]: the explicit, total date parser and ISO formatter
//! - [`cleaning`]: deduplication, imputation, date normalization
//! - [`query`]: the time-range/location filter engine
//! - [`report`]: the aggregation engine and text report
//! - [`ops`]: file-level clean/search/report operations
//! - [`observe`]: optional operation observers (stderr/file logging)
//! - [`error`]: the shared error type

pub mod cleaning;
pub mod dates;
pub mod error;
pub mod ingestion;
pub mod observe;
pub mod ops;
pub mod query;
pub mod report;
pub mod types;

pub use error::{PipelineError, PipelineResult};
