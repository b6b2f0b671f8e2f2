//! The filter/query engine over a canonical table.
//!
//! Filters compose by conjunction: time range first, then location, each
//! producing an order-preserving subsequence of its input with no value
//! mutation. Either filter used alone has identical semantics.

use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::cleaning::DATE_COLUMN;
use crate::dates::parse_date;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Table;

/// Column the location filter matches against.
pub const LOCATION_COLUMN: &str = "location";

/// An inclusive time range; either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub start: Option<NaiveDateTime>,
    /// Inclusive upper bound.
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    /// Parse optional bound strings into a range.
    ///
    /// Each bound accepts the same formats as date cleaning; a supplied bound
    /// that parses as nothing is [`PipelineError::InvalidQuery`].
    pub fn parse(start: Option<&str>, end: Option<&str>) -> PipelineResult<Self> {
        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    /// True when neither bound is set (the filter is a passthrough).
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start.is_none_or(|s| ts >= s) && self.end.is_none_or(|e| ts <= e)
    }
}

fn parse_bound(raw: Option<&str>) -> PipelineResult<Option<NaiveDateTime>> {
    match raw {
        None => Ok(None),
        Some(s) => match parse_date(s) {
            Some(ts) => Ok(Some(ts)),
            None => Err(PipelineError::InvalidQuery { raw: s.to_owned() }),
        },
    }
}

/// How a location query string is compared against stored location text.
///
/// All modes compare case-insensitively after trimming surrounding whitespace
/// on both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Whole-value equality.
    Exact,
    /// Substring match (default).
    #[default]
    Contains,
    /// Prefix match.
    Starts,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "contains" => Ok(Self::Contains),
            "starts" => Ok(Self::Starts),
            other => Err(format!("unknown match mode '{other}' (expected exact/contains/starts)")),
        }
    }
}

impl MatchMode {
    fn matches(self, stored: &str, query: &str) -> bool {
        let stored = stored.trim().to_lowercase();
        match self {
            Self::Exact => stored == query,
            Self::Contains => stored.contains(query),
            Self::Starts => stored.starts_with(query),
        }
    }
}

/// Keep rows whose `date` cell falls inside `range` (inclusive on both ends).
///
/// An unbounded range is a passthrough and needs no `date` column; once any
/// bound is set the column is required ([`PipelineError::MissingColumn`]) and
/// rows whose date is `"Unknown"` or unparseable are excluded.
pub fn filter_by_time(table: &Table, range: &TimeRange) -> PipelineResult<Table> {
    if range.is_unbounded() {
        return Ok(table.clone());
    }
    let date_idx = table.require_column(DATE_COLUMN)?;

    Ok(table.filter_rows(|row| {
        row.get(date_idx)
            .and_then(|cell| cell.as_text())
            .and_then(parse_date)
            .is_some_and(|ts| range.contains(ts))
    }))
}

/// Keep rows whose `location` cell matches `query` under `mode`.
///
/// A `None` or blank query is a passthrough; otherwise the `location` column
/// is required ([`PipelineError::MissingColumn`]).
pub fn filter_by_location(
    table: &Table,
    query: Option<&str>,
    mode: MatchMode,
) -> PipelineResult<Table> {
    let query = match query.map(str::trim) {
        None | Some("") => return Ok(table.clone()),
        Some(q) => q.to_lowercase(),
    };
    let loc_idx = table.require_column(LOCATION_COLUMN)?;

    Ok(table.filter_rows(|row| {
        row.get(loc_idx)
            .and_then(|cell| cell.as_text())
            .is_some_and(|stored| mode.matches(stored, &query))
    }))
}

/// Apply the time filter then the location filter (conjunction).
pub fn search(
    table: &Table,
    range: &TimeRange,
    location: Option<&str>,
    mode: MatchMode,
) -> PipelineResult<Table> {
    let by_time = filter_by_time(table, range)?;
    filter_by_location(&by_time, location, mode)
}
