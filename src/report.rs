//! The aggregation engine and text report renderer.
//!
//! Rows whose `date` cell does not parse as a real timestamp are dropped
//! before any aggregation, including the reported total, so the total always
//! equals the sum of each trend breakdown.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use chrono::{Datelike, NaiveDateTime};

use crate::cleaning::DATE_COLUMN;
use crate::dates::parse_date;
use crate::error::PipelineResult;
use crate::query::LOCATION_COLUMN;
use crate::types::{Cell, Table};

/// Render the four-section summary report over a canonical table.
///
/// Requires both `date` and `location` columns
/// ([`crate::error::PipelineError::MissingColumn`] otherwise). Sections, in
/// fixed order: title, total count, regional summary (descending count, ties
/// by first appearance), monthly trend (`YYYY-MM`, ascending), weekly trend
/// (ISO week `GGGG-Www`, ascending). Each bucket renders as `<label>: <count>`.
pub fn render_report(table: &Table) -> PipelineResult<String> {
    let date_idx = table.require_column(DATE_COLUMN)?;
    let loc_idx = table.require_column(LOCATION_COLUMN)?;

    // One dated record per surviving row.
    let dated: Vec<(NaiveDateTime, &str)> = table
        .rows
        .iter()
        .filter_map(|row| {
            let ts = row.get(date_idx)?.as_text().and_then(parse_date)?;
            let loc = match row.get(loc_idx) {
                Some(Cell::Text(s)) => s.as_str(),
                _ => "",
            };
            Some((ts, loc))
        })
        .collect();

    let mut out = String::new();
    writeln!(out, "=== Tick Sighting Report ===").ok();
    writeln!(out).ok();
    writeln!(out, "Total sightings: {}", dated.len()).ok();

    writeln!(out).ok();
    writeln!(out, "--- Sightings per Region ---").ok();
    for (region, count) in regional_counts(&dated) {
        writeln!(out, "{region}: {count}").ok();
    }

    writeln!(out).ok();
    writeln!(out, "--- Monthly Trend (Sightings per Month) ---").ok();
    for (label, count) in period_counts(&dated, month_key) {
        writeln!(out, "{label}: {count}").ok();
    }

    writeln!(out).ok();
    writeln!(out, "--- Weekly Trend (Sightings per Week) ---").ok();
    for (label, count) in period_counts(&dated, week_key) {
        writeln!(out, "{label}: {count}").ok();
    }

    Ok(out)
}

/// Count rows per exact location value, ordered by descending count with ties
/// broken by first appearance.
fn regional_counts(dated: &[(NaiveDateTime, &str)]) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &(_, loc) in dated {
        if !counts.contains_key(loc) {
            order.push(loc.to_owned());
        }
        *counts.entry(loc).or_insert(0) += 1;
    }

    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|loc| {
            let n = counts[loc.as_str()];
            (loc, n)
        })
        .collect();
    // Stable sort keeps first-appearance order for equal counts.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Count rows per calendar period; `key` maps a timestamp to a sortable
/// `(year, period)` pair plus its rendered label.
fn period_counts<K>(dated: &[(NaiveDateTime, &str)], key: K) -> Vec<(String, usize)>
where
    K: Fn(NaiveDateTime) -> ((i32, u32), String),
{
    let mut buckets: BTreeMap<(i32, u32), (String, usize)> = BTreeMap::new();
    for (ts, _) in dated {
        let (ord, label) = key(*ts);
        let entry = buckets.entry(ord).or_insert((label, 0));
        entry.1 += 1;
    }
    buckets.into_values().collect()
}

fn month_key(ts: NaiveDateTime) -> ((i32, u32), String) {
    let (year, month) = (ts.year(), ts.month());
    ((year, month), format!("{year:04}-{month:02}"))
}

fn week_key(ts: NaiveDateTime) -> ((i32, u32), String) {
    let iso = ts.iso_week();
    let (year, week) = (iso.year(), iso.week());
    ((year, week), format!("{year:04}-W{week:02}"))
}
