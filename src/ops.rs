//! File-level operations: the `clean` / `search` / `report` command surface.
//!
//! Each operation either fully completes and writes its output, or fails and
//! writes nothing; there is no partial-success mode. Summaries come back as
//! values, with an optional [`PipelineObserver`] side channel for logging.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::cleaning::{clean, CleaningSummary};
use crate::error::{PipelineError, PipelineResult};
use crate::ingestion::{read_csv_from_path, read_raw_table, write_csv_to_path};
use crate::observe::{severity_for_error, OpContext, OpStats, PipelineObserver};
use crate::query::{search, MatchMode, TimeRange};
use crate::report::render_report;
use crate::types::Table;

/// Default file name for the canonical cleaned CSV, placed next to the input.
pub const DEFAULT_CLEANED_NAME: &str = "cleaned_tick_sightings.csv";

/// Default file name for the text report, placed in the working directory.
pub const DEFAULT_REPORT_NAME: &str = "report.txt";

/// Options shared by the file-level operations.
#[derive(Clone, Default)]
pub struct OpOptions {
    /// Worksheet to read from Excel sources. `None` selects the first sheet.
    pub sheet: Option<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
}

impl std::fmt::Debug for OpOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpOptions")
            .field("sheet", &self.sheet)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Result of a successful clean operation.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// The canonical table, as persisted.
    pub table: Table,
    /// Cleaning counts.
    pub summary: CleaningSummary,
    /// Where the canonical CSV was written.
    pub output_path: PathBuf,
}

/// Machine-readable view of a clean outcome (for the CLI's `--json` mode).
#[derive(Debug, Serialize)]
pub struct CleanOutcomeJson<'a> {
    #[serde(flatten)]
    pub summary: &'a CleaningSummary,
    pub output_path: &'a Path,
}

/// Clean a raw spreadsheet/CSV export into the canonical CSV.
///
/// `output` defaults to [`DEFAULT_CLEANED_NAME`] next to the input. Fails with
/// [`PipelineError::NotFound`] when the input does not exist; data-quality
/// problems never fail the run.
pub fn clean_file(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    options: &OpOptions,
) -> PipelineResult<CleanOutcome> {
    let input = input.as_ref();
    let ctx = OpContext {
        op: "clean",
        input: input.to_path_buf(),
    };

    let result = clean_file_inner(input, output, options);
    notify(options, &ctx, &result, |o| OpStats {
        rows: o.summary.output_rows,
    });
    result
}

fn clean_file_inner(
    input: &Path,
    output: Option<&Path>,
    options: &OpOptions,
) -> PipelineResult<CleanOutcome> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_CLEANED_NAME),
    };

    let raw = read_raw_table(input, options.sheet.as_deref())?;
    let (canonical, summary) = clean(&raw);
    write_csv_to_path(&canonical, &output_path)?;

    Ok(CleanOutcome {
        table: canonical,
        summary,
        output_path,
    })
}

/// Load the canonical CSV and apply the time/location filters.
///
/// Bounds are optional strings in any accepted date format
/// ([`PipelineError::InvalidQuery`] if supplied but unparseable).
pub fn search_file(
    csv_path: impl AsRef<Path>,
    start: Option<&str>,
    end: Option<&str>,
    location: Option<&str>,
    mode: MatchMode,
    options: &OpOptions,
) -> PipelineResult<Table> {
    let csv_path = csv_path.as_ref();
    let ctx = OpContext {
        op: "search",
        input: csv_path.to_path_buf(),
    };

    let result: PipelineResult<Table> = (|| {
        // Parse bounds before touching the file so a malformed query never
        // depends on input state.
        let range = TimeRange::parse(start, end)?;
        let table = read_canonical(csv_path)?;
        search(&table, &range, location, mode)
    })();
    notify(options, &ctx, &result, |t| OpStats { rows: t.row_count() });
    result
}

/// Generate the text report over a canonical CSV and write it to `output`
/// (default [`DEFAULT_REPORT_NAME`]). Returns the written path.
pub fn report_file(
    csv_path: impl AsRef<Path>,
    output: Option<&Path>,
    options: &OpOptions,
) -> PipelineResult<PathBuf> {
    let csv_path = csv_path.as_ref();
    let ctx = OpContext {
        op: "report",
        input: csv_path.to_path_buf(),
    };

    let mut rows = 0;
    let result: PipelineResult<PathBuf> = (|| {
        let table = read_canonical(csv_path)?;
        rows = table.row_count();
        let text = render_report(&table)?;
        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_NAME));
        std::fs::write(&output_path, text)?;
        Ok(output_path)
    })();
    notify(options, &ctx, &result, |_| OpStats { rows });
    result
}

fn read_canonical(path: &Path) -> PipelineResult<Table> {
    if !path.exists() {
        return Err(PipelineError::NotFound {
            path: path.to_path_buf(),
        });
    }
    read_csv_from_path(path)
}

fn notify<T>(
    options: &OpOptions,
    ctx: &OpContext,
    result: &PipelineResult<T>,
    stats: impl Fn(&T) -> OpStats,
) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match result {
        Ok(value) => obs.on_success(ctx, stats(value)),
        Err(e) => obs.on_failure(ctx, severity_for_error(e), e),
    }
}
