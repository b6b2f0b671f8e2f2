//! Command-line front end for the sighting pipeline.
//!
//! ```bash
//! tick-sightings clean "Tick Sightings.xlsx" --preview
//! tick-sightings search --start 2024-01-01 --location London
//! tick-sightings report cleaned_tick_sightings.csv -o report.txt
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use tick_sightings::ingestion::write_csv_to_path;
use tick_sightings::observe::StdErrObserver;
use tick_sightings::ops::{
    clean_file, report_file, search_file, CleanOutcomeJson, OpOptions, DEFAULT_CLEANED_NAME,
};
use tick_sightings::query::MatchMode;
use tick_sightings::types::Table;
use tick_sightings::PipelineResult;

#[derive(Debug, Parser)]
#[command(name = "tick-sightings", version, about = "Clean, search, and report on wildlife-sighting exports")]
struct Cli {
    /// Log operation outcomes to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Clean a raw spreadsheet/CSV export into the canonical CSV.
    Clean {
        /// Path to the raw export (e.g. "Tick Sightings.xlsx").
        input: PathBuf,
        /// Path for the cleaned CSV (default: cleaned_tick_sightings.csv next to the input).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Excel sheet name.
        #[arg(short, long, default_value = "Sheet1")]
        sheet: String,
        /// Print the first 5 cleaned rows.
        #[arg(long)]
        preview: bool,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Search the cleaned data by time range and location.
    Search {
        /// Path to the cleaned CSV.
        #[arg(long, default_value = DEFAULT_CLEANED_NAME)]
        csv: PathBuf,
        /// Start date/time (inclusive).
        #[arg(long)]
        start: Option<String>,
        /// End date/time (inclusive).
        #[arg(long)]
        end: Option<String>,
        /// Location text to match.
        #[arg(long)]
        location: Option<String>,
        /// Location match mode: exact, contains, or starts.
        #[arg(long, default_value = "contains")]
        r#match: MatchMode,
        /// Write matching rows to a CSV instead of printing.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print at most N rows when not writing output.
        #[arg(long, default_value_t = 10)]
        head: usize,
    },
    /// Generate the summary report from a cleaned CSV.
    Report {
        /// Path to the cleaned CSV.
        #[arg(default_value = DEFAULT_CLEANED_NAME)]
        csv: PathBuf,
        /// Path for the report text file (default: report.txt).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut options = OpOptions::default();
    if cli.verbose {
        options.observer = Some(Arc::new(StdErrObserver));
    }

    match run(cli.command, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, mut options: OpOptions) -> PipelineResult<()> {
    match command {
        Command::Clean {
            input,
            output,
            sheet,
            preview,
            json,
        } => {
            options.sheet = Some(sheet);
            let outcome = clean_file(&input, output.as_deref(), &options)?;
            if preview {
                print_head(&outcome.table, 5);
            }
            if json {
                let view = CleanOutcomeJson {
                    summary: &outcome.summary,
                    output_path: &outcome.output_path,
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!(
                    "Done: input_rows={} output_rows={} duplicates_removed={} output_file={}",
                    outcome.summary.input_rows,
                    outcome.summary.output_rows,
                    outcome.summary.duplicates_removed,
                    outcome.output_path.display()
                );
            }
        }
        Command::Search {
            csv,
            start,
            end,
            location,
            r#match,
            output,
            head,
        } => {
            let hits = search_file(
                &csv,
                start.as_deref(),
                end.as_deref(),
                location.as_deref(),
                r#match,
                &options,
            )?;
            match output {
                Some(out) => {
                    write_csv_to_path(&hits, &out)?;
                    println!("Wrote {} rows to {}", hits.row_count(), out.display());
                }
                None => {
                    if hits.row_count() == 0 {
                        println!("No results matched the filters");
                    } else {
                        print_head(&hits, head);
                        println!("Total matches: {}", hits.row_count());
                    }
                }
            }
        }
        Command::Report { csv, output } => {
            let path = report_file(&csv, output.as_deref(), &options)?;
            println!("Report successfully created: {}", path.display());
        }
    }
    Ok(())
}

fn print_head(table: &Table, n: usize) {
    println!("{}", table.columns.join(","));
    for row in table.rows.iter().take(n) {
        let cells: Vec<String> = row.iter().map(|c| c.render()).collect();
        println!("{}", cells.join(","));
    }
}
