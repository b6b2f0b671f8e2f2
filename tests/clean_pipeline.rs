use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tick_sightings::error::PipelineError;
use tick_sightings::ops::{clean_file, OpOptions};
use tick_sightings::types::{Cell, Table, UNKNOWN};

const FIXTURE: &str = "tests/fixtures/raw_sightings.csv";

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tick-sightings-{name}-{nanos}.csv"))
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

fn date_cells(table: &Table) -> Vec<&Cell> {
    let idx = table.index_of("date").unwrap();
    table.rows.iter().map(|r| &r[idx]).collect()
}

#[test]
fn clean_file_produces_canonical_csv_and_summary() {
    let out = tmp_file("cleaned");
    let outcome = clean_file(FIXTURE, Some(&out), &OpOptions::default()).unwrap();

    assert_eq!(outcome.summary.input_rows, 7);
    assert_eq!(outcome.summary.output_rows, 6);
    assert_eq!(outcome.summary.duplicates_removed, 1);
    assert_eq!(outcome.output_path, out);
    assert!(out.exists());

    assert_eq!(
        date_cells(&outcome.table),
        vec![
            &text("2024-01-05T00:00:00"),
            &text(UNKNOWN),
            &text("2024-01-12T09:30:00"),
            &text("2024-01-20T00:00:00"),
            &text(UNKNOWN),
            &text("2024-02-02T00:00:00"),
        ]
    );

    std::fs::remove_file(&out).unwrap();
}

#[test]
fn cleaned_table_holds_the_invariants() {
    let out = tmp_file("invariants");
    let outcome = clean_file(FIXTURE, Some(&out), &OpOptions::default()).unwrap();
    let table = &outcome.table;

    // No cell holds the missing marker.
    for row in &table.rows {
        assert!(row.iter().all(|c| !matches!(c, Cell::Missing)));
    }

    // No two rows are exactly equal across all columns.
    for (i, a) in table.rows.iter().enumerate() {
        for b in table.rows.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }

    std::fs::remove_file(&out).unwrap();
}

#[test]
fn cleaning_the_cleaned_csv_is_a_noop() {
    let first = tmp_file("first-pass");
    let outcome = clean_file(FIXTURE, Some(&first), &OpOptions::default()).unwrap();

    let second = tmp_file("second-pass");
    let again = clean_file(&first, Some(&second), &OpOptions::default()).unwrap();

    assert_eq!(again.summary.duplicates_removed, 0);
    assert_eq!(again.summary.input_rows, again.summary.output_rows);
    assert_eq!(again.table, outcome.table);
    assert_eq!(
        std::fs::read_to_string(&second).unwrap(),
        std::fs::read_to_string(&first).unwrap()
    );

    std::fs::remove_file(&first).unwrap();
    std::fs::remove_file(&second).unwrap();
}

#[test]
fn clean_file_errors_on_missing_input() {
    let err = clean_file("does_not_exist.csv", None, &OpOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));
}

#[test]
fn clean_file_defaults_output_next_to_input() {
    // Copy the fixture into a temp dir so the default output lands there too.
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tick-sightings-default-out-{nanos}"));
    std::fs::create_dir(&dir).unwrap();
    let input = dir.join("raw.csv");
    std::fs::copy(FIXTURE, &input).unwrap();

    let outcome = clean_file(&input, None, &OpOptions::default()).unwrap();
    assert_eq!(outcome.output_path, dir.join("cleaned_tick_sightings.csv"));
    assert!(outcome.output_path.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
