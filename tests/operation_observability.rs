use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tick_sightings::observe::{
    CompositeObserver, FileObserver, OpContext, OpSeverity, OpStats, PipelineObserver,
};
use tick_sightings::ops::{clean_file, report_file, search_file, OpOptions};
use tick_sightings::query::MatchMode;
use tick_sightings::PipelineError;

const FIXTURE: &str = "tests/fixtures/raw_sightings.csv";

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(String, usize)>>,
    failures: Mutex<Vec<(String, OpSeverity)>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_success(&self, ctx: &OpContext, stats: OpStats) {
        self.successes
            .lock()
            .unwrap()
            .push((ctx.op.to_string(), stats.rows));
    }

    fn on_failure(&self, ctx: &OpContext, severity: OpSeverity, _error: &PipelineError) {
        self.failures
            .lock()
            .unwrap()
            .push((ctx.op.to_string(), severity));
    }
}

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tick-sightings-{name}-{nanos}.{ext}"))
}

fn options_with(observer: Arc<dyn PipelineObserver>) -> OpOptions {
    OpOptions {
        observer: Some(observer),
        ..Default::default()
    }
}

#[test]
fn observer_receives_success_with_row_count() {
    let obs = Arc::new(RecordingObserver::default());
    let out = tmp_file("observed-clean", "csv");

    clean_file(FIXTURE, Some(&out), &options_with(obs.clone())).unwrap();

    // 7 fixture rows minus 1 exact duplicate.
    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes, vec![("clean".to_string(), 6)]);
    assert!(obs.failures.lock().unwrap().is_empty());

    std::fs::remove_file(&out).unwrap();
}

#[test]
fn observer_receives_critical_failure_for_missing_input() {
    let obs = Arc::new(RecordingObserver::default());

    let err = search_file(
        "tests/fixtures/does_not_exist.csv",
        None,
        None,
        Some("London"),
        MatchMode::Contains,
        &options_with(obs.clone()),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![("search".to_string(), OpSeverity::Critical)]);
    assert!(obs.successes.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_error_failure_for_missing_column() {
    let obs = Arc::new(RecordingObserver::default());
    let csv = tmp_file("observed-no-loc", "csv");
    std::fs::write(&csv, "date,species\n2024-01-05T00:00:00,Ixodes\n").unwrap();

    let err = report_file(&csv, None, &options_with(obs.clone())).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn { .. }));

    // Structural column problems rank below missing-input failures.
    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![("report".to_string(), OpSeverity::Error)]);
    assert!(OpSeverity::Error < OpSeverity::Critical);

    std::fs::remove_file(&csv).unwrap();
}

#[test]
fn composite_observer_fans_out_to_all_observers() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let composite = Arc::new(CompositeObserver::new(vec![
        first.clone() as Arc<dyn PipelineObserver>,
        second.clone() as Arc<dyn PipelineObserver>,
    ]));
    let out = tmp_file("observed-fanout", "csv");

    clean_file(FIXTURE, Some(&out), &options_with(composite)).unwrap();

    assert_eq!(
        first.successes.lock().unwrap().clone(),
        vec![("clean".to_string(), 6)]
    );
    assert_eq!(
        first.successes.lock().unwrap().clone(),
        second.successes.lock().unwrap().clone()
    );

    std::fs::remove_file(&out).unwrap();
}

#[test]
fn file_observer_appends_success_and_failure_lines() {
    let log = tmp_file("observed-log", "log");
    let obs = Arc::new(FileObserver::new(&log));
    let out = tmp_file("observed-file-clean", "csv");

    clean_file(FIXTURE, Some(&out), &options_with(obs.clone())).unwrap();
    let _ = search_file(
        "tests/fixtures/does_not_exist.csv",
        None,
        None,
        None,
        MatchMode::Contains,
        &options_with(obs),
    )
    .unwrap_err();

    let lines: Vec<String> = std::fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ok op=clean"));
    assert!(lines[0].contains("rows=6"));
    assert!(lines[1].contains("fail severity=Critical op=search"));

    std::fs::remove_file(&log).unwrap();
    std::fs::remove_file(&out).unwrap();
}
