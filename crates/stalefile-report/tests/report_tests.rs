use stalefile_core::{EntryError, EntryErrorKind, FileRecord, RunStats};
use stalefile_report::{Action, OutputFormat, ReportConfig, Reporter, ScanOutcome};
use stalefile_scan::{AgeScanner, ScanConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

/// Three files of 50, 150 and 150 000 bytes under a canonical temp root.
fn create_sized_tree() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = fs::canonicalize(temp.path()).unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("a.bin"), vec![0u8; 50]).unwrap();
    fs::write(root.join("b.bin"), vec![0u8; 150]).unwrap();
    fs::write(root.join("sub/c.bin"), vec![0u8; 150_000]).unwrap();
    (temp, root)
}

fn scan_everything(root: &Path) -> ScanOutcome {
    AgeScanner::new()
        .scan_with(&ScanConfig::new([root]), SystemTime::now(), |_| Ok(UNIX_EPOCH))
        .unwrap()
}

fn render(reporter: &Reporter, outcome: &mut ScanOutcome) -> String {
    let mut out = Vec::new();
    reporter.emit(outcome, Instant::now(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn config(actions: Vec<Action>) -> ReportConfig {
    ReportConfig::builder().actions(actions).build().unwrap()
}

#[test]
fn test_lines_follow_kept_order() {
    let (_temp, root) = create_sized_tree();
    let mut outcome = scan_everything(&root);
    let reporter = Reporter::with_cwd(config(vec![Action::RelPath]), &root);

    let text = render(&reporter, &mut outcome);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "a.bin");
    assert_eq!(lines[1], "b.bin");
    assert_eq!(lines[2], Path::new("sub").join("c.bin").display().to_string());
    assert!(text.contains(" #File kept = 3"));
    assert!(text.contains(" #File error = 0"));
    assert!(text.contains(" Time (ms): "));
    assert!(!text.contains("-e, --error"));
    assert!(!text.contains("Cumulated size"));
}

#[test]
fn test_columns_follow_action_order() {
    let (_temp, root) = create_sized_tree();
    let mut outcome = scan_everything(&root);
    let reporter = Reporter::with_cwd(config(vec![Action::Size, Action::Noop, Action::RelPath]), &root);

    let text = render(&reporter, &mut outcome);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "50 o a.bin");
    assert_eq!(lines[1], "0.15 K b.bin");
    assert!(lines[2].starts_with("0.15 M "));
}

#[test]
fn test_size_total_independent_of_order() {
    let (_temp, root) = create_sized_tree();

    let mut first = scan_everything(&root);
    let summary = Reporter::with_cwd(config(vec![Action::Size, Action::RelPath]), &root)
        .emit(&mut first, Instant::now(), &mut Vec::new())
        .unwrap();
    assert_eq!(summary.total_size, Some(150_200));

    let mut second = scan_everything(&root);
    let summary = Reporter::with_cwd(
        config(vec![Action::AbsPath, Action::Noop, Action::Size]),
        &root,
    )
    .emit(&mut second, Instant::now(), &mut Vec::new())
    .unwrap();
    assert_eq!(summary.total_size, Some(150_200));
    assert_eq!(first.stats.total_size, second.stats.total_size);
}

#[test]
fn test_cumulated_size_printed_only_with_size_action() {
    let (_temp, root) = create_sized_tree();

    let mut outcome = scan_everything(&root);
    let text = render(&Reporter::with_cwd(config(vec![Action::Size]), &root), &mut outcome);
    assert!(text.contains(" Cumulated size: 1.502e-4 G\n"));

    let mut outcome = scan_everything(&root);
    let text = render(&Reporter::with_cwd(config(vec![Action::RelPath]), &root), &mut outcome);
    assert!(!text.contains("Cumulated size"));
    assert_eq!(outcome.stats.total_size, 0);
}

#[test]
fn test_cumulated_size_skipped_when_total_is_zero() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("empty"), "").unwrap();

    let mut outcome = scan_everything(temp.path());
    let reporter = Reporter::with_cwd(config(vec![Action::Size]), temp.path());
    let mut out = Vec::new();
    let summary = reporter.emit(&mut outcome, Instant::now(), &mut out).unwrap();

    assert_eq!(summary.total_size, None);
    assert!(!String::from_utf8(out).unwrap().contains("Cumulated size"));
}

fn outcome_with_errors() -> ScanOutcome {
    let mut stats = RunStats::new();
    stats.record_checked();
    stats.record_error();
    stats.record_error();

    ScanOutcome {
        kept: vec![FileRecord::new("/gone/kept.txt", UNIX_EPOCH)],
        errored: vec![
            EntryError::new("/data/first", "denied", EntryErrorKind::Metadata),
            EntryError::new("/data/second", "broken link", EntryErrorKind::Metadata),
        ],
        dir_errors: Vec::new(),
        stats,
        cutoff: UNIX_EPOCH + Duration::from_secs(60),
        scan_duration: Duration::ZERO,
    }
}

#[test]
fn test_error_listing_on_request() {
    let reporter = Reporter::with_cwd(
        ReportConfig::builder()
            .actions(vec![Action::AbsPath])
            .show_errors(true)
            .build()
            .unwrap(),
        "/",
    );
    let text = render(&reporter, &mut outcome_with_errors());

    let header = text.find("---------- File system error path").unwrap();
    let first = text.find("/data/first").unwrap();
    let second = text.find("/data/second").unwrap();
    assert!(header < first && first < second);
    assert!(text.contains(" #File error = 2"));
    assert!(!text.contains("-e, --error"));
}

#[test]
fn test_error_hint_without_listing() {
    let reporter = Reporter::with_cwd(config(vec![Action::AbsPath]), "/");
    let text = render(&reporter, &mut outcome_with_errors());

    assert!(!text.contains("File system error path"));
    assert!(!text.contains("/data/first"));
    assert!(text.contains(" To print the list of file system error use -e, --error option"));
}

#[test]
fn test_vanished_file_keeps_its_line() {
    let reporter = Reporter::with_cwd(config(vec![Action::Size, Action::AbsPath]), "/");
    let mut outcome = outcome_with_errors();
    let mut out = Vec::new();
    let summary = reporter.emit(&mut outcome, Instant::now(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().next().unwrap(), "/gone/kept.txt");
    assert_eq!(summary.size_errors.len(), 1);
    assert_eq!(summary.size_errors[0].kind, EntryErrorKind::SizeUnavailable);
    assert_eq!(summary.total_size, None);
    assert_eq!(summary.kept, 1);
}

#[test]
fn test_quiet_prints_only_lines() {
    let (_temp, root) = create_sized_tree();
    let mut outcome = scan_everything(&root);
    let reporter = Reporter::with_cwd(
        ReportConfig::builder()
            .actions(vec![Action::RelPath])
            .quiet(true)
            .build()
            .unwrap(),
        &root,
    );

    let mut header = Vec::new();
    reporter.write_header(&mut header, outcome.cutoff).unwrap();
    assert!(header.is_empty());

    let text = render(&reporter, &mut outcome);
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_header_shows_time_limit() {
    let reporter = Reporter::with_cwd(ReportConfig::default(), "/");
    let mut out = Vec::new();
    reporter.write_header(&mut out, SystemTime::now()).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("==== START FILE SYSTEM PROFILING ===="));
    assert!(text.contains(" Time limit: "));
}

#[test]
fn test_json_report() {
    let (_temp, root) = create_sized_tree();
    let mut outcome = scan_everything(&root);
    let reporter = Reporter::with_cwd(
        ReportConfig::builder()
            .actions(vec![Action::RelPath, Action::Size])
            .format(OutputFormat::Json)
            .build()
            .unwrap(),
        &root,
    );

    let text = render(&reporter, &mut outcome);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["kept"].as_array().unwrap().len(), 3);
    assert_eq!(value["kept"][0]["line"], "a.bin 50 o");
    assert_eq!(value["checked"], 3);
    assert_eq!(value["errors"], 0);
    assert_eq!(value["total_size"], 150_200);
    assert!(value["cutoff"].is_string());
}

#[test]
fn test_directory_errors_listed_after_file_errors() {
    let mut outcome = outcome_with_errors();
    outcome.stats.record_dir_error();
    outcome
        .dir_errors
        .push(EntryError::new("/data/locked", "Permission denied", EntryErrorKind::ReadDir));

    let reporter = Reporter::with_cwd(
        ReportConfig::builder()
            .actions(vec![Action::AbsPath])
            .show_errors(true)
            .build()
            .unwrap(),
        "/",
    );
    let text = render(&reporter, &mut outcome);

    assert!(text.contains(" #Directory error = 1"));
    assert!(text.find("/data/second").unwrap() < text.find("/data/locked").unwrap());

    let quiet_dirs = render(&reporter, &mut outcome_with_errors());
    assert!(!quiet_dirs.contains("#Directory error"));
}

#[test]
fn test_cumulated_size_of_one_byte_is_not_zero() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tiny"), "x").unwrap();

    let mut outcome = scan_everything(temp.path());
    let reporter = Reporter::with_cwd(config(vec![Action::Size]), temp.path());
    let text = render(&reporter, &mut outcome);

    assert_eq!(outcome.stats.total_size, 1);
    assert!(text.contains(" Cumulated size: 1e-9 G\n"));
}
