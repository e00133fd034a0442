use tempfile::TempDir;
use vantage::handlers::{resolve_formats, save_reports};
use vantage_core::report::ReportFormat;
use vantage_scanner::result::{PageFailure, PageResult};

fn one_result() -> Vec<PageResult> {
    vec![PageResult::Failed(PageFailure {
        url: "https://example.com/".to_string(),
        viewport: "desktop".to_string(),
        reason: "navigation timed out".to_string(),
    })]
}

#[test]
fn single_formats_resolve_to_one_report() {
    assert_eq!(resolve_formats("json"), vec![ReportFormat::Json]);
    assert_eq!(resolve_formats("HTML"), vec![ReportFormat::Html]);
}

#[test]
fn all_resolves_to_both_reports() {
    assert_eq!(
        resolve_formats("all"),
        vec![ReportFormat::Json, ReportFormat::Html]
    );
}

#[test]
fn save_reports_writes_only_the_requested_format() {
    let dir = TempDir::new().unwrap();

    save_reports(&one_result(), dir.path(), "json");

    assert!(dir.path().join("report.json").exists());
    assert!(!dir.path().join("report.html").exists());
}

#[test]
fn save_reports_writes_every_format_for_all() {
    let dir = TempDir::new().unwrap();

    save_reports(&one_result(), dir.path(), "all");

    assert!(dir.path().join("report.json").exists());
    assert!(dir.path().join("report.html").exists());
}
