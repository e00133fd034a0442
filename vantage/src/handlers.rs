use colored::Colorize;
use std::path::Path;
use vantage_core::report::{self, ReportFormat};
use vantage_scanner::result::PageResult;

/// Report formats to write for a `--format` value. Anything that is
/// not a single known format means all of them.
pub fn resolve_formats(format: &str) -> Vec<ReportFormat> {
    match ReportFormat::from_str(format) {
        Some(single) => vec![single],
        None => vec![ReportFormat::Json, ReportFormat::Html],
    }
}

/// Write the requested reports, logging each saved path. A failed
/// write is reported and skipped so the other format still lands.
pub fn save_reports(results: &[PageResult], output: &Path, format: &str) {
    for report_format in resolve_formats(format) {
        let saved = match report_format {
            ReportFormat::Json => report::save_json_report(results, output),
            ReportFormat::Html => report::generate_html_report(results, output),
        };
        match saved {
            Ok(path) => println!("📄 Report saved to {}", path.display()),
            Err(e) => eprintln!("{} could not write report: {}", "error:".red(), e),
        }
    }
}
