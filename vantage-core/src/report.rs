// Report generation from crawl results

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use vantage_scanner::network::NetworkAnalysis;
use vantage_scanner::result::{PageAudit, PageFailure, PageResult, CRAWL_ERROR_TITLE};
use vantage_scanner::security::SecurityAudit;
use vantage_scanner::seo::SeoAudit;
use vantage_scanner::session::AccessibilityFinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Html,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" => Some(ReportFormat::Html),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("report IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Empty the screenshots directory and drop stale report files, so a
/// fresh run never mixes with artifacts of the previous one. Creates
/// the output tree when it does not exist yet.
pub fn clear_reports(output_dir: &Path) -> Result<()> {
    let screenshots = output_dir.join("screenshots");
    if screenshots.exists() {
        fs::remove_dir_all(&screenshots)?;
    }
    fs::create_dir_all(&screenshots)?;

    for stale in ["report.json", "report.html"] {
        let path = output_dir.join(stale);
        if path.exists() {
            fs::remove_file(path)?;
        }
    }

    info!("cleared previous reports in {}", output_dir.display());
    Ok(())
}

pub fn save_json_report(results: &[PageResult], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("report.json");
    let json = serde_json::to_string_pretty(results)?;
    fs::write(&path, json)?;
    info!("results saved to {}", path.display());
    Ok(path)
}

pub fn generate_html_report(results: &[PageResult], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let total_issues: usize = results
        .iter()
        .filter_map(|r| match r {
            PageResult::Audited(a) => a.accessibility.as_ref().map(Vec::len),
            PageResult::Failed(_) => None,
        })
        .sum();
    let failed_pages = results.iter().filter(|r| r.is_failed()).count();

    let rows: String = results
        .iter()
        .map(|r| match r {
            PageResult::Audited(audit) => audited_row(audit, output_dir),
            PageResult::Failed(failure) => failed_row(failure),
        })
        .collect();

    let html = full_html(
        &rows,
        results.len(),
        total_issues,
        failed_pages,
        &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    let path = output_dir.join("report.html");
    fs::write(&path, html)?;
    info!("HTML report generated at {}", path.display());
    Ok(path)
}

// --- Row rendering ---

fn audited_row(audit: &PageAudit, output_dir: &Path) -> String {
    let url = escape(&audit.url);
    let console = if audit.console_messages.is_empty() {
        no_data()
    } else {
        audit
            .console_messages
            .iter()
            .map(|m| format!("[{}] {}", escape(&m.level), escape(&m.text)))
            .collect::<Vec<_>>()
            .join("<br>")
    };
    let failed_requests = if audit.failed_requests.is_empty() {
        no_data()
    } else {
        audit
            .failed_requests
            .iter()
            .map(|fr| format!("{} ({})", escape(&fr.url), fr.status))
            .collect::<Vec<_>>()
            .join("<br>")
    };
    let actions = if audit.actions.is_empty() {
        no_data()
    } else {
        audit
            .actions
            .iter()
            .map(|a| escape(&a.describe()))
            .collect::<Vec<_>>()
            .join("<br>")
    };

    format!(
        r#"<tr>
  <td><a href="{url}" target="_blank">{url}</a></td>
  <td>{title}</td>
  <td>{status}</td>
  <td>{viewport}</td>
  <td class="cell-scrollable">{console}</td>
  <td class="cell-scrollable">{failed_requests}</td>
  <td>{screenshot}</td>
  <td>{accessibility}</td>
  <td class="security-cell">{security}</td>
  <td class="seo-cell">{seo}</td>
  <td>{performance}</td>
  <td class="wrap">{actions}</td>
  <td>{forms}</td>
  <td class="net-cell">{network}</td>
</tr>"#,
        url = url,
        title = escape(&audit.title),
        status = audit.http_status,
        viewport = escape(&audit.viewport),
        console = console,
        failed_requests = failed_requests,
        screenshot = format_screenshot(audit, output_dir),
        accessibility = format_accessibility(audit.accessibility.as_deref()),
        security = format_security(audit.security.as_ref()),
        seo = format_seo(audit.seo.as_ref()),
        performance = format_performance(audit),
        actions = actions,
        forms = audit.forms_detected,
        network = format_network(audit.network.as_ref()),
    )
}

fn failed_row(failure: &PageFailure) -> String {
    format!(
        r#"<tr class="crawl-error">
  <td><a href="{url}" target="_blank">{url}</a></td>
  <td>{title}</td>
  <td>0</td>
  <td>{viewport}</td>
  <td colspan="10">{reason}</td>
</tr>"#,
        url = escape(&failure.url),
        title = CRAWL_ERROR_TITLE,
        viewport = escape(&failure.viewport),
        reason = escape(&failure.reason),
    )
}

// --- Cell formatting helpers ---

fn no_data() -> String {
    r#"<span class="no-data">-</span>"#.to_string()
}

fn format_screenshot(audit: &PageAudit, output_dir: &Path) -> String {
    match &audit.screenshot_path {
        Some(path) => {
            // Reference screenshots relative to the report file itself.
            let relative = Path::new(path)
                .strip_prefix(output_dir)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| path.clone());
            format!(
                r#"<img src="{}" alt="Screenshot of {}" class="screenshot-thumb" loading="lazy" />"#,
                escape(&relative),
                escape(&audit.title)
            )
        }
        None => r#"<span class="no-data">No Screenshot</span>"#.to_string(),
    }
}

fn format_accessibility(findings: Option<&[AccessibilityFinding]>) -> String {
    let findings = match findings {
        Some(f) if !f.is_empty() => f,
        Some(_) => return r#"<div class="accessibility-ok">No issues found</div>"#.to_string(),
        None => return no_data(),
    };

    findings
        .iter()
        .map(|f| {
            let impact = f.impact.to_lowercase();
            format!(
                r#"<div class="issue issue-{impact}">
  <span class="impact-label">{impact_upper}</span>
  <p>{description} ({nodes} element(s)) <a href="{help_url}" target="_blank">[?]</a></p>
</div>"#,
                impact = escape(&impact),
                impact_upper = escape(&impact.to_uppercase()),
                description = escape(&f.description),
                nodes = f.nodes,
                help_url = escape(&f.help_url),
            )
        })
        .collect()
}

fn format_security(audit: Option<&SecurityAudit>) -> String {
    let audit = match audit {
        Some(audit) => audit,
        None => return no_data(),
    };

    let https = if audit.is_https {
        r#"<div class="https-status https-secure">Secure (HTTPS)</div>"#
    } else {
        r#"<div class="https-status https-insecure">Insecure (HTTP)</div>"#
    };

    let headers: String = audit
        .headers
        .iter()
        .map(|h| {
            let class = if h.compliant { "compliant" } else { "non-compliant" };
            let mark = if h.compliant { "✓" } else { "✗" };
            format!(
                r#"<div class="header-item {class}" title="{}">{mark} {}</div>"#,
                escape(&h.description),
                escape(&h.name)
            )
        })
        .collect();

    let mixed = if audit.mixed_content.is_empty() {
        String::new()
    } else {
        let items: String = audit
            .mixed_content
            .iter()
            .map(|mc| {
                format!(
                    r#"<li><span class="mc-label mc-label-{kind}">{kind}</span> {url}</li>"#,
                    kind = escape(&mc.kind),
                    url = escape(&mc.url)
                )
            })
            .collect();
        format!(
            r#"<div class="mixed-content-list"><strong>Mixed Content Found:</strong><ul>{items}</ul></div>"#
        )
    };

    format!(r#"{https}<div class="headers-list">{headers}</div>{mixed}"#)
}

fn format_seo(audit: Option<&SeoAudit>) -> String {
    let audit = match audit {
        Some(audit) => audit,
        None => return no_data(),
    };

    let meta = if audit.meta_description.is_some() {
        "Found"
    } else {
        "Missing"
    };
    let mut html = format!(
        r#"<div class="seo-item"><strong>Title Length:</strong> {} chars</div>
<div class="seo-item"><strong>Meta Desc:</strong> {}</div>
<div class="seo-item"><strong>H1 Tags:</strong> {}</div>"#,
        audit.title_length, meta, audit.h1_count
    );

    if !audit.broken_links.is_empty() {
        let items: String = audit
            .broken_links
            .iter()
            .map(|l| {
                format!(
                    r#"<li><span class="status-code">{}</span> {}</li>"#,
                    l.status,
                    escape(&l.url)
                )
            })
            .collect();
        html.push_str(&format!(
            r#"<div class="seo-section"><strong>Broken Links Found:</strong><ul>{items}</ul></div>"#
        ));
    }

    let missing_alt = audit
        .image_analysis
        .iter()
        .filter(|img| img.alt_text_missing)
        .count();
    let heavy = audit
        .image_analysis
        .iter()
        .filter(|img| img.size_in_kb.is_some_and(|kb| kb > 200))
        .count();
    if missing_alt > 0 || heavy > 0 {
        let mut items = String::new();
        if missing_alt > 0 {
            items.push_str(&format!("<li>{missing_alt} images missing alt text</li>"));
        }
        if heavy > 0 {
            items.push_str(&format!("<li>{heavy} images larger than 200 KB</li>"));
        }
        html.push_str(&format!(
            r#"<div class="seo-section"><strong>Image Issues:</strong><ul>{items}</ul></div>"#
        ));
    }

    html
}

fn format_performance(audit: &PageAudit) -> String {
    match &audit.performance {
        Some(perf) => format!(
            r#"<div>TTFB: {:.2} s <span class="rating">{}</span></div>
<div>Load: {:.2} s <span class="rating">{}</span></div>
<div>DOM: {:.2} s <span class="rating">{}</span></div>"#,
            perf.ttfb,
            perf.ttfb_rating.as_str(),
            perf.load_time,
            perf.load_time_rating.as_str(),
            perf.dom_content_loaded,
            perf.dom_content_loaded_rating.as_str(),
        ),
        None => no_data(),
    }
}

fn format_network(analysis: Option<&NetworkAnalysis>) -> String {
    let analysis = match analysis {
        Some(analysis) => analysis,
        None => return no_data(),
    };

    let mut html = format!(
        r#"<div class="net-summary-item"><strong>Page Weight:</strong> {} KB</div>
<div class="net-summary-item"><strong>Requests:</strong> {}</div>
<div class="net-summary-item"><strong>Unused CSS:</strong> {}%</div>"#,
        analysis.total_page_weight_kb, analysis.total_requests, analysis.unused_css_percentage
    );

    if !analysis.top_heaviest_resources.is_empty() {
        let items: String = analysis
            .top_heaviest_resources
            .iter()
            .map(|res| {
                format!(
                    r#"<li><strong>{} KB</strong> - <span class="net-url">{}</span></li>"#,
                    res.size_in_kb,
                    escape(&res.url)
                )
            })
            .collect();
        html.push_str(&format!(
            r#"<div class="net-section"><strong>Heaviest Resources:</strong><ul>{items}</ul></div>"#
        ));
    }

    html
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn full_html(
    rows: &str,
    page_count: usize,
    total_issues: usize,
    failed_pages: usize,
    report_date: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>Vantage Audit Report</title>
<style>{styles}</style>
</head>
<body>
<header>
  <h1>Vantage Audit Report</h1>
  <div class="summary">
    <div><strong>Date:</strong> {report_date}</div>
    <div><strong>Pages Scanned:</strong> {page_count}</div>
    <div><strong>Accessibility Issues Found:</strong> {total_issues}</div>
    <div><strong>Failed Pages:</strong> {failed_pages}</div>
  </div>
</header>
<main class="table-container">
<table>
<thead>
<tr>
  <th>URL</th>
  <th>Page Title</th>
  <th>Status</th>
  <th>Viewport</th>
  <th>Console</th>
  <th>Failed Requests</th>
  <th>Screenshot</th>
  <th>Accessibility (WCAG)</th>
  <th>Security Audit</th>
  <th>Content &amp; SEO Audit</th>
  <th>Performance</th>
  <th>Actions</th>
  <th>Forms</th>
  <th>Network Analysis</th>
</tr>
</thead>
<tbody>{rows}</tbody>
</table>
</main>
</body>
</html>"#,
        styles = STYLES,
        report_date = report_date,
        page_count = page_count,
        total_issues = total_issues,
        failed_pages = failed_pages,
        rows = rows,
    )
}

const STYLES: &str = r#"
:root {
  --bg-color: #1a1a1a; --surface-color: #242424; --text-color: #f0f0f0;
  --border-color: #3d3d3d; --header-bg: #2c2c2c; --accent-color: #00bfa5;
  --critical-color: #ff5252; --serious-color: #ffab40; --moderate-color: #ffd740;
  --minor-color: #40c4ff;
}
* { box-sizing: border-box; }
body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
  background-color: var(--bg-color); color: var(--text-color); margin: 0; padding: 1.5rem;
}
header { text-align: center; margin-bottom: 2rem; }
h1 { color: var(--accent-color); margin: 0 0 1rem 0; }
.summary { display: flex; justify-content: center; gap: 2rem; background: var(--surface-color); padding: 1rem; border-radius: 8px; flex-wrap: wrap; }
.table-container { width: 100%; overflow-x: auto; border: 1px solid var(--border-color); border-radius: 8px; }
table { border-collapse: collapse; width: 100%; min-width: 1800px; }
th, td { border: 1px solid var(--border-color); padding: 0.8rem 1rem; text-align: left; vertical-align: top; }
th { background-color: var(--header-bg); position: sticky; top: 0; z-index: 2; font-size: 0.9rem; white-space: nowrap; }
tr:nth-child(even) { background-color: var(--surface-color); }
tr.crawl-error { background-color: rgba(255, 82, 82, 0.12); }
a { color: var(--accent-color); text-decoration: none; word-break: break-all; }
a:hover { text-decoration: underline; }
.screenshot-thumb { width: 150px; border-radius: 6px; }
.cell-scrollable { max-height: 150px; overflow-y: auto; font-size: 0.85rem; max-width: 300px; overflow-wrap: break-word; }
.wrap { word-wrap: break-word; white-space: normal; }
.no-data { color: #888; }
.accessibility-ok { color: #4caf50; font-weight: bold; }
.issue { border-left: 4px solid; padding: 0.5rem 0.8rem; margin-bottom: 0.5rem; background: rgba(0,0,0,0.2); border-radius: 4px; }
.issue p { margin: 0; }
.issue .impact-label { font-weight: bold; display: block; margin-bottom: 0.25rem; font-size: 0.8em; }
.issue-critical { border-color: var(--critical-color); }
.issue-serious { border-color: var(--serious-color); }
.issue-moderate { border-color: var(--moderate-color); }
.issue-minor { border-color: var(--minor-color); }
.security-cell, .seo-cell, .net-cell { font-size: 0.85rem; white-space: normal; }
.https-secure { color: var(--accent-color); font-weight: bold; }
.https-insecure { color: var(--critical-color); font-weight: bold; }
.headers-list { display: flex; flex-direction: column; gap: 0.3rem; }
.header-item.non-compliant { color: var(--serious-color); }
.mixed-content-list, .seo-section, .net-section { margin-top: 0.8rem; padding-top: 0.5rem; border-top: 1px solid var(--border-color); }
.mc-label { display: inline-block; padding: 2px 5px; border-radius: 4px; font-size: 0.75em; font-weight: bold; color: #111; margin-right: 0.5rem; }
.mc-label-active { background-color: var(--critical-color); }
.mc-label-passive { background-color: var(--moderate-color); }
.status-code { font-weight: bold; color: var(--critical-color); margin-right: 0.5em; }
.rating { margin-left: 0.5em; font-size: 0.9em; font-weight: bold; }
.net-url { word-break: break-all; opacity: 0.8; font-size: 0.9em; }
"#;
