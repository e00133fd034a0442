//! Quality gate for CI runs.
//!
//! The crawl itself never fails on bad pages; the gate is where a run
//! turns into a pass/fail signal. It counts critical accessibility
//! violations and broken links across every result and compares them
//! against the configured thresholds.

use serde::{Deserialize, Serialize};
use vantage_scanner::result::PageResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateThresholds {
    pub max_critical_accessibility: usize,
    pub max_broken_links: usize,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            max_critical_accessibility: 0,
            max_broken_links: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateVerdict {
    pub passed: bool,
    pub critical_accessibility: usize,
    pub broken_links: usize,
    pub failed_pages: usize,
    pub breaches: Vec<String>,
}

pub fn evaluate(results: &[PageResult], thresholds: &GateThresholds) -> GateVerdict {
    let mut critical_accessibility = 0usize;
    let mut broken_links = 0usize;
    let mut failed_pages = 0usize;

    for result in results {
        match result {
            PageResult::Audited(audit) => {
                if let Some(findings) = &audit.accessibility {
                    critical_accessibility += findings
                        .iter()
                        .filter(|f| f.impact.eq_ignore_ascii_case("critical"))
                        .count();
                }
                if let Some(seo) = &audit.seo {
                    broken_links += seo.broken_links.len();
                }
            }
            PageResult::Failed(_) => failed_pages += 1,
        }
    }

    let mut breaches = Vec::new();
    if critical_accessibility > thresholds.max_critical_accessibility {
        breaches.push(format!(
            "critical accessibility violations: {} (allowed {})",
            critical_accessibility, thresholds.max_critical_accessibility
        ));
    }
    if broken_links > thresholds.max_broken_links {
        breaches.push(format!(
            "broken links: {} (allowed {})",
            broken_links, thresholds.max_broken_links
        ));
    }

    GateVerdict {
        passed: breaches.is_empty(),
        critical_accessibility,
        broken_links,
        failed_pages,
        breaches,
    }
}
