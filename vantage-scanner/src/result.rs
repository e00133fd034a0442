//! Per-page crawl results.
//!
//! A visit either produced a full audit or failed outright. Both
//! variants carry enough identity (url, viewport) for reporting, so a
//! failed page still appears in the output instead of silently
//! vanishing from the crawl.

use crate::interact::ActionRecord;
use crate::network::{FailedRequest, NetworkAnalysis};
use crate::performance::PerformanceReport;
use crate::security::SecurityAudit;
use crate::seo::SeoAudit;
use crate::session::{AccessibilityFinding, ConsoleMessage};
use serde::{Deserialize, Serialize};

/// Marker title used for pages whose visit failed.
pub const CRAWL_ERROR_TITLE: &str = "CRAWL_ERROR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageResult {
    Audited(PageAudit),
    Failed(PageFailure),
}

impl PageResult {
    pub fn url(&self) -> &str {
        match self {
            PageResult::Audited(audit) => &audit.url,
            PageResult::Failed(failure) => &failure.url,
        }
    }

    pub fn viewport(&self) -> &str {
        match self {
            PageResult::Audited(audit) => &audit.viewport,
            PageResult::Failed(failure) => &failure.viewport,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageResult::Failed(_))
    }

    /// Page title as shown in reports.
    pub fn title(&self) -> &str {
        match self {
            PageResult::Audited(audit) => &audit.title,
            PageResult::Failed(_) => CRAWL_ERROR_TITLE,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            PageResult::Audited(audit) => audit.http_status,
            PageResult::Failed(_) => 0,
        }
    }
}

/// Everything the pipeline learned about one page under one viewport.
///
/// Probe sections are optional on purpose: a probe that errored leaves
/// its section as `None` while the rest of the audit stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAudit {
    pub url: String,
    pub title: String,
    pub http_status: u16,
    pub viewport: String,
    pub console_messages: Vec<ConsoleMessage>,
    pub failed_requests: Vec<FailedRequest>,
    pub screenshot_path: Option<String>,
    pub performance: Option<PerformanceReport>,
    pub accessibility: Option<Vec<AccessibilityFinding>>,
    pub actions: Vec<ActionRecord>,
    pub forms_detected: usize,
    pub security: Option<SecurityAudit>,
    pub seo: Option<SeoAudit>,
    pub network: Option<NetworkAnalysis>,
}

/// A visit that could not be completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFailure {
    pub url: String,
    pub viewport: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_pages_report_error_title_and_zero_status() {
        let result = PageResult::Failed(PageFailure {
            url: "https://example.com/broken".to_string(),
            viewport: "desktop".to_string(),
            reason: "navigation timed out".to_string(),
        });
        assert_eq!(result.title(), CRAWL_ERROR_TITLE);
        assert_eq!(result.http_status(), 0);
        assert!(result.is_failed());
        assert_eq!(result.url(), "https://example.com/broken");
    }
}
