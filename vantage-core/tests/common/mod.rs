//! Result fixtures shared by the report and gate tests.

use vantage_scanner::result::{PageAudit, PageFailure, PageResult};
use vantage_scanner::seo::{BrokenLink, SeoAudit};
use vantage_scanner::session::AccessibilityFinding;

pub fn audited(url: &str) -> PageAudit {
    PageAudit {
        url: url.to_string(),
        title: "Example Page".to_string(),
        http_status: 200,
        viewport: "desktop".to_string(),
        console_messages: Vec::new(),
        failed_requests: Vec::new(),
        screenshot_path: None,
        performance: None,
        accessibility: Some(Vec::new()),
        actions: Vec::new(),
        forms_detected: 0,
        security: None,
        seo: None,
        network: None,
    }
}

pub fn failed(url: &str) -> PageResult {
    PageResult::Failed(PageFailure {
        url: url.to_string(),
        viewport: "desktop".to_string(),
        reason: "navigation timed out".to_string(),
    })
}

pub fn finding(impact: &str) -> AccessibilityFinding {
    AccessibilityFinding {
        id: "image-alt".to_string(),
        impact: impact.to_string(),
        description: "Images must have alternate text".to_string(),
        help: "Add an alt attribute".to_string(),
        help_url: "https://dequeuniversity.com/rules/axe/image-alt".to_string(),
        nodes: 1,
    }
}

pub fn seo_with_broken_links(count: usize) -> SeoAudit {
    SeoAudit {
        title_length: 30,
        meta_description: Some("A page".to_string()),
        h1_count: 1,
        broken_links: (0..count)
            .map(|i| BrokenLink {
                url: format!("https://example.com/missing-{i}"),
                status: 404,
            })
            .collect(),
        image_analysis: Vec::new(),
    }
}
