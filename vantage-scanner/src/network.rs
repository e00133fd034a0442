//! Network weight accounting for a single page visit.
//!
//! The session records every response passively from the moment capture
//! begins (before navigation, so the main document itself is counted).
//! This module reduces that log to an aggregate once the visit's
//! interaction phase has settled.

use crate::session::{CssUsage, ResponseRecord};
use serde::{Deserialize, Serialize};

/// How many of the heaviest resources to surface in the report.
const TOP_RESOURCES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub url: String,
    pub resource_type: String,
    pub size_in_kb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    pub total_page_weight_kb: u64,
    pub total_requests: usize,
    pub top_heaviest_resources: Vec<ResourceInfo>,
    pub unused_css_percentage: u8,
}

/// A response only counts when it declared a positive content length.
fn resource_of(record: &ResponseRecord) -> Option<ResourceInfo> {
    let bytes = record.content_length.filter(|len| *len > 0)?;
    Some(ResourceInfo {
        url: record.url.clone(),
        resource_type: record.resource_type.clone(),
        size_in_kb: ((bytes as f64) / 1024.0).round() as u64,
    })
}

/// Collapse a visit's response log plus one CSS usage sample into the
/// page's network analysis. Zero observed resources or zero CSS bytes
/// both yield zeros, never a division error.
pub fn analyze(responses: &[ResponseRecord], css: CssUsage) -> NetworkAnalysis {
    let resources: Vec<ResourceInfo> = responses.iter().filter_map(resource_of).collect();

    let total_page_weight_kb = resources.iter().map(|r| r.size_in_kb).sum();

    // sort_by is stable, so equal sizes keep first-observed order.
    let mut heaviest = resources.clone();
    heaviest.sort_by(|a, b| b.size_in_kb.cmp(&a.size_in_kb));
    heaviest.truncate(TOP_RESOURCES);

    let unused_css_percentage = if css.total_bytes == 0 {
        0
    } else {
        let unused = css.total_bytes.saturating_sub(css.used_bytes) as f64;
        ((unused / css.total_bytes as f64) * 100.0).round() as u8
    };

    NetworkAnalysis {
        total_page_weight_kb,
        total_requests: resources.len(),
        top_heaviest_resources: heaviest,
        unused_css_percentage,
    }
}

/// Responses whose status was anything other than 200.
pub fn failed_requests(responses: &[ResponseRecord]) -> Vec<FailedRequest> {
    responses
        .iter()
        .filter(|r| r.status != 200)
        .map(|r| FailedRequest {
            url: r.url.clone(),
            status: r.status,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRequest {
    pub url: String,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, resource_type: &str, len: Option<u64>) -> ResponseRecord {
        ResponseRecord {
            url: url.to_string(),
            status: 200,
            resource_type: resource_type.to_string(),
            content_length: len,
        }
    }

    #[test]
    fn empty_visit_yields_all_zeros() {
        let analysis = analyze(&[], CssUsage::default());
        assert_eq!(analysis.total_page_weight_kb, 0);
        assert_eq!(analysis.total_requests, 0);
        assert!(analysis.top_heaviest_resources.is_empty());
        assert_eq!(analysis.unused_css_percentage, 0);
    }

    #[test]
    fn responses_without_content_length_are_not_counted() {
        let responses = vec![
            record("https://a/doc", "document", Some(2048)),
            record("https://a/stream", "fetch", None),
            record("https://a/empty", "script", Some(0)),
        ];
        let analysis = analyze(&responses, CssUsage::default());
        assert_eq!(analysis.total_requests, 1);
        assert_eq!(analysis.total_page_weight_kb, 2);
    }

    #[test]
    fn sizes_round_to_whole_kilobytes() {
        let responses = vec![record("https://a/x", "script", Some(1536))];
        let analysis = analyze(&responses, CssUsage::default());
        assert_eq!(analysis.total_page_weight_kb, 2);
    }

    #[test]
    fn heaviest_five_descending_with_stable_ties() {
        let responses: Vec<ResponseRecord> = [
            ("https://a/1", 1024),
            ("https://a/2", 4096),
            ("https://a/3", 4096),
            ("https://a/4", 8192),
            ("https://a/5", 512),
            ("https://a/6", 2048),
            ("https://a/7", 512),
        ]
        .iter()
        .map(|(url, len)| record(url, "script", Some(*len)))
        .collect();

        let analysis = analyze(&responses, CssUsage::default());
        let urls: Vec<&str> = analysis
            .top_heaviest_resources
            .iter()
            .map(|r| r.url.as_str())
            .collect();
        // 4096-byte tie keeps observation order: /2 before /3.
        assert_eq!(
            urls,
            vec!["https://a/4", "https://a/2", "https://a/3", "https://a/6", "https://a/1"]
        );
    }

    #[test]
    fn css_percentage_rounds_and_tolerates_zero() {
        let usage = CssUsage {
            total_bytes: 3000,
            used_bytes: 1000,
        };
        assert_eq!(analyze(&[], usage).unused_css_percentage, 67);

        let none = CssUsage {
            total_bytes: 0,
            used_bytes: 0,
        };
        assert_eq!(analyze(&[], none).unused_css_percentage, 0);
    }

    #[test]
    fn failed_requests_exclude_exact_200_only() {
        let mut ok = record("https://a/fine", "document", None);
        ok.status = 200;
        let mut redirect = record("https://a/moved", "document", None);
        redirect.status = 301;
        let mut missing = record("https://a/gone", "image", None);
        missing.status = 404;

        let failed = failed_requests(&[ok, redirect, missing]);
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].status, 301);
        assert_eq!(failed[1].status, 404);
    }
}
