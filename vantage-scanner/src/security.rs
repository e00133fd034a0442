//! Best-effort security checks for a single page: HTTPS usage, response
//! header hygiene, and mixed content. These are heuristics, not a
//! compliance scanner.

use crate::session::{Navigation, ResponseRecord};
use serde::{Deserialize, Serialize};

/// Headers audited on every main-document response.
const HEADERS_TO_AUDIT: [&str; 5] = [
    "content-security-policy",
    "strict-transport-security",
    "x-frame-options",
    "x-content-type-options",
    "referrer-policy",
];

/// Resource types that execute or can mutate the page. Anything else
/// loaded over http:// on an https:// page is passive mixed content.
const ACTIVE_CONTENT_TYPES: [&str; 5] = ["script", "stylesheet", "document", "fetch", "xhr"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderAudit {
    pub name: String,
    pub value: Option<String>,
    pub present: bool,
    pub description: String,
    pub compliant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixedContent {
    pub url: String,
    /// "active" or "passive".
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAudit {
    pub is_https: bool,
    pub headers: Vec<HeaderAudit>,
    pub mixed_content: Vec<MixedContent>,
}

/// Audit the main-document response. Mixed content is attached later,
/// once the page's full response log is available.
pub fn audit(nav: &Navigation) -> SecurityAudit {
    let is_https = nav.final_url.starts_with("https://");
    let headers = HEADERS_TO_AUDIT
        .iter()
        .map(|name| audit_header(name, nav.headers.get(*name).map(String::as_str)))
        .collect();

    SecurityAudit {
        is_https,
        headers,
        mixed_content: Vec::new(),
    }
}

fn audit_header(name: &str, value: Option<&str>) -> HeaderAudit {
    let present = value.is_some();
    let (description, compliant) = match name {
        "content-security-policy" => (
            "Helps prevent XSS attacks by defining allowed content sources.",
            present,
        ),
        "strict-transport-security" => (
            "Enforces secure (HTTPS) connections to the server.",
            present,
        ),
        "x-frame-options" => (
            "Protects against clickjacking attacks.",
            matches!(value, Some("DENY") | Some("SAMEORIGIN")),
        ),
        "x-content-type-options" => (
            "Prevents browsers from MIME-sniffing a response away from the declared content-type.",
            matches!(value, Some("nosniff")),
        ),
        "referrer-policy" => (
            "Controls how much referrer information is sent with requests.",
            matches!(
                value,
                Some("no-referrer") | Some("strict-origin") | Some("strict-origin-when-cross-origin")
            ),
        ),
        _ => ("", false),
    };

    HeaderAudit {
        name: name.to_string(),
        value: value.map(str::to_string),
        present,
        description: description.to_string(),
        compliant,
    }
}

/// Classify insecure subresources observed on an HTTPS page. Returns
/// nothing for plain-HTTP pages, where everything is already insecure.
pub fn mixed_content(is_https: bool, responses: &[ResponseRecord]) -> Vec<MixedContent> {
    if !is_https {
        return Vec::new();
    }

    responses
        .iter()
        .filter(|r| r.url.starts_with("http://"))
        .map(|r| MixedContent {
            url: r.url.clone(),
            kind: if ACTIVE_CONTENT_TYPES.contains(&r.resource_type.as_str()) {
                "active".to_string()
            } else {
                "passive".to_string()
            },
        })
        .collect()
}
