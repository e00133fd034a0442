//! SEO probe: on-page signals plus outbound link and image checks.
//!
//! Link and image probes go over plain HTTP (HEAD requests), not the
//! browser, so a slow third-party host cannot stall the page session.
//! Any single request failure is logged and skipped.

use crate::error::SessionError;
use crate::session::PageSession;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Per-request budget for HEAD probes.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// HEAD probes in flight at once.
const PROBE_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokenLink {
    pub url: String,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub src: String,
    pub alt_text_missing: bool,
    /// None when the size could not be determined.
    pub size_in_kb: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoAudit {
    pub title_length: usize,
    pub meta_description: Option<String>,
    pub h1_count: usize,
    pub broken_links: Vec<BrokenLink>,
    pub image_analysis: Vec<ImageAnalysis>,
}

/// Run the full SEO probe against the current page.
pub async fn audit(
    session: &dyn PageSession,
    http: &reqwest::Client,
) -> Result<SeoAudit, SessionError> {
    let snapshot = session.seo_snapshot().await?;
    let links = session.links().await?;
    let images = session.image_inventory().await?;

    let broken_links = check_links(http, &links).await;

    let image_analysis = stream::iter(images)
        .map(|image| async move {
            let alt_text_missing = image
                .alt
                .as_deref()
                .map(str::trim)
                .is_none_or(str::is_empty);
            let size_in_kb = if image.src.starts_with("http") {
                probe_size_kb(http, &image.src).await
            } else {
                None
            };
            ImageAnalysis {
                src: image.src,
                alt_text_missing,
                size_in_kb,
            }
        })
        .buffered(PROBE_CONCURRENCY)
        .collect()
        .await;

    Ok(SeoAudit {
        title_length: snapshot.title_length,
        meta_description: snapshot.meta_description,
        h1_count: snapshot.h1_count,
        broken_links,
        image_analysis,
    })
}

/// HEAD every unique http(s) link once; 4xx and 5xx count as broken.
/// Unreachable hosts are skipped, not reported as broken.
pub async fn check_links(http: &reqwest::Client, links: &[String]) -> Vec<BrokenLink> {
    let mut seen = HashSet::new();
    let unique: Vec<&String> = links
        .iter()
        .filter(|l| l.starts_with("http") && seen.insert(l.as_str()))
        .collect();

    stream::iter(unique)
        .map(|url| async move {
            match http.head(url).timeout(PROBE_TIMEOUT).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    (status >= 400).then(|| BrokenLink {
                        url: url.clone(),
                        status,
                    })
                }
                Err(e) => {
                    debug!("link probe for {} failed: {}", url, e);
                    None
                }
            }
        })
        .buffered(PROBE_CONCURRENCY)
        .filter_map(|broken| async move { broken })
        .collect()
        .await
}

async fn probe_size_kb(http: &reqwest::Client, url: &str) -> Option<u64> {
    match http.head(url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => response
            .content_length()
            .filter(|len| *len > 0)
            .map(|bytes| ((bytes as f64) / 1024.0).round() as u64),
        Err(e) => {
            debug!("image probe for {} failed: {}", url, e);
            None
        }
    }
}
