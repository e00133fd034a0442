//! Depth-first site exploration.
//!
//! The explorer drives one page session over one viewport. Discovery
//! order follows the DOM: a page's first links are explored first,
//! then their children, before later siblings. URLs are deduplicated
//! by exact string match; `/a` and `/a/` are distinct pages on purpose,
//! since servers are free to treat them differently.

use crate::error::AuditError;
use crate::pipeline::AuditPipeline;
use crate::result::{PageFailure, PageResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// File extensions that point at downloads, not pages.
const EXCLUDED_EXTENSIONS: [&str; 12] = [
    "zip", "pdf", "png", "jpg", "jpeg", "gif", "svg", "exe", "mp4", "mp3", "avi", "mov",
];

#[derive(Debug, Clone, Copy)]
pub struct CrawlConfig {
    /// How many link hops from the seed are followed. Zero audits the
    /// seed page only.
    pub max_depth: usize,
    /// Per-page cap on followed links, applied after filtering.
    pub max_links_per_page: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            max_links_per_page: 1,
        }
    }
}

pub struct Explorer {
    pipeline: AuditPipeline,
    config: CrawlConfig,
    progress_callback: Option<ProgressCallback>,
}

impl Explorer {
    pub fn new(pipeline: AuditPipeline) -> Self {
        Self {
            pipeline,
            config: CrawlConfig::default(),
            progress_callback: None,
        }
    }

    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn with_max_links_per_page(mut self, links: usize) -> Self {
        self.config.max_links_per_page = links;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl from `seed` and return one result per visited URL, in
    /// visit order. A page whose visit fails yields a degraded result;
    /// the crawl itself never aborts. Link discovery runs after every
    /// visit, failed or not: a failed visit leaves the session on the
    /// document it last held, and links are read from there.
    pub async fn explore(&self, seed: &str) -> Vec<PageResult> {
        info!(
            "starting crawl of {} (depth {}, {} links/page, viewport {})",
            seed,
            self.config.max_depth,
            self.config.max_links_per_page,
            self.pipeline.viewport()
        );

        let mut visited: HashSet<String> = HashSet::new();
        let mut results: Vec<PageResult> = Vec::new();
        let mut stack: Vec<(String, usize)> = vec![(seed.to_string(), 0)];
        let mut seq = 0usize;

        while let Some((url, depth)) = stack.pop() {
            if visited.contains(&url) || depth > self.config.max_depth {
                continue;
            }
            visited.insert(url.clone());

            if let Some(callback) = &self.progress_callback {
                callback(results.len(), url.clone());
            }
            info!("auditing {} (depth {})", url, depth);

            let links = match self.pipeline.audit_page(&url, seq).await {
                Ok((audit, links)) => {
                    results.push(PageResult::Audited(audit));
                    links
                }
                Err(e) => {
                    warn!("visit to {} failed: {}", url, e);
                    results.push(PageResult::Failed(page_failure(
                        &url,
                        self.pipeline.viewport(),
                        &e,
                    )));
                    self.pipeline.current_links().await
                }
            };

            let mut next: Vec<String> = links
                .into_iter()
                .filter(|link| !visited.contains(link) && is_crawlable(link))
                .collect();
            next.truncate(self.config.max_links_per_page);

            debug!("queueing {} link(s) from {}", next.len(), url);
            // Reverse before pushing so the stack pops the page's
            // links in DOM order.
            for link in next.into_iter().rev() {
                stack.push((link, depth + 1));
            }

            seq += 1;
        }

        info!(
            "crawl of {} finished: {} page(s), {} failed",
            seed,
            results.len(),
            results.iter().filter(|r| r.is_failed()).count()
        );
        results
    }
}

fn page_failure(url: &str, viewport: &str, error: &AuditError) -> PageFailure {
    PageFailure {
        url: url.to_string(),
        viewport: viewport.to_string(),
        reason: error.to_string(),
    }
}

/// Absolute http(s) link that is not a known binary download.
fn is_crawlable(link: &str) -> bool {
    if !link.starts_with("http") {
        return false;
    }
    let lowered = link.to_lowercase();
    !EXCLUDED_EXTENSIONS
        .iter()
        .any(|ext| lowered.ends_with(&format!(".{ext}")))
}
