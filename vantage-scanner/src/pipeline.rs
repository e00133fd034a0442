//! Single-page audit pipeline.
//!
//! One visit: start capture, navigate, fan out the probes, settle,
//! close capture, fold the response log into the network and security
//! sections. A probe that errors leaves its section empty; only
//! navigation failure or the page deadline abort the visit.

use crate::error::{AuditError, SessionError};
use crate::interact::{InteractionConfig, InteractionEngine};
use crate::network;
use crate::performance;
use crate::result::PageAudit;
use crate::security;
use crate::seo;
use crate::session::{AccessibilityAuditor, PageSession};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

pub struct AuditPipeline {
    session: Arc<dyn PageSession>,
    auditor: Arc<dyn AccessibilityAuditor>,
    http: reqwest::Client,
    interaction: InteractionEngine,
    viewport: String,
    screenshot_dir: PathBuf,
    deadline: Duration,
}

impl AuditPipeline {
    pub fn new(session: Arc<dyn PageSession>, auditor: Arc<dyn AccessibilityAuditor>) -> Self {
        Self {
            session,
            auditor,
            http: reqwest::Client::new(),
            interaction: InteractionEngine::default(),
            viewport: "desktop".to_string(),
            screenshot_dir: PathBuf::from("reports/screenshots"),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_viewport(mut self, name: impl Into<String>) -> Self {
        self.viewport = name.into();
        self
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_interaction(mut self, config: InteractionConfig) -> Self {
        self.interaction = InteractionEngine::new(config);
        self
    }

    pub fn viewport(&self) -> &str {
        &self.viewport
    }

    /// Links readable from the session right now. After a failed visit
    /// the session still holds whatever document it last had, so the
    /// crawl can keep discovering from there.
    pub async fn current_links(&self) -> Vec<String> {
        self.session.links().await.unwrap_or_default()
    }

    /// Audit one page. Returns the audit plus the outbound links found
    /// on it, so the caller can keep crawling. `seq` disambiguates
    /// screenshot filenames within one crawl.
    ///
    /// Capture is always closed before returning, including on the
    /// deadline and error paths, so a failed visit cannot leak its
    /// listeners into the next one.
    pub async fn audit_page(
        &self,
        url: &str,
        seq: usize,
    ) -> Result<(PageAudit, Vec<String>), AuditError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AuditError::UnsupportedScheme(url.to_string()));
        }

        self.session.begin_capture().await?;

        match timeout(self.deadline, self.visit(url, seq)).await {
            Ok(Ok(done)) => Ok(done),
            Ok(Err(e)) => {
                let _ = self.session.end_capture().await;
                Err(e)
            }
            Err(_) => {
                let _ = self.session.end_capture().await;
                Err(AuditError::DeadlineExceeded {
                    url: url.to_string(),
                    seconds: self.deadline.as_secs(),
                })
            }
        }
    }

    async fn visit(&self, url: &str, seq: usize) -> Result<(PageAudit, Vec<String>), AuditError> {
        let nav = self
            .session
            .navigate(url)
            .await
            .map_err(|source| AuditError::Navigation {
                url: url.to_string(),
                source,
            })?;

        let mut security = Some(security::audit(&nav));

        let screenshot_path = self
            .screenshot_dir
            .join(format!("{:03}_{}.png", seq, self.viewport));

        // The session serializes dispatch, so these can run together.
        let (timing, findings, shot, seo_audit, interaction) = tokio::join!(
            self.session.performance_timing(),
            self.auditor.scan(),
            self.session.screenshot(&screenshot_path),
            seo::audit(self.session.as_ref(), &self.http),
            self.interaction.run(self.session.as_ref()),
        );

        let performance = probe("performance", url, timing).map(performance::report);
        let accessibility = probe("accessibility", url, findings);
        let screenshot_path = probe("screenshot", url, shot)
            .map(|()| screenshot_path.to_string_lossy().into_owned());
        let seo_audit = probe("seo", url, seo_audit);

        let log = self.session.end_capture().await?;

        let css = probe("css-usage", url, self.session.css_usage().await).unwrap_or_default();
        let network_analysis = network::analyze(&log.responses, css);
        let failed_requests = network::failed_requests(&log.responses);

        if let Some(sec) = security.as_mut() {
            sec.mixed_content = security::mixed_content(sec.is_https, &log.responses);
        }

        let links = probe("links", url, self.session.links().await).unwrap_or_default();

        let audit = PageAudit {
            url: url.to_string(),
            title: nav.title,
            http_status: nav.status,
            viewport: self.viewport.clone(),
            console_messages: log.console,
            failed_requests,
            screenshot_path,
            performance,
            accessibility,
            actions: interaction.actions,
            forms_detected: interaction.forms_detected,
            security,
            seo: seo_audit,
            network: Some(network_analysis),
        };

        Ok((audit, links))
    }
}

/// Degrade a failed probe to a missing section.
fn probe<T>(name: &str, url: &str, result: Result<T, SessionError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} probe failed for {}: {}", name, url, e);
            None
        }
    }
}
