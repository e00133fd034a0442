//! In-memory page session over a static site graph, for crawl tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use vantage_scanner::error::SessionError;
use vantage_scanner::session::{
    AccessibilityAuditor, AccessibilityFinding, CaptureLog, ControlSurvey, CssUsage, ImageRef,
    Navigation, PageSession, PerfTiming, ResponseRecord, SeoSnapshot,
};

#[derive(Clone, Default)]
pub struct FakePage {
    pub title: String,
    pub status: u16,
    pub links: Vec<String>,
    pub responses: Vec<ResponseRecord>,
    pub survey: ControlSurvey,
    pub fail_navigation: bool,
    pub fail_timing: bool,
    pub navigation_delay: Option<Duration>,
}

impl FakePage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            status: 200,
            ..Self::default()
        }
    }

    pub fn with_links(mut self, links: &[&str]) -> Self {
        self.links = links.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn with_failing_timing(mut self) -> Self {
        self.fail_timing = true;
        self
    }

    pub fn with_survey(mut self, survey: ControlSurvey) -> Self {
        self.survey = survey;
        self
    }

    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = Some(delay);
        self
    }
}

/// Serves a fixed map of URL to page. Everything else a real browser
/// would do is a cheap success.
pub struct FakeSession {
    pages: HashMap<String, FakePage>,
    current: Mutex<Option<String>>,
    visits: Mutex<Vec<String>>,
    clicks: Mutex<Vec<usize>>,
    fills: Mutex<Vec<(usize, String)>>,
}

impl FakeSession {
    pub fn new(pages: &[(&str, FakePage)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, page)| (url.to_string(), page.clone()))
                .collect(),
            current: Mutex::new(None),
            visits: Mutex::new(Vec::new()),
            clicks: Mutex::new(Vec::new()),
            fills: Mutex::new(Vec::new()),
        }
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<usize> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn fills(&self) -> Vec<(usize, String)> {
        self.fills.lock().unwrap().clone()
    }

    fn current_page(&self) -> Result<FakePage, SessionError> {
        let current = self.current.lock().unwrap();
        let url = current
            .as_deref()
            .ok_or_else(|| SessionError::Command("no page loaded".to_string()))?;
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| SessionError::NoResponse(url.to_string()))
    }
}

#[async_trait]
impl PageSession for FakeSession {
    async fn navigate(&self, url: &str) -> Result<Navigation, SessionError> {
        self.visits.lock().unwrap().push(url.to_string());
        let page = self
            .pages
            .get(url)
            .ok_or_else(|| SessionError::NoResponse(url.to_string()))?;
        if let Some(delay) = page.navigation_delay {
            tokio::time::sleep(delay).await;
        }
        if page.fail_navigation {
            return Err(SessionError::NoResponse(url.to_string()));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(Navigation {
            status: page.status,
            title: page.title.clone(),
            final_url: url.to_string(),
            headers: HashMap::new(),
        })
    }

    async fn links(&self) -> Result<Vec<String>, SessionError> {
        Ok(self.current_page()?.links)
    }

    async fn begin_capture(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn end_capture(&self) -> Result<CaptureLog, SessionError> {
        let responses = self
            .current_page()
            .map(|page| page.responses)
            .unwrap_or_default();
        Ok(CaptureLog {
            console: Vec::new(),
            responses,
        })
    }

    async fn performance_timing(&self) -> Result<PerfTiming, SessionError> {
        if self.current_page()?.fail_timing {
            return Err(SessionError::Evaluation("timing unavailable".to_string()));
        }
        Ok(PerfTiming {
            load_time: 0.8,
            dom_content_loaded: 0.4,
            ttfb: 0.1,
        })
    }

    async fn screenshot(&self, _path: &Path) -> Result<(), SessionError> {
        Ok(())
    }

    async fn css_usage(&self) -> Result<CssUsage, SessionError> {
        Ok(CssUsage::default())
    }

    async fn seo_snapshot(&self) -> Result<SeoSnapshot, SessionError> {
        let page = self.current_page()?;
        Ok(SeoSnapshot {
            title_length: page.title.len(),
            meta_description: None,
            h1_count: 1,
        })
    }

    async fn image_inventory(&self) -> Result<Vec<ImageRef>, SessionError> {
        Ok(Vec::new())
    }

    async fn survey_controls(&self) -> Result<ControlSurvey, SessionError> {
        Ok(self.current_page()?.survey)
    }

    async fn fill_field(&self, index: usize, value: &str) -> Result<(), SessionError> {
        self.fills.lock().unwrap().push((index, value.to_string()));
        Ok(())
    }

    async fn set_checked(&self, index: usize) -> Result<(), SessionError> {
        self.clicks.lock().unwrap().push(index);
        Ok(())
    }

    async fn click_button(&self, index: usize) -> Result<(), SessionError> {
        self.clicks.lock().unwrap().push(index);
        Ok(())
    }

    async fn scroll_by_viewport(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn settle(&self, _wait: Duration) -> Result<(), SessionError> {
        Ok(())
    }
}

pub struct FakeAuditor {
    pub findings: Vec<AccessibilityFinding>,
}

impl FakeAuditor {
    pub fn clean() -> Self {
        Self {
            findings: Vec::new(),
        }
    }
}

#[async_trait]
impl AccessibilityAuditor for FakeAuditor {
    async fn scan(&self) -> Result<Vec<AccessibilityFinding>, SessionError> {
        Ok(self.findings.clone())
    }
}
