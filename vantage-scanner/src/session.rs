//! Capability contract between the crawl core and the browser layer.
//!
//! The scanner drives one live, scriptable page through this trait and
//! never depends on a specific automation product. Implementations are
//! expected to multiplex commands over a single protocol connection and
//! serialize dispatch internally; the audit pipeline issues up to six
//! concurrent calls against one session and relies on that guarantee.

use crate::error::SessionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Outcome of a main-document navigation.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub status: u16,
    pub title: String,
    pub final_url: String,
    /// Response headers of the main document, lowercase names.
    pub headers: HashMap<String, String>,
}

/// One console message emitted during a page visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: String,
    pub text: String,
}

/// One network response observed during a page visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub url: String,
    pub status: u16,
    pub resource_type: String,
    pub content_length: Option<u64>,
}

/// Everything recorded between `begin_capture` and `end_capture`.
#[derive(Debug, Clone, Default)]
pub struct CaptureLog {
    pub console: Vec<ConsoleMessage>,
    pub responses: Vec<ResponseRecord>,
}

/// Navigation timing sampled from the page, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerfTiming {
    pub load_time: f64,
    pub dom_content_loaded: f64,
    pub ttfb: f64,
}

/// One CSS rule-usage sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

/// Basic on-page SEO signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoSnapshot {
    pub title_length: usize,
    pub meta_description: Option<String>,
    pub h1_count: usize,
}

/// An image element and its alt text, in DOM order.
#[derive(Debug, Clone)]
pub struct ImageRef {
    pub src: String,
    pub alt: Option<String>,
}

/// Semantic kind of a fillable control, derived from its `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Phone,
    Number,
    TextArea,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Phone => "tel",
            FieldKind::Number => "number",
            FieldKind::TextArea => "textarea",
        }
    }
}

/// A fillable text-like control discovered by `survey_controls`.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Position in the session's stable field selector order.
    pub index: usize,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    pub editable: bool,
}

/// A checkbox or radio control.
#[derive(Debug, Clone)]
pub struct ToggleInfo {
    pub index: usize,
    /// "checkbox" or "radio".
    pub kind: String,
    pub checked: bool,
    pub enabled: bool,
}

/// A button-like control and its accessible label.
#[derive(Debug, Clone)]
pub struct ButtonInfo {
    pub index: usize,
    pub label: String,
    pub visible: bool,
    pub enabled: bool,
}

/// Snapshot of the interactable controls currently on the page.
///
/// Indices are positions within the snapshot's selector order; a page
/// that mutates between the survey and a follow-up action may shift
/// them. The interaction engine tolerates that: every action is
/// best-effort and failures are recorded, not raised.
#[derive(Debug, Clone, Default)]
pub struct ControlSurvey {
    pub forms: usize,
    pub fields: Vec<FieldInfo>,
    pub toggles: Vec<ToggleInfo>,
    pub buttons: Vec<ButtonInfo>,
}

/// A live browser page the audit core drives.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Navigate and wait until the DOM is parsed (not full load).
    /// Returns `SessionError::NoResponse` when no main-document
    /// response arrives.
    async fn navigate(&self, url: &str) -> Result<Navigation, SessionError>;

    /// Absolute `href` values of all anchors, in DOM order.
    async fn links(&self) -> Result<Vec<String>, SessionError>;

    /// Reset and start recording console messages and responses.
    /// Must be called before `navigate` so the very first request is
    /// captured.
    async fn begin_capture(&self) -> Result<(), SessionError>;

    /// Stop recording, detach listeners, and hand over everything seen
    /// since `begin_capture`.
    async fn end_capture(&self) -> Result<CaptureLog, SessionError>;

    async fn performance_timing(&self) -> Result<PerfTiming, SessionError>;

    /// Capture a full-page screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<(), SessionError>;

    /// Sample CSS rule usage once. A page with no stylesheets reports
    /// zeroed totals.
    async fn css_usage(&self) -> Result<CssUsage, SessionError>;

    async fn seo_snapshot(&self) -> Result<SeoSnapshot, SessionError>;

    async fn image_inventory(&self) -> Result<Vec<ImageRef>, SessionError>;

    /// Snapshot forms, fillable fields, toggles and buttons.
    async fn survey_controls(&self) -> Result<ControlSurvey, SessionError>;

    async fn fill_field(&self, index: usize, value: &str) -> Result<(), SessionError>;

    async fn set_checked(&self, index: usize) -> Result<(), SessionError>;

    async fn click_button(&self, index: usize) -> Result<(), SessionError>;

    async fn scroll_by_viewport(&self) -> Result<(), SessionError>;

    async fn scroll_to_bottom(&self) -> Result<(), SessionError>;

    /// Give transient overlays or post-click navigation a moment to
    /// settle.
    async fn settle(&self, wait: Duration) -> Result<(), SessionError>;
}

/// One accessibility violation, axe-style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibilityFinding {
    pub id: String,
    pub impact: String,
    pub description: String,
    pub help: String,
    pub help_url: String,
    pub nodes: usize,
}

/// Scans the current page for accessibility violations.
#[async_trait]
pub trait AccessibilityAuditor: Send + Sync {
    async fn scan(&self) -> Result<Vec<AccessibilityFinding>, SessionError>;
}
