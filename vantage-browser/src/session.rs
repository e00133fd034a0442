//! `PageSession` implementation over a Chromium page.
//!
//! CDP commands issued against one page are multiplexed over a single
//! WebSocket connection and serialized by the browser handler, which is
//! what lets the audit pipeline dispatch several calls concurrently.

use crate::scripts;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, Headers, ResourceType, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::cdp::js_protocol::runtime::{EventConsoleApiCalled, RemoteObject};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::debug;
use vantage_core::viewport::ViewportProfile;
use vantage_scanner::error::SessionError;
use vantage_scanner::session::{
    ButtonInfo, CaptureLog, ConsoleMessage, ControlSurvey, CssUsage, FieldInfo, FieldKind,
    ImageRef, Navigation, PageSession, PerfTiming, ResponseRecord, SeoSnapshot, ToggleInfo,
};

/// How long to wait for the main-document response event after
/// navigation has settled.
const DOC_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Cap on the DOM readiness poll.
const DOM_READY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Default)]
struct CaptureBuffers {
    console: Mutex<Vec<ConsoleMessage>>,
    responses: Mutex<Vec<ResponseRecord>>,
}

pub struct ChromiumSession {
    page: Page,
    buffers: Arc<CaptureBuffers>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

impl ChromiumSession {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            buffers: Arc::new(CaptureBuffers::default()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Emulate a device before the first navigation. Metrics apply to
    /// all subsequent page loads on this target.
    pub async fn apply_viewport(&self, profile: &ViewportProfile) -> Result<(), SessionError> {
        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(profile.width as i64)
            .height(profile.height as i64)
            .device_scale_factor(profile.device_scale_factor)
            .mobile(profile.mobile)
            .build()
            .map_err(SessionError::Command)?;
        self.page.execute(metrics).await.map_err(command_error)?;

        if let Some(user_agent) = profile.user_agent {
            self.page
                .execute(SetUserAgentOverrideParams {
                    user_agent: user_agent.to_string(),
                    accept_language: None,
                    platform: None,
                    user_agent_metadata: None,
                })
                .await
                .map_err(command_error)?;
        }
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: impl Into<String>) -> Result<T, SessionError> {
        let result = self
            .page
            .evaluate(script.into())
            .await
            .map_err(evaluation_error)?;
        result.into_value::<T>().map_err(evaluation_error)
    }

    async fn eval_action(&self, script: String, index: usize) -> Result<(), SessionError> {
        let found: bool = self.eval(script).await?;
        if found {
            Ok(())
        } else {
            Err(SessionError::NoSuchElement(index))
        }
    }

    async fn wait_for_dom(&self) {
        let poll = async {
            loop {
                match self.eval::<String>(scripts::READY_STATE).await {
                    Ok(state) if state == "interactive" || state == "complete" => break,
                    Ok(_) | Err(_) => tokio::time::sleep(Duration::from_millis(200)).await,
                }
            }
        };
        if timeout(DOM_READY_TIMEOUT, poll).await.is_err() {
            debug!("DOM readiness poll timed out, continuing with partial page");
        }
    }

    fn stop_listeners(&self) {
        let mut listeners = self.listeners.lock().unwrap();
        for handle in listeners.drain(..) {
            handle.abort();
        }
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<Navigation, SessionError> {
        // Listen before navigating so the main-document response event
        // cannot be missed.
        let mut responses = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(command_error)?;

        self.page.goto(url).await.map_err(command_error)?;
        let _ = self.page.wait_for_navigation().await;
        self.wait_for_dom().await;

        let document = timeout(DOC_RESPONSE_TIMEOUT, async {
            while let Some(event) = responses.next().await {
                if matches!(event.r#type, ResourceType::Document) {
                    return Some(event);
                }
            }
            None
        })
        .await
        .ok()
        .flatten()
        .ok_or_else(|| SessionError::NoResponse(url.to_string()))?;

        let title = self
            .page
            .get_title()
            .await
            .map_err(command_error)?
            .unwrap_or_default();
        let final_url = self
            .page
            .url()
            .await
            .map_err(command_error)?
            .unwrap_or_else(|| url.to_string());

        Ok(Navigation {
            status: document.response.status as u16,
            title,
            final_url,
            headers: header_map(&document.response.headers),
        })
    }

    async fn links(&self) -> Result<Vec<String>, SessionError> {
        self.eval(scripts::LINKS).await
    }

    async fn begin_capture(&self) -> Result<(), SessionError> {
        self.stop_listeners();
        self.buffers.console.lock().unwrap().clear();
        self.buffers.responses.lock().unwrap().clear();

        let mut response_events = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(command_error)?;
        let mut console_events = self
            .page
            .event_listener::<EventConsoleApiCalled>()
            .await
            .map_err(command_error)?;

        let buffers = self.buffers.clone();
        let response_task = tokio::spawn(async move {
            while let Some(event) = response_events.next().await {
                let record = ResponseRecord {
                    url: event.response.url.clone(),
                    status: event.response.status as u16,
                    resource_type: resource_type_name(&event.r#type),
                    content_length: content_length(&event.response.headers),
                };
                buffers.responses.lock().unwrap().push(record);
            }
        });

        let buffers = self.buffers.clone();
        let console_task = tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                let message = ConsoleMessage {
                    level: console_level(&event),
                    text: console_text(&event.args),
                };
                buffers.console.lock().unwrap().push(message);
            }
        });

        let mut listeners = self.listeners.lock().unwrap();
        listeners.push(response_task);
        listeners.push(console_task);
        Ok(())
    }

    async fn end_capture(&self) -> Result<CaptureLog, SessionError> {
        self.stop_listeners();
        Ok(CaptureLog {
            console: std::mem::take(&mut self.buffers.console.lock().unwrap()),
            responses: std::mem::take(&mut self.buffers.responses.lock().unwrap()),
        })
    }

    async fn performance_timing(&self) -> Result<PerfTiming, SessionError> {
        self.eval(scripts::PERF_TIMING).await
    }

    async fn screenshot(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let params = CaptureScreenshotParams {
            quality: Some(100),
            format: Some(CaptureScreenshotFormat::Png),
            capture_beyond_viewport: Some(true),
            ..Default::default()
        };
        let data = self.page.screenshot(params).await.map_err(command_error)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    async fn css_usage(&self) -> Result<CssUsage, SessionError> {
        let usage: JsCssUsage = self.eval(scripts::CSS_USAGE).await?;
        Ok(CssUsage {
            total_bytes: usage.total_bytes,
            used_bytes: usage.used_bytes,
        })
    }

    async fn seo_snapshot(&self) -> Result<SeoSnapshot, SessionError> {
        let snapshot: JsSeoSnapshot = self.eval(scripts::SEO_SNAPSHOT).await?;
        Ok(SeoSnapshot {
            title_length: snapshot.title_length,
            meta_description: snapshot.meta_description,
            h1_count: snapshot.h1_count,
        })
    }

    async fn image_inventory(&self) -> Result<Vec<ImageRef>, SessionError> {
        let images: Vec<JsImage> = self.eval(scripts::IMAGE_INVENTORY).await?;
        Ok(images
            .into_iter()
            .map(|img| ImageRef {
                src: img.src,
                alt: img.alt,
            })
            .collect())
    }

    async fn survey_controls(&self) -> Result<ControlSurvey, SessionError> {
        let survey: JsSurvey = self.eval(scripts::survey_controls()).await?;
        Ok(ControlSurvey {
            forms: survey.forms,
            fields: survey
                .fields
                .into_iter()
                .map(|f| FieldInfo {
                    index: f.index,
                    kind: field_kind(&f.kind),
                    placeholder: f.placeholder,
                    editable: f.editable,
                })
                .collect(),
            toggles: survey
                .toggles
                .into_iter()
                .map(|t| ToggleInfo {
                    index: t.index,
                    kind: t.kind,
                    checked: t.checked,
                    enabled: t.enabled,
                })
                .collect(),
            buttons: survey
                .buttons
                .into_iter()
                .map(|b| ButtonInfo {
                    index: b.index,
                    label: b.label,
                    visible: b.visible,
                    enabled: b.enabled,
                })
                .collect(),
        })
    }

    async fn fill_field(&self, index: usize, value: &str) -> Result<(), SessionError> {
        let json_value = serde_json::to_string(value)
            .map_err(|e| SessionError::Evaluation(e.to_string()))?;
        self.eval_action(scripts::fill_field(index, &json_value), index)
            .await
    }

    async fn set_checked(&self, index: usize) -> Result<(), SessionError> {
        self.eval_action(scripts::set_checked(index), index).await
    }

    async fn click_button(&self, index: usize) -> Result<(), SessionError> {
        self.eval_action(scripts::click_button(index), index).await
    }

    async fn scroll_by_viewport(&self) -> Result<(), SessionError> {
        let _: bool = self.eval(scripts::SCROLL_BY_VIEWPORT).await?;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<(), SessionError> {
        let _: bool = self.eval(scripts::SCROLL_TO_BOTTOM).await?;
        Ok(())
    }

    async fn settle(&self, wait: Duration) -> Result<(), SessionError> {
        tokio::time::sleep(wait).await;
        Ok(())
    }
}

// --- CDP payload mapping ---

fn command_error(e: impl std::fmt::Display) -> SessionError {
    SessionError::Command(e.to_string())
}

fn evaluation_error(e: impl std::fmt::Display) -> SessionError {
    SessionError::Evaluation(e.to_string())
}

fn header_map(headers: &Headers) -> HashMap<String, String> {
    headers
        .inner()
        .as_object()
        .map(|object| {
            object
                .iter()
                .map(|(name, value)| {
                    let value = value
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| value.to_string());
                    (name.to_lowercase(), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn content_length(headers: &Headers) -> Option<u64> {
    headers
        .inner()
        .as_object()?
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.as_str())
        .and_then(|value| value.parse().ok())
}

fn resource_type_name(resource_type: &ResourceType) -> String {
    let name = match resource_type {
        ResourceType::Document => "document",
        ResourceType::Stylesheet => "stylesheet",
        ResourceType::Script => "script",
        ResourceType::Image => "image",
        ResourceType::Media => "media",
        ResourceType::Font => "font",
        ResourceType::Xhr => "xhr",
        ResourceType::Fetch => "fetch",
        ResourceType::WebSocket => "websocket",
        _ => "other",
    };
    name.to_string()
}

fn console_level(event: &EventConsoleApiCalled) -> String {
    use chromiumoxide::cdp::js_protocol::runtime::ConsoleApiCalledType;
    let level = match event.r#type {
        ConsoleApiCalledType::Error => "error",
        ConsoleApiCalledType::Warning => "warning",
        ConsoleApiCalledType::Info => "info",
        ConsoleApiCalledType::Debug => "debug",
        _ => "log",
    };
    level.to_string()
}

fn console_text(args: &[RemoteObject]) -> String {
    args.iter()
        .map(|arg| match &arg.value {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => arg.description.clone().unwrap_or_default(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn field_kind(kind: &str) -> FieldKind {
    match kind {
        "email" => FieldKind::Email,
        "password" => FieldKind::Password,
        "tel" => FieldKind::Phone,
        "number" => FieldKind::Number,
        "textarea" => FieldKind::TextArea,
        _ => FieldKind::Text,
    }
}

// JS payloads, snake_case keys per scripts.rs.

#[derive(Deserialize)]
struct JsCssUsage {
    total_bytes: u64,
    used_bytes: u64,
}

#[derive(Deserialize)]
struct JsSeoSnapshot {
    title_length: usize,
    meta_description: Option<String>,
    h1_count: usize,
}

#[derive(Deserialize)]
struct JsImage {
    src: String,
    alt: Option<String>,
}

#[derive(Deserialize)]
struct JsSurvey {
    forms: usize,
    fields: Vec<JsField>,
    toggles: Vec<JsToggle>,
    buttons: Vec<JsButton>,
}

#[derive(Deserialize)]
struct JsField {
    index: usize,
    kind: String,
    placeholder: Option<String>,
    editable: bool,
}

#[derive(Deserialize)]
struct JsToggle {
    index: usize,
    kind: String,
    checked: bool,
    enabled: bool,
}

#[derive(Deserialize)]
struct JsButton {
    index: usize,
    label: String,
    visible: bool,
    enabled: bool,
}
