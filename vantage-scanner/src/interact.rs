//! Heuristic page interaction.
//!
//! Pages are arbitrary and frequently hostile to automation: markup is
//! unknown, elements vanish mid-interaction, scripts are slow. Every
//! stage here is therefore best-effort. The engine's contract is
//! "always returns a log": no stage failure aborts later stages, and
//! nothing in this module returns an error to the pipeline.

use crate::session::{ControlSurvey, FieldInfo, FieldKind, PageSession};
use crate::synthetic;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Bounds and keyword sets for the interaction stages.
#[derive(Debug, Clone)]
pub struct InteractionConfig {
    /// Cap on text fields filled, and separately on toggles checked.
    pub max_fields: usize,
    /// Candidate action buttons to attempt before giving up.
    pub max_button_attempts: usize,
    /// Affirmative labels that dismiss cookie banners and overlays.
    pub overlay_keywords: Vec<String>,
    /// Labels of buttons that likely progress a flow.
    pub action_keywords: Vec<String>,
    /// Grace period for transient overlays to render.
    pub overlay_wait: Duration,
    /// Settling time after clicks and scrolls.
    pub settle_wait: Duration,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        let keywords = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            max_fields: 10,
            max_button_attempts: 3,
            overlay_keywords: keywords(&[
                "accept", "ok", "got it", "i agree", "akceptuję", "zgoda", "rozumiem",
            ]),
            action_keywords: keywords(&[
                "login",
                "sign in",
                "next",
                "continue",
                "submit",
                "ok",
                "accept",
                "buy",
                "add to cart",
            ]),
            overlay_wait: Duration::from_millis(1000),
            settle_wait: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStage {
    Overlay,
    Forms,
    ActionButton,
    Scroll,
}

impl InteractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionStage::Overlay => "overlay",
            InteractionStage::Forms => "forms",
            InteractionStage::ActionButton => "action-button",
            InteractionStage::Scroll => "scroll",
        }
    }
}

/// Explicit attempt outcome, so tests can assert on behavior instead of
/// parsing log strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Performed,
    Skipped,
    Failed,
}

/// One entry in the page's interaction log, in causal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub stage: InteractionStage,
    pub outcome: ActionOutcome,
    pub detail: String,
}

impl ActionRecord {
    pub fn describe(&self) -> String {
        format!("{}: {}", self.stage.as_str(), self.detail)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionReport {
    pub actions: Vec<ActionRecord>,
    pub forms_detected: usize,
}

pub struct InteractionEngine {
    config: InteractionConfig,
}

impl InteractionEngine {
    pub fn new(config: InteractionConfig) -> Self {
        Self { config }
    }

    /// Run all four stages against the current page. Never fails.
    pub async fn run(&self, session: &dyn PageSession) -> InteractionReport {
        let mut log: Vec<ActionRecord> = Vec::new();

        self.dismiss_overlay(session, &mut log).await;
        let forms_detected = self.interact_with_forms(session, &mut log).await;
        self.click_action_button(session, &mut log).await;
        self.scroll_page(session, &mut log).await;

        InteractionReport {
            actions: log,
            forms_detected,
        }
    }

    async fn dismiss_overlay(&self, session: &dyn PageSession, log: &mut Vec<ActionRecord>) {
        let _ = session.settle(self.config.overlay_wait).await;

        let survey = match session.survey_controls().await {
            Ok(survey) => survey,
            Err(e) => {
                log.push(record(
                    InteractionStage::Overlay,
                    ActionOutcome::Failed,
                    format!("could not inspect page for overlays: {e}"),
                ));
                return;
            }
        };

        let candidate = survey.buttons.iter().find(|b| {
            b.visible && b.enabled && {
                let label = b.label.trim().to_lowercase();
                self.config
                    .overlay_keywords
                    .iter()
                    .any(|k| label.starts_with(k.as_str()))
            }
        });

        match candidate {
            Some(button) => match session.click_button(button.index).await {
                Ok(()) => {
                    log.push(record(
                        InteractionStage::Overlay,
                        ActionOutcome::Performed,
                        format!("dismissed overlay via \"{}\"", button.label.trim()),
                    ));
                    let _ = session.settle(self.config.settle_wait).await;
                }
                Err(e) => log.push(record(
                    InteractionStage::Overlay,
                    ActionOutcome::Failed,
                    format!("could not dismiss overlay \"{}\": {e}", button.label.trim()),
                )),
            },
            None => log.push(record(
                InteractionStage::Overlay,
                ActionOutcome::Skipped,
                "no common overlays detected".to_string(),
            )),
        }
    }

    async fn interact_with_forms(
        &self,
        session: &dyn PageSession,
        log: &mut Vec<ActionRecord>,
    ) -> usize {
        let survey = match session.survey_controls().await {
            Ok(survey) => survey,
            Err(e) => {
                log.push(record(
                    InteractionStage::Forms,
                    ActionOutcome::Failed,
                    format!("could not inspect forms: {e}"),
                ));
                return 0;
            }
        };

        log.push(record(
            InteractionStage::Forms,
            if survey.forms > 0 {
                ActionOutcome::Performed
            } else {
                ActionOutcome::Skipped
            },
            format!("detected {} form(s)", survey.forms),
        ));

        for field in survey.fields.iter().take(self.config.max_fields) {
            self.fill_one_field(session, field, log).await;
        }

        for toggle in survey.toggles.iter().take(self.config.max_fields) {
            if toggle.checked || !toggle.enabled {
                continue;
            }
            match session.set_checked(toggle.index).await {
                Ok(()) => log.push(record(
                    InteractionStage::Forms,
                    ActionOutcome::Performed,
                    format!("checked {} #{}", toggle.kind, toggle.index),
                )),
                Err(e) => log.push(record(
                    InteractionStage::Forms,
                    ActionOutcome::Failed,
                    format!("could not check {} #{}: {e}", toggle.kind, toggle.index),
                )),
            }
        }

        survey.forms
    }

    async fn fill_one_field(
        &self,
        session: &dyn PageSession,
        field: &FieldInfo,
        log: &mut Vec<ActionRecord>,
    ) {
        if !field.editable {
            log.push(record(
                InteractionStage::Forms,
                ActionOutcome::Skipped,
                format!("{} field #{} is not editable", field.kind.as_str(), field.index),
            ));
            return;
        }

        let value = value_for(field);
        match session.fill_field(field.index, &value).await {
            Ok(()) => log.push(record(
                InteractionStage::Forms,
                ActionOutcome::Performed,
                format!("filled {} field #{}", field.kind.as_str(), field.index),
            )),
            Err(e) => log.push(record(
                InteractionStage::Forms,
                ActionOutcome::Failed,
                format!(
                    "could not fill {} field #{}: {e}",
                    field.kind.as_str(),
                    field.index
                ),
            )),
        }
    }

    async fn click_action_button(&self, session: &dyn PageSession, log: &mut Vec<ActionRecord>) {
        let survey = match session.survey_controls().await {
            Ok(survey) => survey,
            Err(e) => {
                log.push(record(
                    InteractionStage::ActionButton,
                    ActionOutcome::Failed,
                    format!("could not inspect buttons: {e}"),
                ));
                return;
            }
        };

        let candidates = self.action_candidates(&survey);
        if candidates.is_empty() {
            log.push(record(
                InteractionStage::ActionButton,
                ActionOutcome::Skipped,
                "no action buttons matched".to_string(),
            ));
            return;
        }

        // One progression click per page is enough signal; stop on the
        // first button that takes.
        for (index, label) in candidates.into_iter().take(self.config.max_button_attempts) {
            match session.click_button(index).await {
                Ok(()) => {
                    log.push(record(
                        InteractionStage::ActionButton,
                        ActionOutcome::Performed,
                        format!("clicked button \"{label}\""),
                    ));
                    let _ = session.settle(self.config.settle_wait).await;
                    return;
                }
                Err(e) => {
                    debug!("action button \"{}\" did not respond: {}", label, e);
                    log.push(record(
                        InteractionStage::ActionButton,
                        ActionOutcome::Failed,
                        format!("could not click button \"{label}\": {e}"),
                    ));
                }
            }
        }
    }

    fn action_candidates(&self, survey: &ControlSurvey) -> Vec<(usize, String)> {
        survey
            .buttons
            .iter()
            .filter(|b| {
                b.visible && b.enabled && {
                    let label = b.label.trim().to_lowercase();
                    self.config
                        .action_keywords
                        .iter()
                        .any(|k| label.contains(k.as_str()))
                }
            })
            .map(|b| (b.index, b.label.trim().to_string()))
            .collect()
    }

    async fn scroll_page(&self, session: &dyn PageSession, log: &mut Vec<ActionRecord>) {
        match session.scroll_by_viewport().await {
            Ok(()) => log.push(record(
                InteractionStage::Scroll,
                ActionOutcome::Performed,
                "scrolled down one viewport".to_string(),
            )),
            Err(e) => log.push(record(
                InteractionStage::Scroll,
                ActionOutcome::Failed,
                format!("could not scroll: {e}"),
            )),
        }

        let _ = session.settle(self.config.settle_wait).await;

        match session.scroll_to_bottom().await {
            Ok(()) => log.push(record(
                InteractionStage::Scroll,
                ActionOutcome::Performed,
                "scrolled to bottom".to_string(),
            )),
            Err(e) => log.push(record(
                InteractionStage::Scroll,
                ActionOutcome::Failed,
                format!("could not scroll to bottom: {e}"),
            )),
        }
    }
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

/// Pick a plausible value for a field from its type and placeholder.
fn value_for(field: &FieldInfo) -> String {
    match field.kind {
        FieldKind::Email => synthetic::email(),
        FieldKind::Password => synthetic::password(),
        FieldKind::Phone => synthetic::phone(),
        FieldKind::Number => synthetic::integer(1, 100).to_string(),
        FieldKind::Text | FieldKind::TextArea => {
            let hint = field
                .placeholder
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            if hint.contains("name") {
                synthetic::full_name()
            } else if hint.contains("address") {
                synthetic::street_address()
            } else {
                synthetic::sentence()
            }
        }
    }
}

fn record(stage: InteractionStage, outcome: ActionOutcome, detail: String) -> ActionRecord {
    ActionRecord {
        stage,
        outcome,
        detail,
    }
}
