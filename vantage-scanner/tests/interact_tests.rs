mod common;

use common::{FakePage, FakeSession};
use std::sync::Arc;
use vantage_scanner::interact::{ActionOutcome, InteractionEngine, InteractionStage};
use vantage_scanner::session::{
    ButtonInfo, ControlSurvey, FieldInfo, FieldKind, PageSession, ToggleInfo,
};

const URL: &str = "https://forms.invalid/";

fn busy_survey() -> ControlSurvey {
    ControlSurvey {
        forms: 1,
        fields: vec![
            FieldInfo {
                index: 0,
                kind: FieldKind::Email,
                placeholder: None,
                editable: true,
            },
            FieldInfo {
                index: 1,
                kind: FieldKind::Text,
                placeholder: Some("Your name".to_string()),
                editable: true,
            },
            FieldInfo {
                index: 2,
                kind: FieldKind::Text,
                placeholder: None,
                editable: false,
            },
        ],
        toggles: vec![
            ToggleInfo {
                index: 0,
                kind: "checkbox".to_string(),
                checked: false,
                enabled: true,
            },
            ToggleInfo {
                index: 1,
                kind: "checkbox".to_string(),
                checked: true,
                enabled: true,
            },
        ],
        buttons: vec![
            ButtonInfo {
                index: 0,
                label: "Got it".to_string(),
                visible: true,
                enabled: true,
            },
            ButtonInfo {
                index: 1,
                label: "Submit".to_string(),
                visible: true,
                enabled: true,
            },
        ],
    }
}

#[tokio::test]
async fn engine_walks_overlay_forms_button_and_scroll_stages() {
    let session = Arc::new(FakeSession::new(&[(
        URL,
        FakePage::new("Form page").with_survey(busy_survey()),
    )]));
    session.navigate(URL).await.expect("page exists");

    let report = InteractionEngine::default().run(session.as_ref()).await;

    assert_eq!(report.forms_detected, 1);

    // Overlay "Got it" first, the unchecked checkbox, then "Submit".
    assert_eq!(session.clicks(), vec![0, 0, 1]);

    let fills = session.fills();
    assert_eq!(fills.len(), 2, "the read-only field is skipped");
    assert!(fills[0].1.contains('@'), "email field gets an email");
    assert!(fills[1].1.contains(' '), "name hint yields a full name");

    let skipped_field = report
        .actions
        .iter()
        .find(|a| a.stage == InteractionStage::Forms && a.outcome == ActionOutcome::Skipped)
        .expect("non-editable field is logged as skipped");
    assert!(skipped_field.detail.contains("#2"));

    let scrolls = report
        .actions
        .iter()
        .filter(|a| a.stage == InteractionStage::Scroll)
        .count();
    assert_eq!(scrolls, 2);
}

#[tokio::test]
async fn engine_records_skips_on_a_page_with_no_controls() {
    let session = Arc::new(FakeSession::new(&[(URL, FakePage::new("Bare"))]));
    session.navigate(URL).await.expect("page exists");

    let report = InteractionEngine::default().run(session.as_ref()).await;

    assert_eq!(report.forms_detected, 0);
    assert!(session.clicks().is_empty());
    assert!(session.fills().is_empty());

    let overlay = report
        .actions
        .iter()
        .find(|a| a.stage == InteractionStage::Overlay)
        .expect("overlay stage always logs");
    assert_eq!(overlay.outcome, ActionOutcome::Skipped);

    let button = report
        .actions
        .iter()
        .find(|a| a.stage == InteractionStage::ActionButton)
        .expect("button stage always logs");
    assert_eq!(button.outcome, ActionOutcome::Skipped);
}
