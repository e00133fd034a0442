//! In-page accessibility heuristics.
//!
//! A lightweight subset of the usual WCAG automation checks, evaluated
//! directly in the page. Each check reports one finding covering all
//! offending elements, with the element count attached.

use async_trait::async_trait;
use chromiumoxide::Page;
use vantage_scanner::error::SessionError;
use vantage_scanner::session::{AccessibilityAuditor, AccessibilityFinding};

const A11Y_SCAN: &str = r#"(() => {
  const findings = [];
  const add = (id, impact, description, help, nodes) => {
    if (nodes > 0) findings.push({
      id, impact, description, help, nodes,
      help_url: 'https://dequeuniversity.com/rules/axe/4.8/' + id,
    });
  };

  const hasLabel = (el) => {
    if (el.getAttribute('aria-label') || el.getAttribute('aria-labelledby')) return true;
    if (el.getAttribute('title')) return true;
    if (el.id && document.querySelector('label[for="' + CSS.escape(el.id) + '"]')) return true;
    return !!el.closest('label');
  };
  const accessibleName = (el) =>
    (el.innerText || el.value || el.getAttribute('aria-label') ||
     el.getAttribute('title') || '').trim();

  add('image-alt', 'critical',
    'Images must have alternate text',
    'Add an alt attribute to every informative image',
    Array.from(document.images).filter(img => !img.hasAttribute('alt')).length);

  add('label', 'critical',
    'Form elements must have labels',
    'Associate a label with every form control',
    Array.from(document.querySelectorAll('input:not([type=hidden]):not([type=submit]):not([type=button]), select, textarea'))
      .filter(el => !hasLabel(el)).length);

  add('button-name', 'critical',
    'Buttons must have discernible text',
    'Give every button visible text or an aria-label',
    Array.from(document.querySelectorAll('button, input[type=button], input[type=submit]'))
      .filter(el => !accessibleName(el)).length);

  add('link-name', 'serious',
    'Links must have discernible text',
    'Give every link visible text or an aria-label',
    Array.from(document.querySelectorAll('a[href]'))
      .filter(el => !accessibleName(el) && !el.querySelector('img[alt]')).length);

  add('html-has-lang', 'serious',
    'The html element must have a lang attribute',
    'Declare the page language on the html element',
    document.documentElement.hasAttribute('lang') ? 0 : 1);

  add('document-title', 'serious',
    'Documents must have a title',
    'Provide a non-empty title element',
    (document.title || '').trim() ? 0 : 1);

  add('empty-heading', 'moderate',
    'Headings should not be empty',
    'Remove or fill empty heading elements',
    Array.from(document.querySelectorAll('h1,h2,h3,h4,h5,h6'))
      .filter(el => !el.innerText.trim()).length);

  return findings;
})()"#;

pub struct HeuristicAccessibilityAuditor {
    page: Page,
}

impl HeuristicAccessibilityAuditor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl AccessibilityAuditor for HeuristicAccessibilityAuditor {
    async fn scan(&self) -> Result<Vec<AccessibilityFinding>, SessionError> {
        let result = self
            .page
            .evaluate(A11Y_SCAN)
            .await
            .map_err(|e| SessionError::Evaluation(e.to_string()))?;
        result
            .into_value::<Vec<AccessibilityFinding>>()
            .map_err(|e| SessionError::Evaluation(e.to_string()))
    }
}
