//! In-page JavaScript used by the Chromium session.
//!
//! Every script is a self-contained IIFE returning JSON with snake_case
//! keys, matching the Rust structs it deserializes into. Selector order
//! is the contract for element indices: the survey and the follow-up
//! action scripts must query the same selectors in the same order.

pub const FIELD_SELECTOR: &str = "input[type=text],input[type=email],input[type=password],\
input[type=tel],input[type=number],input:not([type]),textarea";

pub const TOGGLE_SELECTOR: &str = "input[type=checkbox],input[type=radio]";

pub const BUTTON_SELECTOR: &str = "button,input[type=submit],input[type=button],[role=button]";

pub fn survey_controls() -> String {
    format!(
        r#"(() => {{
  const visible = (el) => {{
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    return rect.width > 0 && rect.height > 0 &&
      style.visibility !== 'hidden' && style.display !== 'none';
  }};
  const fields = Array.from(document.querySelectorAll('{fields}')).map((el, i) => ({{
    index: i,
    kind: el.tagName === 'TEXTAREA' ? 'textarea' : (el.type || 'text'),
    placeholder: el.placeholder || null,
    editable: !el.disabled && !el.readOnly && visible(el),
  }}));
  const toggles = Array.from(document.querySelectorAll('{toggles}')).map((el, i) => ({{
    index: i,
    kind: el.type,
    checked: el.checked,
    enabled: !el.disabled && visible(el),
  }}));
  const buttons = Array.from(document.querySelectorAll('{buttons}')).map((el, i) => ({{
    index: i,
    label: (el.innerText || el.value || el.getAttribute('aria-label') || '').trim(),
    visible: visible(el),
    enabled: !el.disabled,
  }}));
  return {{ forms: document.forms.length, fields, toggles, buttons }};
}})()"#,
        fields = FIELD_SELECTOR,
        toggles = TOGGLE_SELECTOR,
        buttons = BUTTON_SELECTOR,
    )
}

/// Fill the nth fillable control. The value is passed JSON-encoded so
/// arbitrary strings survive embedding. Dispatches input and change so
/// framework-bound forms notice the edit.
pub fn fill_field(index: usize, json_value: &str) -> String {
    format!(
        r#"(() => {{
  const el = document.querySelectorAll('{fields}')[{index}];
  if (!el) return false;
  el.focus();
  el.value = {json_value};
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return true;
}})()"#,
        fields = FIELD_SELECTOR,
    )
}

pub fn set_checked(index: usize) -> String {
    format!(
        r#"(() => {{
  const el = document.querySelectorAll('{toggles}')[{index}];
  if (!el) return false;
  el.click();
  return true;
}})()"#,
        toggles = TOGGLE_SELECTOR,
    )
}

pub fn click_button(index: usize) -> String {
    format!(
        r#"(() => {{
  const el = document.querySelectorAll('{buttons}')[{index}];
  if (!el) return false;
  el.click();
  return true;
}})()"#,
        buttons = BUTTON_SELECTOR,
    )
}

pub const SCROLL_BY_VIEWPORT: &str =
    "window.scrollBy({ top: window.innerHeight, behavior: 'instant' }); true";

pub const SCROLL_TO_BOTTOM: &str =
    "window.scrollTo({ top: document.body.scrollHeight, behavior: 'instant' }); true";

pub const LINKS: &str =
    "Array.from(document.querySelectorAll('a[href]')).map(a => a.href)";

pub const PERF_TIMING: &str = r#"(() => {
  const nav = performance.getEntriesByType('navigation')[0];
  if (!nav) return { load_time: 0, dom_content_loaded: 0, ttfb: 0 };
  return {
    load_time: Math.max(0, nav.loadEventEnd - nav.startTime) / 1000,
    dom_content_loaded: Math.max(0, nav.domContentLoadedEventEnd - nav.startTime) / 1000,
    ttfb: Math.max(0, nav.responseStart - nav.requestStart) / 1000,
  };
})()"#;

pub const SEO_SNAPSHOT: &str = r#"(() => {
  const meta = document.querySelector('meta[name="description"]');
  return {
    title_length: (document.title || '').length,
    meta_description: meta ? meta.getAttribute('content') : null,
    h1_count: document.querySelectorAll('h1').length,
  };
})()"#;

pub const IMAGE_INVENTORY: &str = r#"Array.from(document.images).map(img => ({
  src: img.currentSrc || img.src || '',
  alt: img.hasAttribute('alt') ? img.getAttribute('alt') : null,
}))"#;

/// Rule-level CSS usage sample. Cross-origin stylesheets whose rules
/// cannot be read are skipped entirely.
pub const CSS_USAGE: &str = r#"(() => {
  let total = 0;
  let used = 0;
  for (const sheet of document.styleSheets) {
    let rules;
    try { rules = sheet.cssRules; } catch (e) { continue; }
    if (!rules) continue;
    for (const rule of rules) {
      const text = rule.cssText || '';
      total += text.length;
      if (rule.selectorText) {
        try {
          if (document.querySelector(rule.selectorText)) used += text.length;
        } catch (e) {}
      } else {
        used += text.length;
      }
    }
  }
  return { total_bytes: total, used_bytes: used };
})()"#;

pub const READY_STATE: &str = "document.readyState";
