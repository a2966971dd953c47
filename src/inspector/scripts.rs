//! In-page JavaScript evaluated through the DevTools protocol.
//!
//! Every script returns an object so that "nothing found" still has a value
//! to decode.

use serde::Deserialize;

use crate::detector::Candidate;
use crate::geometry::Rect;

/// CSS class tagged on the highlight overlay
pub const HIGHLIGHT_CLASS: &str = "qa-test-highlight";

#[derive(Debug, Deserialize)]
pub(crate) struct CountResult {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RectResult {
    pub found: bool,
    #[serde(default)]
    pub rect: Option<Rect>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResult {
    pub found: bool,
    #[serde(default)]
    pub elements: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdvanceResult {
    pub advanced: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

const RECT_OF: &str = r#"const rectOf = (el) => {
    const r = el.getBoundingClientRect();
    return { left: r.left, top: r.top, right: r.right, bottom: r.bottom, width: r.width, height: r.height };
  };"#;

pub(crate) fn count(selector: &str) -> String {
    format!(
        "(() => ({{ count: document.querySelectorAll({}).length }}))()",
        literal(selector)
    )
}

pub(crate) fn resolve_rect(selector: &str) -> String {
    format!(
        r#"(() => {{
  {rect_of}
  const el = document.querySelector({selector});
  if (!el) return {{ found: false }};
  return {{ found: true, rect: rectOf(el) }};
}})()"#,
        rect_of = RECT_OF,
        selector = literal(selector)
    )
}

pub(crate) fn advance(component: &str) -> String {
    format!(
        r#"(() => {{
  try {{
    window["ng"].getComponent(document.querySelector({component})).next(0);
    return {{ advanced: true }};
  }} catch (e) {{
    return {{ advanced: false, error: String(e) }};
  }}
}})()"#,
        component = literal(component)
    )
}

pub(crate) fn highlight(selector: &str, lifetime_ms: u128) -> String {
    format!(
        r#"(() => {{
  const cls = {class};
  document.querySelectorAll("." + cls).forEach((el) => el.remove());
  const target = document.querySelector({selector});
  if (!target) return {{ count: 0 }};
  const rect = target.getBoundingClientRect();

  const outline = document.createElement("div");
  outline.className = cls;
  Object.assign(outline.style, {{
    position: "absolute", left: rect.left + "px", top: rect.top + "px",
    width: rect.width + "px", height: rect.height + "px",
    border: "2px dashed red", pointerEvents: "none", boxSizing: "border-box", zIndex: "9999",
  }});
  document.body.appendChild(outline);

  const label = document.createElement("div");
  label.className = cls;
  Object.assign(label.style, {{
    position: "absolute", left: rect.left + "px", top: (rect.top - 20) + "px",
    background: "rgba(0,0,0,0.7)", color: "white", padding: "2px 5px",
    fontSize: "10px", borderRadius: "3px", zIndex: "9999",
  }});
  label.textContent = Math.round(rect.width) + " × " + Math.round(rect.height);
  document.body.appendChild(label);

  setTimeout(() => document.querySelectorAll("." + cls).forEach((el) => el.remove()), {lifetime});
  return {{ count: 2 }};
}})()"#,
        class = literal(HIGHLIGHT_CLASS),
        selector = literal(selector),
        lifetime = lifetime_ms
    )
}

pub(crate) fn content_elements(container: &str, patterns: &[String]) -> String {
    let patterns = serde_json::to_string(patterns).unwrap_or_else(|_| "[]".to_string());
    format!(
        r##"(() => {{
  {rect_of}
  const describe = (el) => {{
    let selector = el.tagName.toLowerCase();
    if (el.id) selector += "#" + el.id;
    if (typeof el.className === "string" && el.className.trim()) {{
      selector += "." + el.className.trim().split(/\s+/).join(".");
    }}
    return selector;
  }};
  const scope = document.querySelector({container});
  if (!scope) return {{ found: false }};
  const elements = [];
  for (const pattern of {patterns}) {{
    let matches;
    try {{
      matches = scope.querySelectorAll(pattern);
    }} catch (e) {{
      continue;
    }}
    matches.forEach((el) => {{
      const style = window.getComputedStyle(el);
      const visible = style.display !== "none"
        && style.visibility !== "hidden"
        && parseFloat(style.opacity) !== 0;
      elements.push({{ selector: describe(el), rect: rectOf(el), visible }});
    }});
  }}
  return {{ found: true, elements }};
}})()"##,
        rect_of = RECT_OF,
        container = literal(container),
        patterns = patterns
    )
}
