use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `{{ key }}` or `{{ payer.denialText }}`; whitespace inside the braces is optional.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\s*\}\}").expect("placeholder regex"));

/// Flat string-keyed render context. Ordered so debug output is stable.
pub type RenderContext = BTreeMap<String, String>;

/// Substitute every placeholder in `body` with its context value.
///
/// Absent or blank values become a visible `[KEY]` marker (key uppercased verbatim,
/// dots included). Values are inserted as-is and never re-scanned, so text that
/// itself looks like a placeholder survives untouched.
pub fn render_template(body: &str, ctx: &RenderContext) -> String {
    PLACEHOLDER_RE
        .replace_all(body, |caps: &Captures| {
            let key = &caps[1];
            match ctx.get(key) {
                Some(v) if !v.trim().is_empty() => v.clone(),
                _ => missing_marker(key),
            }
        })
        .into_owned()
}

pub fn missing_marker(key: &str) -> String {
    format!("[{}]", key.to_uppercase())
}

/// Distinct placeholder keys in first-appearance order.
pub fn placeholder_keys(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER_RE
        .captures_iter(body)
        .map(|c| c[1].to_string())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}
