//! Targeted re-scan for fields missing from the map

use formwright_domain::FieldSchema;
use formwright_extractor::patterns::accept_capture;
use regex::RegexBuilder;

/// Search labels for a missing field: alt label, then the name with `_` as spaces
fn labels(field: &FieldSchema) -> Vec<String> {
    [field.alt_label.trim().to_string(), field.name.as_str().replace('_', " ")]
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .collect()
}

/// Label variants tried in order: optional colon, required colon or dash,
/// lower-cased label with optional colon or dash
fn variants(label: &str) -> [String; 3] {
    let escaped = regex::escape(label);
    [
        format!(r"{}\s*:?\s*([^\n\r]+)", escaped),
        format!(r"{}\s*[:\-]\s*([^\n\r]+)", escaped),
        format!(r"{}\s*[:\-]?\s*([^\n\r]+)", regex::escape(&label.to_lowercase())),
    ]
}

/// Look for a value for `field` in `text`
///
/// Matching is case-insensitive; a capture is accepted only when it is
/// between 1 and 199 characters after trimming.
pub fn find_missing(field: &FieldSchema, text: &str) -> Option<String> {
    for label in labels(field) {
        for pattern in variants(&label) {
            let Ok(regex) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
                continue;
            };
            if let Some(value) = regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| accept_capture(m.as_str()))
            {
                return Some(value);
            }
        }
    }
    None
}
