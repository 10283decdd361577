//! Parse generative responses into field values

use crate::error::ResponseParseError;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Field values and confidences decoded from a response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    /// Non-blank values by field name
    pub values: BTreeMap<String, String>,
    /// Confidences in [0, 1], only for fields present in `values`
    pub confidence: BTreeMap<String, f64>,
}

impl ParsedResponse {
    /// Whether no value was found
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse a backend response
///
/// The JSON document is the span from the first `{` to the last `}`. When
/// values are present but no confidence object is, every value gets
/// `default_confidence`.
pub fn parse_response(
    response: &str,
    default_confidence: f64,
) -> Result<ParsedResponse, ResponseParseError> {
    let json_str = extract_json(response)?;
    let json: Value = serde_json::from_str(json_str)?;
    let obj = json
        .as_object()
        .ok_or_else(|| ResponseParseError::Shape("Expected a JSON object".to_string()))?;

    let mut parsed = ParsedResponse::default();

    match obj.get("extracted_data") {
        None | Some(Value::Null) => {}
        Some(Value::Object(data)) => {
            for (name, value) in data {
                match scalar_text(value) {
                    Some(text) => {
                        parsed.values.insert(name.clone(), text);
                    }
                    None if value.is_array() || value.is_object() => {
                        warn!("Skipping non-scalar value for field '{}'", name);
                    }
                    None => {}
                }
            }
        }
        Some(_) => {
            return Err(ResponseParseError::Shape(
                "'extracted_data' is not an object".to_string(),
            ))
        }
    }

    let raw_confidence = obj
        .get("confidence_scores")
        .and_then(Value::as_object)
        .filter(|scores| !scores.is_empty());

    match raw_confidence {
        Some(scores) => {
            for (name, score) in scores {
                if !parsed.values.contains_key(name) {
                    continue;
                }
                match confidence_value(score) {
                    Some(c) => {
                        parsed.confidence.insert(name.clone(), c.clamp(0.0, 1.0));
                    }
                    None => warn!("Ignoring invalid confidence for field '{}'", name),
                }
            }
        }
        None => {
            let default = default_confidence.clamp(0.0, 1.0);
            parsed.confidence = parsed
                .values
                .keys()
                .map(|name| (name.clone(), default))
                .collect();
        }
    }

    Ok(parsed)
}

/// The `{ ... }` span of the response
fn extract_json(response: &str) -> Result<&str, ResponseParseError> {
    let start = response.find('{').ok_or(ResponseParseError::NoJson)?;
    let end = response.rfind('}').ok_or(ResponseParseError::NoJson)?;
    if end < start {
        return Err(ResponseParseError::NoJson);
    }
    Ok(&response[start..=end])
}

/// Scalar JSON value as trimmed, non-blank text
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn confidence_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|c: &f64| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let response = r#"Here you go:
{
  "extracted_data": {"case_number": "24STFL00615", "petitioner_name": "TAHIRA FRANCIS"},
  "confidence_scores": {"case_number": 0.95, "petitioner_name": 0.9}
}
Hope that helps."#;

        let parsed = parse_response(response, 0.8).unwrap();
        assert_eq!(parsed.values["case_number"], "24STFL00615");
        assert_eq!(parsed.confidence["petitioner_name"], 0.9);
    }

    #[test]
    fn test_markdown_wrapped_response() {
        let response = "```json\n{\"extracted_data\": {\"a\": \"1\"}}\n```";
        let parsed = parse_response(response, 0.8).unwrap();
        assert_eq!(parsed.values["a"], "1");
    }

    #[test]
    fn test_no_braces() {
        let result = parse_response("I could not find anything.", 0.8);
        assert_eq!(result, Err(ResponseParseError::NoJson));
    }

    #[test]
    fn test_reversed_braces() {
        assert_eq!(parse_response("} oops {", 0.8), Err(ResponseParseError::NoJson));
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_response("{ not json }", 0.8);
        assert!(matches!(result, Err(ResponseParseError::InvalidJson(_))));
    }

    #[test]
    fn test_missing_confidence_defaults() {
        let parsed = parse_response(r#"{"extracted_data": {"a": "x", "b": "y"}}"#, 0.8).unwrap();
        assert_eq!(parsed.confidence.len(), 2);
        assert!(parsed.confidence.values().all(|&c| c == 0.8));
    }

    #[test]
    fn test_partial_confidence_leaves_others_unknown() {
        let parsed = parse_response(
            r#"{"extracted_data": {"a": "x", "b": "y"}, "confidence_scores": {"a": 0.7}}"#,
            0.8,
        )
        .unwrap();
        assert_eq!(parsed.confidence.get("a"), Some(&0.7));
        assert_eq!(parsed.confidence.get("b"), None);
    }

    #[test]
    fn test_value_normalisation() {
        let parsed = parse_response(
            r#"{"extracted_data": {"n": 1200.5, "flag": true, "blank": "  ", "none": null, "list": [1]},
                "confidence_scores": {"n": 1.7, "flag": "0.4", "ghost": 0.9}}"#,
            0.8,
        )
        .unwrap();
        assert_eq!(parsed.values.len(), 2);
        assert_eq!(parsed.values["n"], "1200.5");
        assert_eq!(parsed.values["flag"], "true");
        assert_eq!(parsed.confidence["n"], 1.0);
        assert_eq!(parsed.confidence["flag"], 0.4);
        assert!(!parsed.confidence.contains_key("ghost"));
    }

    #[test]
    fn test_wrong_shape() {
        let result = parse_response(r#"{"extracted_data": "nope"}"#, 0.8);
        assert!(matches!(result, Err(ResponseParseError::Shape(_))));
    }
}
