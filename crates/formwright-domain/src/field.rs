//! Target form fields and the typed field-value map

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier of a target form field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Create a field name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the raw name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with `_` and `.` separators replaced by spaces, trimmed
    ///
    /// Used as a search label when looking for the field in free text.
    pub fn as_label(&self) -> String {
        self.0.replace(['_', '.'], " ").trim().to_string()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of input a form field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text entry
    FreeText,
    /// Checkbox / radio style toggle
    Toggle,
    /// Enumerated choice (list or combo box)
    Choice,
}

impl FieldKind {
    /// Lower-case display name
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::FreeText => "text",
            FieldKind::Toggle => "toggle",
            FieldKind::Choice => "choice",
        }
    }
}

/// Schema entry for one target field, immutable for the lifetime of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Unique field identifier
    pub name: FieldName,
    /// Input kind
    pub kind: FieldKind,
    /// Human-readable hint (may be empty)
    pub alt_label: String,
    /// Ordered options, non-empty only for [`FieldKind::Choice`]
    pub choice_options: Vec<String>,
    /// Opaque flags carried through unmodified
    pub flags: u32,
}

impl FieldSchema {
    /// Free-text field with no label
    pub fn text(name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::FreeText,
            alt_label: String::new(),
            choice_options: Vec::new(),
            flags: 0,
        }
    }

    /// Set the human-readable label
    pub fn with_alt_label(mut self, label: impl Into<String>) -> Self {
        self.alt_label = label.into();
        self
    }

    /// Turn into a choice field with the given options
    pub fn with_choices(mut self, options: Vec<String>) -> Self {
        self.kind = FieldKind::Choice;
        self.choice_options = options;
        self
    }

    /// Search labels for phrase matching: alt label first, then the cleaned name
    pub fn search_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(2);
        let alt = self.alt_label.trim();
        if !alt.is_empty() {
            labels.push(alt.to_string());
        }
        let cleaned = self.name.as_label();
        if !cleaned.is_empty() {
            labels.push(cleaned);
        }
        labels
    }
}

/// Where a field value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldOrigin {
    /// Category regex rule of the pattern strategy
    Pattern,
    /// Label phrase search of the pattern strategy
    Phrase,
    /// Generative backend, by provider id
    Generative {
        /// Provider identifier
        provider: String,
    },
    /// Correction merged during a quality-improvement pass
    Correction {
        /// Iteration index that applied the correction
        iteration: usize,
    },
}

/// Value record for a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// The extracted text
    pub value: String,
    /// Confidence in [0, 1]; `None` means unknown
    pub confidence: Option<f64>,
    /// Provenance of the value
    pub origin: FieldOrigin,
}

impl FieldValue {
    /// Create a value with known confidence (clamped to [0, 1])
    pub fn new(value: impl Into<String>, confidence: f64, origin: FieldOrigin) -> Self {
        Self {
            value: value.into(),
            confidence: Some(confidence.clamp(0.0, 1.0)),
            origin,
        }
    }

    /// Create a value whose confidence is unknown
    pub fn unscored(value: impl Into<String>, origin: FieldOrigin) -> Self {
        Self {
            value: value.into(),
            confidence: None,
            origin,
        }
    }
}

/// Ordered map of field name to value record
///
/// Keys are never removed once inserted: corrections only add new keys or
/// overwrite existing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    entries: BTreeMap<FieldName, FieldValue>,
}

impl FieldMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field
    pub fn insert(&mut self, name: FieldName, value: FieldValue) {
        self.entries.insert(name, value);
    }

    /// Look up a field
    pub fn get(&self, name: &FieldName) -> Option<&FieldValue> {
        self.entries.get(name)
    }

    /// Look up a field's value text
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&FieldName::new(name))
            .map(|v| v.value.as_str())
    }

    /// Whether the field is present
    pub fn contains(&self, name: &FieldName) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of filled fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field is filled
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in name order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldValue)> {
        self.entries.iter()
    }

    /// Defined confidences only (fields with unknown confidence are skipped)
    pub fn confidences(&self) -> BTreeMap<FieldName, f64> {
        self.entries
            .iter()
            .filter_map(|(name, v)| v.confidence.map(|c| (name.clone(), c)))
            .collect()
    }

    /// Plain `name -> value` view, as handed to the form writer
    pub fn values(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(name, v)| (name.as_str().to_string(), v.value.clone()))
            .collect()
    }

    /// Merge corrections produced at `iteration`
    ///
    /// Existing keys keep their confidence and get the new value; new keys
    /// are added with unknown confidence.
    pub fn merge_corrections(&mut self, corrections: &BTreeMap<FieldName, String>, iteration: usize) {
        for (name, value) in corrections {
            let origin = FieldOrigin::Correction { iteration };
            match self.entries.get_mut(name) {
                Some(existing) => {
                    existing.value = value.clone();
                    existing.origin = origin;
                }
                None => {
                    self.entries
                        .insert(name.clone(), FieldValue::unscored(value.clone(), origin));
                }
            }
        }
    }
}

impl FromIterator<(FieldName, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (FieldName, FieldValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
