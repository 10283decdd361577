//! Value type inference for extracted fields

use formwright_domain::{FieldKind, FieldSchema};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// What an extracted value looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Anything else
    #[default]
    Text,
    /// Calendar date
    Date,
    /// Money amount
    Currency,
    /// Yes/no mark
    Checkbox,
    /// One of the form's listed options
    Dropdown,
}

impl ValueType {
    /// Lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Date => "date",
            ValueType::Currency => "currency",
            ValueType::Checkbox => "checkbox",
            ValueType::Dropdown => "dropdown",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}").expect("valid regex"));

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid regex"));

const CURRENCY_WORDS: [&str; 6] = ["amount", "total", "income", "debt", "asset", "support"];
const CHECKBOX_VALUES: [&str; 7] = ["yes", "no", "true", "false", "checked", "unchecked", "x"];

/// Infer the type of `value` filled into the field `name`
///
/// Toggle and choice fields take their type from the schema. Otherwise
/// currency wins over date, and date over checkbox.
pub fn detect_value_type(name: &str, value: &str, schema: Option<&FieldSchema>) -> ValueType {
    match schema.map(|f| f.kind) {
        Some(FieldKind::Toggle) => return ValueType::Checkbox,
        Some(FieldKind::Choice) => return ValueType::Dropdown,
        _ => {}
    }

    let name = name.to_lowercase();
    let value = value.trim();

    if value.contains('$') || CURRENCY_WORDS.iter().any(|w| name.contains(w)) {
        return ValueType::Currency;
    }
    if name.contains("date")
        || name.contains("dob")
        || NUMERIC_DATE.is_match(value)
        || ISO_DATE.is_match(value)
    {
        return ValueType::Date;
    }
    if CHECKBOX_VALUES.contains(&value.to_lowercase().as_str())
        || name.contains("check")
        || name.contains("select")
    {
        return ValueType::Checkbox;
    }
    ValueType::Text
}
