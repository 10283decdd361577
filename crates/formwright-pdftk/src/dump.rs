//! Parser for `pdftk <form> dump_data_fields`

use formwright_domain::{FieldKind, FieldName, FieldSchema, SchemaError};
use std::collections::{BTreeMap, HashSet};

/// Parsed field schema plus anything worth reporting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDump {
    /// Fields in document order
    pub fields: Vec<FieldSchema>,
    /// Non-fatal oddities (unknown types, duplicate names)
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct Record {
    values: BTreeMap<String, String>,
    state_options: Vec<String>,
}

impl Record {
    fn is_empty(&self) -> bool {
        self.values.is_empty() && self.state_options.is_empty()
    }
}

/// Parse the `dump_data_fields` report
///
/// Records are separated by lines starting with `---` and hold `Key: Value`
/// lines; `FieldStateOption` may repeat.
///
/// # Errors
///
/// Returns [`SchemaError::Malformed`] for a record without `FieldName` or
/// with a non-numeric `FieldFlags`.
pub fn parse_field_dump(output: &str) -> Result<FieldDump, SchemaError> {
    let mut records = Vec::new();
    let mut current = Record::default();

    for line in output.lines() {
        if line.starts_with("---") {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key == "FieldStateOption" {
            current.state_options.push(value.to_string());
        } else {
            current.values.insert(key.to_string(), value.to_string());
        }
    }
    if !current.is_empty() {
        records.push(current);
    }

    let mut dump = FieldDump::default();
    let mut seen = HashSet::new();
    for (index, record) in records.into_iter().enumerate() {
        let field = to_schema(index, record, &mut dump.warnings)?;
        if seen.insert(field.name.clone()) {
            dump.fields.push(field);
        } else {
            dump.warnings
                .push(format!("Duplicate field name '{}' ignored", field.name));
        }
    }
    Ok(dump)
}

fn to_schema(index: usize, record: Record, warnings: &mut Vec<String>) -> Result<FieldSchema, SchemaError> {
    let Some(name) = record.values.get("FieldName").filter(|n| !n.is_empty()) else {
        return Err(SchemaError::Malformed(format!(
            "field record {} has no FieldName",
            index + 1
        )));
    };

    let kind = match record.values.get("FieldType").map(String::as_str) {
        None | Some("Text") => FieldKind::FreeText,
        Some("Button") => FieldKind::Toggle,
        Some("Choice") => FieldKind::Choice,
        Some(other) => {
            warnings.push(format!(
                "Field '{}' has unknown type '{}', treated as text",
                name, other
            ));
            FieldKind::FreeText
        }
    };

    let flags = match record.values.get("FieldFlags") {
        None => 0,
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            SchemaError::Malformed(format!("field '{}' has invalid FieldFlags '{}'", name, raw))
        })?,
    };

    let choice_options = if kind == FieldKind::Choice {
        record.state_options
    } else {
        Vec::new()
    };

    Ok(FieldSchema {
        name: FieldName::new(name.as_str()),
        kind,
        alt_label: record.values.get("FieldNameAlt").cloned().unwrap_or_default(),
        choice_options,
        flags,
    })
}
