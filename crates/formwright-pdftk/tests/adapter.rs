//! PdftkForm against a stand-in pdftk script

#![cfg(unix)]

use formwright_domain::traits::{FormSchemaReader, FormWriter};
use formwright_domain::{Diagnostics, FieldKind, SchemaError, WriteError};
use formwright_pdftk::{PdftkConfig, PdftkForm};
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fake pdftk: `dump_data_fields` prints a fixed report, `fill_form`
/// copies the FDF to the output path, a form named `broken.pdf` fails and
/// one named `odd.pdf` dumps an unknown type under a repeated name
const SCRIPT: &str = r#"#!/bin/sh
case "$1" in
  *broken.pdf) echo "Error: Unexpected Exception in open_reader()" >&2; exit 1 ;;
  *odd.pdf)
    printf -- '---\nFieldType: Signature\nFieldName: signed\n'
    printf -- '---\nFieldType: Text\nFieldName: signed\n'
    exit 0 ;;
esac
case "$2" in
  dump_data_fields)
    printf -- '---\nFieldType: Text\nFieldName: case_number\nFieldNameAlt: Case Number\nFieldFlags: 0\n'
    printf -- '---\nFieldType: Choice\nFieldName: county\nFieldFlags: 0\nFieldStateOption: Kern\nFieldStateOption: Los Angeles\n'
    ;;
  fill_form)
    cp "$3" "$5"
    ;;
esac
"#;

fn setup() -> (TempDir, PdftkForm, PathBuf) {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("pdftk");
    fs::write(&script, SCRIPT).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let form = dir.path().join("petition.pdf");
    fs::write(&form, b"%PDF-1.7").unwrap();

    let adapter = PdftkForm::new(PdftkConfig {
        binary: script,
        ..Default::default()
    });
    (dir, adapter, form)
}

#[tokio::test]
async fn test_read_schema() {
    let (_dir, adapter, form) = setup();

    let schema = adapter.read_schema(&form, &Diagnostics::new()).await.unwrap();

    assert_eq!(schema.len(), 2);
    assert_eq!(schema[0].name.as_str(), "case_number");
    assert_eq!(schema[0].alt_label, "Case Number");
    assert_eq!(schema[1].kind, FieldKind::Choice);
    assert_eq!(schema[1].choice_options, vec!["Kern", "Los Angeles"]);
}

#[tokio::test]
async fn test_read_schema_missing_form() {
    let (dir, adapter, _form) = setup();

    let result = adapter.read_schema(&dir.path().join("nope.pdf"), &Diagnostics::new()).await;

    assert!(matches!(result, Err(SchemaError::FormNotFound(_))));
}

#[tokio::test]
async fn test_read_schema_unreadable_form() {
    let (dir, adapter, _form) = setup();
    let broken = dir.path().join("broken.pdf");
    fs::write(&broken, b"garbage").unwrap();

    match adapter.read_schema(&broken, &Diagnostics::new()).await {
        Err(SchemaError::Malformed(stderr)) => assert!(stderr.contains("open_reader")),
        other => panic!("expected malformed form, got {:?}", other),
    }
}

#[tokio::test]
async fn test_read_schema_records_dump_warnings() {
    let (dir, adapter, _form) = setup();
    let odd = dir.path().join("odd.pdf");
    fs::write(&odd, b"%PDF-1.7").unwrap();
    let diagnostics = Diagnostics::new();

    let schema = adapter.read_schema(&odd, &diagnostics).await.unwrap();

    assert_eq!(schema.len(), 1);
    assert_eq!(schema[0].kind, FieldKind::FreeText);
    let warnings = diagnostics.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.component == "pdftk"));
    assert!(warnings[1].message.contains("Duplicate field name 'signed'"));
}

#[tokio::test]
async fn test_missing_tool() {
    let (dir, _adapter, form) = setup();
    let adapter = PdftkForm::new(PdftkConfig {
        binary: dir.path().join("not-installed"),
        ..Default::default()
    });

    let result = adapter.read_schema(&form, &Diagnostics::new()).await;

    assert!(matches!(result, Err(SchemaError::ToolUnavailable { .. })));
}

#[tokio::test]
async fn test_write_form_passes_fdf() {
    let (dir, adapter, form) = setup();
    let output = dir.path().join("out").join("petition_filled.pdf");

    let mut values = BTreeMap::new();
    values.insert("case_number".to_string(), "24STFL00615".to_string());
    values.insert("notes".to_string(), String::new());
    adapter.write_form(&form, &values, &output).await.unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("%FDF-1.2"));
    assert!(written.contains("/T (case_number)\n/V (24STFL00615)"));
    assert!(!written.contains("notes"));
}

#[tokio::test]
async fn test_write_failure() {
    let (dir, adapter, _form) = setup();
    let broken = dir.path().join("broken.pdf");
    fs::write(&broken, b"garbage").unwrap();

    let result = adapter
        .write_form(&broken, &BTreeMap::new(), Path::new("out.pdf"))
        .await;

    assert!(matches!(result, Err(WriteError::ToolFailed(_))));
}
