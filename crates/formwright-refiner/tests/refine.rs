//! End-to-end runs against in-memory form adapters

use async_trait::async_trait;
use formwright_domain::quality::extraction_quality;
use formwright_domain::traits::{FormSchemaReader, FormWriter};
use formwright_domain::{
    Diagnostics, ExtractionOutcome, FieldMap, FieldName, FieldOrigin, FieldSchema, FieldValue,
    IterationKind, QualityAssessment, RunState, SchemaError, Severity, SourceCorpus, WriteError,
};
use formwright_extractor::{
    ExtractionProvider, ExtractorConfig, GenerativeExtractor, PatternExtractor, ValueType,
};
use formwright_llm::MockProvider;
use formwright_quality::{Assessor, QualityError};
use formwright_refiner::{OutputStatus, Refiner, RefinerConfig, RunRequest};
use formwright_sources::SourceDescriptor;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Form adapter holding a fixed schema and recording writes
struct MemoryForm {
    schema: Option<Vec<FieldSchema>>,
    schema_warnings: Vec<String>,
    fail_writes: bool,
    written: Mutex<Vec<(PathBuf, BTreeMap<String, String>)>>,
}

impl MemoryForm {
    fn new(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            schema: Some(names.iter().map(|n| FieldSchema::text(*n)).collect()),
            schema_warnings: Vec::new(),
            fail_writes: false,
            written: Mutex::new(Vec::new()),
        })
    }

    fn failing_writes(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            schema: Some(names.iter().map(|n| FieldSchema::text(*n)).collect()),
            schema_warnings: Vec::new(),
            fail_writes: true,
            written: Mutex::new(Vec::new()),
        })
    }

    fn with_schema_warning(names: &[&str], warning: &str) -> Arc<Self> {
        Arc::new(Self {
            schema: Some(names.iter().map(|n| FieldSchema::text(*n)).collect()),
            schema_warnings: vec![warning.to_string()],
            fail_writes: false,
            written: Mutex::new(Vec::new()),
        })
    }

    fn missing() -> Arc<Self> {
        Arc::new(Self {
            schema: None,
            schema_warnings: Vec::new(),
            fail_writes: false,
            written: Mutex::new(Vec::new()),
        })
    }

    fn writes(&self) -> Vec<(PathBuf, BTreeMap<String, String>)> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormSchemaReader for MemoryForm {
    async fn read_schema(
        &self,
        form: &Path,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<FieldSchema>, SchemaError> {
        for warning in &self.schema_warnings {
            diagnostics.warn("form", warning.clone());
        }
        self.schema
            .clone()
            .ok_or_else(|| SchemaError::FormNotFound(form.to_path_buf()))
    }
}

#[async_trait]
impl FormWriter for MemoryForm {
    async fn write_form(
        &self,
        _form: &Path,
        values: &BTreeMap<String, String>,
        destination: &Path,
    ) -> Result<(), WriteError> {
        if self.fail_writes {
            return Err(WriteError::ToolFailed("disk full".into()));
        }
        self.written
            .lock()
            .unwrap()
            .push((destination.to_path_buf(), values.clone()));
        Ok(())
    }
}

/// Extractor returning a fixed field map
struct FixedExtractor {
    fields: FieldMap,
}

impl FixedExtractor {
    fn new(pairs: &[(&str, &str, f64)]) -> Box<Self> {
        let fields = pairs
            .iter()
            .map(|(n, v, c)| (FieldName::new(*n), FieldValue::new(*v, *c, FieldOrigin::Pattern)))
            .collect();
        Box::new(Self { fields })
    }
}

#[async_trait]
impl ExtractionProvider for FixedExtractor {
    fn id(&self) -> &str {
        "fixed"
    }

    async fn extract(
        &self,
        _corpus: &SourceCorpus,
        schema: &[FieldSchema],
        _diagnostics: &Diagnostics,
    ) -> ExtractionOutcome {
        let quality = extraction_quality(&self.fields, schema.len());
        ExtractionOutcome::new(self.fields.clone(), quality, "fixed")
    }
}

/// Assessor that always proposes one fresh field and asks to retry
#[derive(Default)]
struct EndlessAssessor {
    calls: Arc<AtomicUsize>,
}

impl Assessor for EndlessAssessor {
    fn assess(
        &self,
        _fields: &FieldMap,
        _schema: &[FieldSchema],
        _corpus: &SourceCorpus,
        _diagnostics: &Diagnostics,
    ) -> Result<QualityAssessment, QualityError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let mut corrected_fields = BTreeMap::new();
        corrected_fields.insert(FieldName::new(format!("extra_{}", n)), "value".to_string());
        Ok(QualityAssessment {
            overall_score: 0.1,
            corrected_fields,
            should_retry: true,
            ..Default::default()
        })
    }
}

/// Assessor that always fails
struct BrokenAssessor;

impl Assessor for BrokenAssessor {
    fn assess(
        &self,
        _fields: &FieldMap,
        _schema: &[FieldSchema],
        _corpus: &SourceCorpus,
        _diagnostics: &Diagnostics,
    ) -> Result<QualityAssessment, QualityError> {
        Err(QualityError::Config("broken".into()))
    }
}

fn text(s: &str) -> Vec<SourceDescriptor> {
    vec![SourceDescriptor::Text(s.to_string())]
}

fn refiner(form: Arc<MemoryForm>, extractor: Box<dyn ExtractionProvider>) -> Refiner {
    Refiner::new(RefinerConfig::default(), form.clone(), form, extractor).unwrap()
}

#[tokio::test]
async fn test_pattern_run_to_done() {
    let form = MemoryForm::new(&["case_number", "contact_phone"]);
    let refiner = refiner(form.clone(), Box::new(PatternExtractor::new()));
    let request = RunRequest::new(
        "petition.pdf",
        text("Case Number: 24STFL00615\nPhone: 555-123-4567"),
    )
    .with_output("petition_filled.pdf");

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert!(report.success);
    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.provider_id, "pattern");
    assert_eq!(report.fields.get("case_number").map(String::as_str), Some("24STFL00615"));
    assert_eq!(report.fields.get("contact_phone").map(String::as_str), Some("(555) 123-4567"));
    assert_eq!(report.confidence.get("case_number"), Some(&0.8));
    assert_eq!(report.total_fields, 2);
    assert_eq!(report.filled_fields, 2);
    assert_eq!(
        report.output,
        OutputStatus::Written {
            path: PathBuf::from("petition_filled.pdf")
        }
    );

    let writes = form.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].1.len(), 2);
}

#[tokio::test]
async fn test_pass_without_corrections_stops_loop() {
    // every field filled at 0.8: quality 0.72 is below the gate, but the
    // assessor has nothing to propose
    let form = MemoryForm::new(&["case_number"]);
    let refiner = Refiner::new(
        RefinerConfig::default().with_max_iterations(10),
        form.clone(),
        form,
        Box::new(PatternExtractor::new()),
    )
    .unwrap();
    let request = RunRequest::new("form.pdf", text("Case Number: 24STFL00615"));

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.iterations.len(), 1);
    assert_eq!(report.iterations[0].kind, IterationKind::InitialExtraction);
    assert!((report.quality_score - 0.72).abs() < 1e-9);
}

#[tokio::test]
async fn test_correction_pass_adds_missing_field() {
    let form = MemoryForm::new(&["a", "county", "spouse_ssn"]);
    let refiner = refiner(form.clone(), FixedExtractor::new(&[("a", "1", 0.5)]));
    let request = RunRequest::new("form.pdf", text("County: Kern"));

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.iterations.len(), 2);

    let pass = &report.iterations[1];
    assert_eq!(pass.iteration, 2);
    assert_eq!(pass.kind, IterationKind::QualityImprovement);
    assert_eq!(
        pass.corrections.get(&FieldName::new("county")).map(String::as_str),
        Some("Kern")
    );
    assert_eq!(pass.fields_filled, 2);

    assert_eq!(report.fields.get("county").map(String::as_str), Some("Kern"));
    // corrected field has unknown confidence
    assert!(!report.confidence.contains_key("county"));
    // 0.4 * 2/3 + 0.4 * 0.5 + 0.2 * 0
    assert!((report.quality_score - (0.8 / 3.0 + 0.2)).abs() < 1e-9);
    assert!(report.iterations[1].quality_score > report.iterations[0].quality_score);
}

#[tokio::test]
async fn test_iteration_bound_respected() {
    let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
    for bound in 1..=5 {
        let form = MemoryForm::new(&names);
        let assessor = EndlessAssessor::default();
        let calls = assessor.calls.clone();
        let refiner = refiner(form, FixedExtractor::new(&[("a", "1", 0.3)]))
            .with_assessor(Box::new(assessor));
        let request = RunRequest::new("form.pdf", text("x")).with_max_iterations(bound);

        let report = refiner.run(&request, &Diagnostics::new()).await;

        assert_eq!(report.state, RunState::Done);
        assert_eq!(report.iterations.len(), bound);
        assert_eq!(calls.load(Ordering::SeqCst), bound - 1);
        let indices: Vec<usize> = report.iterations.iter().map(|r| r.iteration).collect();
        assert_eq!(indices, (1..=bound).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_field_presence_only_grows() {
    let form = MemoryForm::new(&["a", "b"]);
    let refiner = refiner(form, FixedExtractor::new(&[("a", "1", 0.3), ("b", "2", 0.3)]))
        .with_assessor(Box::new(EndlessAssessor::default()));
    let request = RunRequest::new("form.pdf", text("x"));

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert!(report.fields.contains_key("a"));
    assert!(report.fields.contains_key("b"));
    let filled: Vec<usize> = report.iterations.iter().map(|r| r.fields_filled).collect();
    assert!(filled.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_quality_gate_skips_assessment() {
    let form = MemoryForm::new(&["a"]);
    let assessor = EndlessAssessor::default();
    let calls = assessor.calls.clone();
    let refiner = refiner(form, FixedExtractor::new(&[("a", "1", 0.95)]))
        .with_assessor(Box::new(assessor));

    let report = refiner
        .run(&RunRequest::new("form.pdf", text("x")), &Diagnostics::new())
        .await;

    assert!(report.quality_score >= 0.9);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(report.iterations.len(), 1);
}

#[tokio::test]
async fn test_assessment_failure_finalizes() {
    let form = MemoryForm::new(&["a", "b"]);
    let refiner = refiner(form, FixedExtractor::new(&[("a", "1", 0.3)]))
        .with_assessor(Box::new(BrokenAssessor));
    let diagnostics = Diagnostics::new();

    let report = refiner
        .run(&RunRequest::new("form.pdf", text("x")), &diagnostics)
        .await;

    assert_eq!(report.state, RunState::Done);
    assert!(report.success);
    assert_eq!(report.iterations.len(), 1);
    assert!(diagnostics
        .warnings()
        .iter()
        .any(|d| d.message.contains("Assessment failed")));
}

#[tokio::test]
async fn test_write_failure_keeps_results() {
    let form = MemoryForm::failing_writes(&["case_number"]);
    let refiner = refiner(form, Box::new(PatternExtractor::new()));
    let request = RunRequest::new("form.pdf", text("Case Number: 24STFL00615")).with_output("out.pdf");

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert!(report.success);
    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.fields.get("case_number").map(String::as_str), Some("24STFL00615"));
    match &report.output {
        OutputStatus::Failed { path, error } => {
            assert_eq!(path, &PathBuf::from("out.pdf"));
            assert!(error.contains("disk full"));
        }
        other => panic!("expected write failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_result_not_written() {
    let form = MemoryForm::new(&["case_number"]);
    let refiner = refiner(form.clone(), Box::new(PatternExtractor::new()));
    let request = RunRequest::new("form.pdf", text("nothing useful")).with_output("out.pdf");

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert!(report.success);
    assert_eq!(report.output, OutputStatus::SkippedEmpty);
    assert!(form.writes().is_empty());
}

#[tokio::test]
async fn test_missing_schema_fails_run() {
    let form = MemoryForm::missing();
    let refiner = refiner(form, Box::new(PatternExtractor::new()));
    let request = RunRequest::new("missing.pdf", text("x")).with_output("out.pdf");

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert!(!report.success);
    assert_eq!(report.state, RunState::Failed);
    assert!(report.iterations.is_empty());
    assert!(report.error.unwrap().contains("missing.pdf"));
}

#[tokio::test]
async fn test_schema_warnings_reach_report() {
    let form = MemoryForm::with_schema_warning(&["case_number"], "Duplicate field name 'case_number'");
    let refiner = refiner(form, Box::new(PatternExtractor::new()));
    let request = RunRequest::new("form.pdf", text("Case Number: 24STFL00615"));

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert_eq!(report.state, RunState::Done);
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("Duplicate field name")));
}

#[tokio::test]
async fn test_zero_iteration_override_fails_run() {
    let form = MemoryForm::new(&["a"]);
    let refiner = refiner(form, Box::new(PatternExtractor::new()));
    let request = RunRequest::new("form.pdf", text("x")).with_max_iterations(0);

    let report = refiner.run(&request, &Diagnostics::new()).await;

    assert_eq!(report.state, RunState::Failed);
}

#[tokio::test]
async fn test_unreachable_url_degrades() {
    let form = MemoryForm::new(&["case_number"]);
    let refiner = refiner(form, Box::new(PatternExtractor::new()));
    let request = RunRequest::new(
        "form.pdf",
        vec![
            SourceDescriptor::Url("http://127.0.0.1:9/intake".into()),
            SourceDescriptor::Text("Case Number: 24STFL00615".into()),
        ],
    );
    let diagnostics = Diagnostics::new();

    let report = refiner.run(&request, &diagnostics).await;

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.fields.get("case_number").map(String::as_str), Some("24STFL00615"));
    assert!(!diagnostics.warnings().is_empty());
}

#[tokio::test]
async fn test_generative_run_with_mock_backend() {
    let llm = MockProvider::new(
        r#"Here you go:
{"extracted_data": {"petitioner_name": "Maria Lopez", "county": "Kern"},
 "confidence_scores": {"petitioner_name": 0.95, "county": 0.9}}"#,
    );
    let extractor = GenerativeExtractor::new(Arc::new(llm.clone()), ExtractorConfig::default());
    let form = MemoryForm::new(&["petitioner_name", "county"]);
    let refiner = refiner(form, Box::new(extractor));

    let report = refiner
        .run(&RunRequest::new("form.pdf", text("Petitioner: Maria Lopez")), &Diagnostics::new())
        .await;

    assert_eq!(report.provider_id, "mock:mock");
    assert_eq!(report.fields.get("county").map(String::as_str), Some("Kern"));
    assert_eq!(report.iterations.len(), 1);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_report_carries_value_types() {
    let llm = MockProvider::new(
        r#"{"extracted_data": {"petitioner_name": "Maria Lopez", "support_amount": "$500.00",
 "hearing_date": "01/15/2025", "has_children": "Yes"},
 "confidence_scores": {"petitioner_name": 0.9, "support_amount": 0.9, "hearing_date": 0.9, "has_children": 0.9}}"#,
    );
    let extractor = GenerativeExtractor::new(Arc::new(llm), ExtractorConfig::default());
    let form = MemoryForm::new(&["petitioner_name", "support_amount", "hearing_date", "has_children"]);
    let refiner = refiner(form, Box::new(extractor));

    let report = refiner
        .run(&RunRequest::new("form.pdf", text("Petitioner: Maria Lopez")), &Diagnostics::new())
        .await;

    assert_eq!(report.field_types.get("petitioner_name"), Some(&ValueType::Text));
    assert_eq!(report.field_types.get("support_amount"), Some(&ValueType::Currency));
    assert_eq!(report.field_types.get("hearing_date"), Some(&ValueType::Date));
    assert_eq!(report.field_types.get("has_children"), Some(&ValueType::Checkbox));
    assert_eq!(report.field_types.len(), report.fields.len());
}

#[tokio::test]
async fn test_report_json_shape() {
    let form = MemoryForm::new(&["case_number", "county"]);
    let refiner = refiner(form, Box::new(PatternExtractor::new()));
    let report = refiner
        .run(
            &RunRequest::new("form.pdf", text("Case Number: 24STFL00615")),
            &Diagnostics::new(),
        )
        .await;

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["state"], "done");
    assert_eq!(json["total_fields"], 2);
    assert_eq!(json["filled_fields"], 1);
    assert_eq!(json["fields"]["case_number"], "24STFL00615");
    assert_eq!(json["confidence"]["case_number"], 0.8);
    assert_eq!(json["field_types"]["case_number"], "text");
    assert_eq!(json["iterations"][0]["kind"], "initial_extraction");
    assert_eq!(json["output"]["status"], "not_requested");
}
