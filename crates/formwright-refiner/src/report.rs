//! Run request and the machine-readable run report

use formwright_domain::{Diagnostic, IterationRecord, RunState};
use formwright_extractor::ValueType;
use formwright_sources::SourceDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Inputs for one refinement run
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Target form
    pub form: PathBuf,
    /// Ordered source descriptors
    pub sources: Vec<SourceDescriptor>,
    /// Where to write the populated form, if anywhere
    pub output: Option<PathBuf>,
    /// Per-run override of the configured iteration bound
    pub max_iterations: Option<usize>,
}

impl RunRequest {
    /// Request with no output and the configured iteration bound
    pub fn new(form: impl Into<PathBuf>, sources: Vec<SourceDescriptor>) -> Self {
        Self {
            form: form.into(),
            sources,
            output: None,
            max_iterations: None,
        }
    }

    /// Write the populated form to `output`
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Override the iteration bound
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

/// What happened to the populated form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutputStatus {
    /// No destination was given
    NotRequested,
    /// Nothing was extracted, so nothing was written
    SkippedEmpty,
    /// Populated form written
    Written {
        /// Destination
        path: PathBuf,
    },
    /// The output adapter failed; extraction results are unaffected
    Failed {
        /// Destination
        path: PathBuf,
        /// Adapter error
        error: String,
    },
}

impl OutputStatus {
    /// Path of the written form, if any
    pub fn written_path(&self) -> Option<&PathBuf> {
        match self {
            OutputStatus::Written { path } => Some(path),
            _ => None,
        }
    }
}

/// Final result of a run, serializable as a single JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether extraction completed (independent of the output write)
    pub success: bool,
    /// Terminal state
    pub state: RunState,
    /// Target form
    pub form: PathBuf,
    /// Provider that produced the initial extraction
    pub provider_id: String,
    /// Final field values
    pub fields: BTreeMap<String, String>,
    /// Defined per-field confidences
    pub confidence: BTreeMap<String, f64>,
    /// Inferred value type of each filled field
    #[serde(default)]
    pub field_types: BTreeMap<String, ValueType>,
    /// Final aggregate quality
    pub quality_score: f64,
    /// Number of target fields
    pub total_fields: usize,
    /// Number of filled fields
    pub filled_fields: usize,
    /// Audit trail, in execution order
    pub iterations: Vec<IterationRecord>,
    /// Output write status
    pub output: OutputStatus,
    /// Reason for a failed run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Absorbed failures and notes recorded during the run
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Report for a run that aborted before extraction
    pub fn failed(form: PathBuf, error: impl Into<String>) -> Self {
        Self {
            success: false,
            state: RunState::Failed,
            form,
            provider_id: String::new(),
            fields: BTreeMap::new(),
            confidence: BTreeMap::new(),
            field_types: BTreeMap::new(),
            quality_score: 0.0,
            total_fields: 0,
            filled_fields: 0,
            iterations: Vec::new(),
            output: OutputStatus::NotRequested,
            error: Some(error.into()),
            diagnostics: Vec::new(),
        }
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
