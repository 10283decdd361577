//! Quality assessment of a field map against the schema and corpus

use crate::field::FieldName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fresh per-iteration verdict from the quality assessor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Completion-adjusted overall score in [0, 1]
    pub overall_score: f64,
    /// Filled fields over total schema fields
    pub completion_rate: f64,
    /// Mean of the supplied confidences (0 when none)
    pub confidence_average: f64,
    /// Human-readable diagnostics, in discovery order
    pub issues: Vec<String>,
    /// Human-readable suggestions, in discovery order
    pub recommendations: Vec<String>,
    /// Proposed values for missing or weak fields
    pub corrected_fields: BTreeMap<FieldName, String>,
    /// Whether another refinement pass is worthwhile
    pub should_retry: bool,
}

impl QualityAssessment {
    /// Whether any correction was proposed
    pub fn has_corrections(&self) -> bool {
        !self.corrected_fields.is_empty()
    }
}
