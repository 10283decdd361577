//! Result of one extraction attempt

use crate::field::{FieldMap, FieldName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output of a single `extract` call
///
/// Not mutated after creation. Corrections are merged into a copy of
/// `fields` owned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// Extracted values with per-field confidence and origin
    pub fields: FieldMap,
    /// Aggregate quality in [0, 1]
    pub quality_score: f64,
    /// Identifier of the provider that produced the outcome
    pub provider_id: String,
}

impl ExtractionOutcome {
    /// Create an outcome, clamping the quality score
    pub fn new(fields: FieldMap, quality_score: f64, provider_id: impl Into<String>) -> Self {
        Self {
            fields,
            quality_score: quality_score.clamp(0.0, 1.0),
            provider_id: provider_id.into(),
        }
    }

    /// Outcome with no fields and zero quality
    pub fn empty(provider_id: impl Into<String>) -> Self {
        Self::new(FieldMap::new(), 0.0, provider_id)
    }

    /// Defined confidences keyed by field
    pub fn confidence(&self) -> BTreeMap<FieldName, f64> {
        self.fields.confidences()
    }
}
