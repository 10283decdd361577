//! Audit trail and orchestrator state

use crate::field::FieldName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What a loop pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationKind {
    /// First pass through the extraction provider
    InitialExtraction,
    /// Assessment-driven correction pass
    QualityImprovement,
}

impl IterationKind {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationKind::InitialExtraction => "initial_extraction",
            IterationKind::QualityImprovement => "quality_improvement",
        }
    }
}

/// Append-only audit entry for one loop pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based pass index
    pub iteration: usize,
    /// Kind of pass
    pub kind: IterationKind,
    /// Corrections applied in this pass (empty for the initial extraction)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub corrections: BTreeMap<FieldName, String>,
    /// Quality score after the pass
    pub quality_score: f64,
    /// Number of filled fields after the pass
    pub fields_filled: usize,
}

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Resolving the schema and building the corpus
    Initializing,
    /// Running the extraction provider
    Extracting,
    /// Running the quality assessor
    Assessing,
    /// Merging corrections
    Correcting,
    /// Handing values to the output adapter
    Finalizing,
    /// Completed
    Done,
    /// Aborted on an unrecoverable error
    Failed,
}

impl RunState {
    /// Whether the state is absorbing
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Initializing => "initializing",
            RunState::Extracting => "extracting",
            RunState::Assessing => "assessing",
            RunState::Correcting => "correcting",
            RunState::Finalizing => "finalizing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}
