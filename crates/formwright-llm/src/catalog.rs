//! Known models and task-based recommendations
//!
//! The table is a static snapshot used for offline listing and ranking.
//! Live availability comes from [`LlmProvider::list_models`](crate::LlmProvider::list_models).

use serde::Serialize;
use std::fmt;

/// Relative price band of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    /// Runs locally, no per-token cost
    Free,
    /// Cheapest hosted band
    Low,
    /// Mid-priced hosted band
    Medium,
    /// Flagship pricing
    High,
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CostTier::Free => "free",
            CostTier::Low => "low",
            CostTier::Medium => "medium",
            CostTier::High => "high",
        };
        f.write_str(s)
    }
}

/// Kind of form work a model is picked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Court and legal paperwork, accuracy first
    LegalForms,
    /// General extraction from documents
    DataExtraction,
    /// Short, simple forms where cost matters most
    SimpleForms,
    /// Long or messy documents
    ComplexAnalysis,
}

impl TaskKind {
    /// snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::LegalForms => "legal_forms",
            TaskKind::DataExtraction => "data_extraction",
            TaskKind::SimpleForms => "simple_forms",
            TaskKind::ComplexAnalysis => "complex_analysis",
        }
    }
}

/// One catalogued model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    /// Model identifier as passed to `--model`
    pub id: &'static str,
    /// Backend name (`openai`, `anthropic`, `ollama`)
    pub provider: &'static str,
    /// Context window in tokens
    pub context_window: u32,
    /// Price band
    pub cost_tier: CostTier,
    /// Accepts native PDF attachments
    pub documents: bool,
    /// Tasks the model suits
    pub recommended_for: &'static [TaskKind],
    /// One-line description
    pub description: &'static str,
}

use TaskKind::*;

/// Catalogued models, grouped by provider
pub static KNOWN_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "gpt-4o",
        provider: "openai",
        context_window: 128_000,
        cost_tier: CostTier::Medium,
        documents: true,
        recommended_for: &[LegalForms, DataExtraction, ComplexAnalysis],
        description: "Multimodal flagship with PDF input",
    },
    ModelInfo {
        id: "gpt-4o-mini",
        provider: "openai",
        context_window: 128_000,
        cost_tier: CostTier::Low,
        documents: true,
        recommended_for: &[SimpleForms, DataExtraction],
        description: "Small, fast and inexpensive",
    },
    ModelInfo {
        id: "gpt-4-turbo",
        provider: "openai",
        context_window: 128_000,
        cost_tier: CostTier::High,
        documents: true,
        recommended_for: &[LegalForms, ComplexAnalysis],
        description: "Default OpenAI model",
    },
    ModelInfo {
        id: "claude-3-5-sonnet-20241022",
        provider: "anthropic",
        context_window: 200_000,
        cost_tier: CostTier::Medium,
        documents: true,
        recommended_for: &[LegalForms, DataExtraction, ComplexAnalysis],
        description: "Default Anthropic model, strong on long documents",
    },
    ModelInfo {
        id: "claude-3-5-haiku-20241022",
        provider: "anthropic",
        context_window: 200_000,
        cost_tier: CostTier::Low,
        documents: true,
        recommended_for: &[SimpleForms, DataExtraction],
        description: "Fast, low-cost Claude",
    },
    ModelInfo {
        id: "claude-3-opus-20240229",
        provider: "anthropic",
        context_window: 200_000,
        cost_tier: CostTier::High,
        documents: true,
        recommended_for: &[LegalForms, ComplexAnalysis],
        description: "Highest-accuracy Claude 3 model",
    },
    ModelInfo {
        id: "llama3.1",
        provider: "ollama",
        context_window: 128_000,
        cost_tier: CostTier::Free,
        documents: false,
        recommended_for: &[SimpleForms, DataExtraction],
        description: "Default local model",
    },
    ModelInfo {
        id: "mistral",
        provider: "ollama",
        context_window: 32_000,
        cost_tier: CostTier::Free,
        documents: false,
        recommended_for: &[SimpleForms],
        description: "Small local model",
    },
];

/// Catalogued models, optionally limited to one provider
pub fn known_models(provider: Option<&str>) -> Vec<&'static ModelInfo> {
    KNOWN_MODELS
        .iter()
        .filter(|m| provider.is_none_or(|p| m.provider.eq_ignore_ascii_case(p)))
        .collect()
}

/// Rank `candidates` for `task`, best first
///
/// Models suited to the task come first. Within that split, `budget`
/// prefers the cheapest tier, otherwise the most capable (priciest) tier;
/// ties go to the larger context window.
pub fn recommend<'a>(
    task: TaskKind,
    budget: bool,
    candidates: &[&'a ModelInfo],
) -> Vec<&'a ModelInfo> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| {
        let unsuited = |m: &ModelInfo| !m.recommended_for.contains(&task);
        unsuited(a)
            .cmp(&unsuited(b))
            .then_with(|| {
                if budget {
                    a.cost_tier.cmp(&b.cost_tier)
                } else {
                    b.cost_tier.cmp(&a.cost_tier)
                }
            })
            .then_with(|| b.context_window.cmp(&a.context_window))
    });
    ranked
}
