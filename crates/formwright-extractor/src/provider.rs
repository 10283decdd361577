//! The extraction contract and provider selection

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::generative::GenerativeExtractor;
use crate::pattern::PatternExtractor;
use async_trait::async_trait;
use formwright_domain::{Diagnostics, ExtractionOutcome, FieldSchema, SourceCorpus};
use formwright_llm::{AnthropicProvider, LlmProvider, OllamaProvider, OpenAiProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A concrete extraction strategy
///
/// `extract` never fails: transport and parse problems are absorbed into a
/// lower-quality outcome and recorded in `diagnostics`.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Identifier reported in outcomes
    fn id(&self) -> &str;

    /// Extract values for `schema` from `corpus`
    async fn extract(
        &self,
        corpus: &SourceCorpus,
        schema: &[FieldSchema],
        diagnostics: &Diagnostics,
    ) -> ExtractionOutcome;
}

/// Provider selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic rule table
    #[default]
    Pattern,
    /// OpenAI chat completions
    OpenAi,
    /// Anthropic messages
    Anthropic,
    /// Local Ollama
    Ollama,
}

impl ProviderKind {
    /// All selectable providers
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Pattern,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Ollama,
    ];

    /// Lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Pattern => "pattern",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Environment variable holding the credential, if one is required
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Pattern | ProviderKind::Ollama => None,
        }
    }

    /// Whether a credential must be supplied
    pub fn requires_api_key(&self) -> bool {
        self.api_key_var().is_some()
    }

    /// Model used when none is given
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Pattern => None,
            ProviderKind::OpenAi => Some(formwright_llm::openai::DEFAULT_MODEL),
            ProviderKind::Anthropic => Some(formwright_llm::anthropic::DEFAULT_MODEL),
            ProviderKind::Ollama => Some(formwright_llm::ollama::DEFAULT_MODEL),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" => Ok(ProviderKind::Pattern),
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(ExtractorError::UnknownProvider(other.to_string())),
        }
    }
}

/// What is needed to build a provider
#[derive(Debug, Clone, Default)]
pub struct ProviderSpec {
    /// Which provider
    pub kind: ProviderKind,
    /// Model override
    pub model: Option<String>,
    /// Credential
    pub api_key: Option<String>,
}

/// Build the extraction provider selected by `spec`
///
/// Fails only on configuration problems such as a missing credential.
pub fn build_provider(
    spec: &ProviderSpec,
    config: &ExtractorConfig,
) -> Result<Box<dyn ExtractionProvider>, ExtractorError> {
    match build_backend(spec, config)? {
        Some(llm) => Ok(Box::new(GenerativeExtractor::new(llm, config.clone()))),
        None => Ok(Box::new(PatternExtractor::new())),
    }
}

/// Build the LLM backend behind `spec`; `None` for the pattern provider
pub fn build_backend(
    spec: &ProviderSpec,
    config: &ExtractorConfig,
) -> Result<Option<Arc<dyn LlmProvider>>, ExtractorError> {
    config.validate().map_err(ExtractorError::Config)?;

    let model = spec
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| spec.kind.default_model().map(str::to_string))
        .unwrap_or_default();
    let api_key = || -> Result<String, ExtractorError> {
        spec.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ExtractorError::MissingCredential(
                    spec.kind.to_string(),
                    spec.kind.api_key_var().unwrap_or_default().to_string(),
                )
            })
    };
    let timeout = config.request_timeout();

    let llm: Arc<dyn LlmProvider> = match spec.kind {
        ProviderKind::Pattern => return Ok(None),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(api_key()?, model).with_timeout(timeout)),
        ProviderKind::Anthropic => {
            Arc::new(AnthropicProvider::new(api_key()?, model).with_timeout(timeout))
        }
        ProviderKind::Ollama => Arc::new(
            OllamaProvider::new(config.ollama_endpoint.clone(), model).with_timeout(timeout),
        ),
    };
    Ok(Some(llm))
}
