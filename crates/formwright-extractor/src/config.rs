//! Configuration for the extractors

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Corpus characters embedded in a generative prompt
    pub max_prompt_chars: usize,

    /// Maximum time for a single backend call (seconds)
    pub request_timeout_secs: u64,

    /// Confidence given to generative fields when the response has none
    pub default_confidence: f64,

    /// Send binary documents to backends as native attachments
    pub attach_documents: bool,

    /// Ollama endpoint
    pub ollama_endpoint: String,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_prompt_chars == 0 {
            return Err("max_prompt_chars must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err("default_confidence must be between 0.0 and 1.0".to_string());
        }
        if self.ollama_endpoint.trim().is_empty() {
            return Err("ollama_endpoint must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_prompt_chars: 8_000,
            request_timeout_secs: 120,
            default_confidence: 0.8,
            attach_documents: true,
            ollama_endpoint: formwright_llm::ollama::DEFAULT_ENDPOINT.to_string(),
        }
    }
}
