//! Formwright LLM Provider Layer
//!
//! Pluggable generative backends used by the generative extraction strategy.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration (text only)
//! - `OpenAiProvider`: OpenAI chat completions, with PDF file parts
//! - `AnthropicProvider`: Anthropic messages API, with document blocks
//!
//! # Examples
//!
//! ```
//! use formwright_llm::{LlmProvider, LlmRequest, MockProvider};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete(&LlmRequest::text("test prompt")).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod catalog;
pub mod mock;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use catalog::{known_models, recommend, CostTier, ModelInfo, TaskKind};
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credential rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Backend cannot take document attachments
    #[error("Document attachments not supported by {0}")]
    AttachmentUnsupported(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

/// Map a non-success HTTP status to an error
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str, model: &str) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::Authentication(format!("HTTP {}: {}", status, body)),
        404 => LlmError::ModelNotAvailable(model.to_string()),
        429 => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

/// A binary document sent alongside the prompt
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAttachment {
    /// File name shown to the backend
    pub file_name: String,
    /// MIME type, e.g. `application/pdf`
    pub media_type: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl DocumentAttachment {
    /// PDF attachment
    pub fn pdf(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: "application/pdf".to_string(),
            data,
        }
    }

    /// Standard base64 encoding of the bytes
    pub fn base64_data(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }

    /// `data:` URI form of the attachment
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64_data())
    }
}

/// One completion request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    /// Instruction prompt
    pub prompt: String,
    /// Documents to analyse natively, placed before the prompt
    pub documents: Vec<DocumentAttachment>,
}

impl LlmRequest {
    /// Text-only request
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            documents: Vec::new(),
        }
    }

    /// Attach a document
    pub fn with_document(mut self, document: DocumentAttachment) -> Self {
        self.documents.push(document);
        self
    }

    /// Same prompt with the documents dropped
    pub fn without_documents(&self) -> Self {
        Self::text(self.prompt.clone())
    }
}

/// A generative backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short backend name (`openai`, `anthropic`, `ollama`, `mock`)
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;

    /// Complete a request, returning the raw response text
    async fn complete(&self, request: &LlmRequest) -> Result<String, LlmError>;

    /// Models the backend reports as available to this credential
    ///
    /// Backends without a listing endpoint report only the configured model.
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(vec![self.model().to_string()])
    }
}

#[derive(serde::Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(serde::Deserialize)]
struct ModelEntry {
    id: String,
}

/// Parse a `{"data": [{"id": ...}]}` listing, the shape OpenAI and
/// Anthropic both return
pub(crate) fn parse_model_ids(body: &str) -> Result<Vec<String>, LlmError> {
    let list: ModelList = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;
    let mut ids: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
    ids.sort();
    Ok(ids)
}
