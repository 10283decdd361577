//! OpenAI chat-completions provider
//!
//! Documents are sent as `file` content parts carrying a base64 data URI,
//! ahead of the text part.

use crate::ollama::build_client;
use crate::{parse_model_ids, status_error, LlmError, LlmProvider, LlmRequest};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Sampling temperature for non-reasoning models
pub const TEMPERATURE: f64 = 0.7;

/// OpenAI API provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider for `model` using `api_key`
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(120)),
        }
    }

    /// Override the API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Reasoning models reject a custom temperature
    fn is_reasoning_model(&self) -> bool {
        self.model.contains("o1") || self.model.contains("o3")
    }

    pub(crate) fn request_body(&self, request: &LlmRequest) -> Value {
        let content = if request.documents.is_empty() {
            Value::String(request.prompt.clone())
        } else {
            let mut parts: Vec<Value> = request
                .documents
                .iter()
                .map(|doc| {
                    json!({
                        "type": "file",
                        "file": {
                            "filename": doc.file_name,
                            "file_data": doc.data_uri(),
                        }
                    })
                })
                .collect();
            parts.push(json!({ "type": "text", "text": request.prompt }));
            Value::Array(parts)
        };

        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": content }],
        });
        if !self.is_reasoning_model() {
            body["temperature"] = json!(TEMPERATURE);
        }
        body
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        debug!(model = %self.model, documents = request.documents.len(), "OpenAI chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, &self.model));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(format!("{}/v1/models", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(status_error(status, &text, &self.model));
        }
        parse_model_ids(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentAttachment;

    #[test]
    fn test_text_only_body() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_MODEL);
        let body = provider.request_body(&LlmRequest::text("extract"));
        assert_eq!(body["model"], "gpt-4-turbo");
        assert_eq!(body["messages"][0]["content"], "extract");
        assert_eq!(body["temperature"], 0.7);
    }

    #[test]
    fn test_document_parts_precede_text() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_MODEL);
        let request =
            LlmRequest::text("extract").with_document(DocumentAttachment::pdf("f.pdf", b"%PDF".to_vec()));
        let body = provider.request_body(&request);
        let parts = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "file");
        assert_eq!(parts[0]["file"]["file_data"], "data:application/pdf;base64,JVBERg==");
        assert_eq!(parts[1]["text"], "extract");
    }

    #[test]
    fn test_reasoning_model_omits_temperature() {
        let provider = OpenAiProvider::new("sk-test", "o3-mini");
        let body = provider.request_body(&LlmRequest::text("x"));
        assert!(body.get("temperature").is_none());
    }
}
