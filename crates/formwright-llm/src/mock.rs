//! Mock provider for deterministic testing

use crate::{LlmError, LlmProvider, LlmRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Result<String, LlmError>>,
    requests: Vec<LlmRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns scripted responses in order, then the default response. No
/// network calls are made. Clones share state, so a test can keep a handle
/// while the extractor owns another.
///
/// # Examples
///
/// ```
/// use formwright_llm::{LlmError, LlmProvider, LlmRequest, MockProvider};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let provider = MockProvider::new("fallback");
/// provider.push_error(LlmError::RateLimitExceeded);
/// provider.push_response("first");
///
/// let req = LlmRequest::text("prompt");
/// assert!(provider.complete(&req).await.is_err());
/// assert_eq!(provider.complete(&req).await.unwrap(), "first");
/// assert_eq!(provider.complete(&req).await.unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    reject_attachments: bool,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            reject_attachments: false,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Reject any request carrying documents with `AttachmentUnsupported`
    pub fn rejecting_attachments(mut self) -> Self {
        self.reject_attachments = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Queue a response for the next call
    pub fn push_response(&self, response: impl Into<String>) {
        self.state().script.push_back(Ok(response.into()));
    }

    /// Queue an error for the next call
    pub fn push_error(&self, error: LlmError) {
        self.state().script.push_back(Err(error));
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        self.state().requests.len()
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.state().requests.clone()
    }

    /// Clear recorded requests
    pub fn reset_call_count(&self) {
        self.state().requests.clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let mut state = self.state();
        state.requests.push(request.clone());

        if self.reject_attachments && !request.documents.is_empty() {
            return Err(LlmError::AttachmentUnsupported("mock".to_string()));
        }

        match state.script.pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentAttachment;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&LlmRequest::text("any prompt")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_script_order() {
        let provider = MockProvider::default();
        provider.push_response("one");
        provider.push_response("two");

        let req = LlmRequest::text("p");
        assert_eq!(provider.complete(&req).await.unwrap(), "one");
        assert_eq!(provider.complete(&req).await.unwrap(), "two");
        assert_eq!(provider.complete(&req).await.unwrap(), "Default mock response");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&LlmRequest::text("a")).await.unwrap();
        provider.complete(&LlmRequest::text("b")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].prompt, "b");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_rejects_attachments() {
        let provider = MockProvider::new("ok").rejecting_attachments();
        let with_doc =
            LlmRequest::text("p").with_document(DocumentAttachment::pdf("a.pdf", vec![0]));

        let result = provider.complete(&with_doc).await;
        assert!(matches!(result, Err(LlmError::AttachmentUnsupported(_))));
        assert_eq!(provider.complete(&with_doc.without_documents()).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&LlmRequest::text("x")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
