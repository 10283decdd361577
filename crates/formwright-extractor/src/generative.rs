//! Generative-model strategy
//!
//! One prompt per extraction. Binary documents referenced by the corpus are
//! attached natively when possible; an attachment failure degrades to a
//! text-only call, and a transport failure falls back to the pattern
//! strategy. An unusable response yields an empty outcome.

use crate::config::ExtractorConfig;
use crate::parser::{parse_response, ParsedResponse};
use crate::pattern::PatternExtractor;
use crate::prompt::PromptBuilder;
use crate::provider::ExtractionProvider;
use async_trait::async_trait;
use formwright_domain::quality::extraction_quality;
use formwright_domain::{
    Diagnostics, ExtractionOutcome, FieldMap, FieldName, FieldOrigin, FieldSchema, FieldValue,
    SourceCorpus,
};
use formwright_llm::{DocumentAttachment, LlmError, LlmProvider, LlmRequest};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "extractor";

/// Extractor backed by a generative model
pub struct GenerativeExtractor {
    llm: Arc<dyn LlmProvider>,
    config: ExtractorConfig,
    id: String,
    fallback: PatternExtractor,
}

impl GenerativeExtractor {
    /// Wrap a backend
    pub fn new(llm: Arc<dyn LlmProvider>, config: ExtractorConfig) -> Self {
        let id = format!("{}:{}", llm.name(), llm.model());
        Self {
            llm,
            config,
            id,
            fallback: PatternExtractor::new(),
        }
    }

    /// Read the corpus's binary documents; empty when any cannot be read
    async fn load_attachments(
        &self,
        corpus: &SourceCorpus,
        diagnostics: &Diagnostics,
    ) -> Vec<DocumentAttachment> {
        let mut attachments = Vec::new();
        for path in corpus.binary_refs() {
            match tokio::fs::read(path).await {
                Ok(data) => {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "document.pdf".to_string());
                    attachments.push(DocumentAttachment::pdf(file_name, data));
                }
                Err(e) => {
                    diagnostics.warn(
                        COMPONENT,
                        format!(
                            "Could not read {} for attachment ({}); sending text only",
                            path.display(),
                            e
                        ),
                    );
                    return Vec::new();
                }
            }
        }
        attachments
    }

    /// One backend call bounded by the request timeout
    async fn call(&self, request: &LlmRequest) -> Result<String, LlmError> {
        match tokio::time::timeout(self.config.request_timeout(), self.llm.complete(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout),
        }
    }

    /// Submit with attachments, degrading to text-only on failure
    async fn submit(
        &self,
        request: LlmRequest,
        diagnostics: &Diagnostics,
    ) -> Result<String, LlmError> {
        if !request.documents.is_empty() {
            match self.call(&request).await {
                Ok(response) => return Ok(response),
                Err(e) => diagnostics.warn(
                    COMPONENT,
                    format!("Document attachment failed ({}); retrying text only", e),
                ),
            }
        }
        self.call(&request.without_documents()).await
    }

    /// Typed field map from a parsed response, restricted to schema fields
    fn outcome_from(
        &self,
        parsed: ParsedResponse,
        schema: &[FieldSchema],
        diagnostics: &Diagnostics,
    ) -> ExtractionOutcome {
        let known: BTreeSet<&str> = schema.iter().map(|f| f.name.as_str()).collect();
        let origin = FieldOrigin::Generative {
            provider: self.id.clone(),
        };

        let mut fields = FieldMap::new();
        for (name, value) in parsed.values {
            if !known.is_empty() && !known.contains(name.as_str()) {
                diagnostics.debug(COMPONENT, format!("Ignoring unknown field '{}'", name));
                continue;
            }
            let record = match parsed.confidence.get(&name) {
                Some(&c) => FieldValue::new(value, c, origin.clone()),
                None => FieldValue::unscored(value, origin.clone()),
            };
            fields.insert(FieldName::new(name), record);
        }

        let quality = extraction_quality(&fields, schema.len());
        ExtractionOutcome::new(fields, quality, self.id.clone())
    }
}

#[async_trait]
impl ExtractionProvider for GenerativeExtractor {
    fn id(&self) -> &str {
        &self.id
    }

    async fn extract(
        &self,
        corpus: &SourceCorpus,
        schema: &[FieldSchema],
        diagnostics: &Diagnostics,
    ) -> ExtractionOutcome {
        let text = corpus.text();
        let prompt = PromptBuilder::new(&text, schema)
            .with_max_corpus_chars(self.config.max_prompt_chars)
            .build();

        let mut request = LlmRequest::text(prompt);
        if self.config.attach_documents {
            request.documents = self.load_attachments(corpus, diagnostics).await;
        }
        debug!(provider = %self.id, documents = request.documents.len(), "Submitting extraction prompt");

        let response = match self.submit(request, diagnostics).await {
            Ok(response) => response,
            Err(e) => {
                diagnostics.warn(
                    COMPONENT,
                    format!("{} failed ({}); falling back to pattern extraction", self.id, e),
                );
                let fallback_id = format!("{}->{}", self.id, self.fallback.id());
                return self.fallback.outcome(&corpus.content_text(), schema, &fallback_id);
            }
        };

        match parse_response(&response, self.config.default_confidence) {
            Ok(parsed) => {
                let outcome = self.outcome_from(parsed, schema, diagnostics);
                diagnostics.info(
                    COMPONENT,
                    format!(
                        "{} filled {}/{} field(s), quality {:.2}",
                        self.id,
                        outcome.fields.len(),
                        schema.len(),
                        outcome.quality_score
                    ),
                );
                outcome
            }
            Err(e) => {
                diagnostics.warn(
                    COMPONENT,
                    format!("Unusable response from {} ({}); treating as empty", self.id, e),
                );
                ExtractionOutcome::empty(self.id.clone())
            }
        }
    }
}
