//! Deterministic pattern strategy

use crate::patterns::{apply_rule, phrase_search, rules_for};
use async_trait::async_trait;
use formwright_domain::quality::{extraction_quality, PATTERN_CONFIDENCE, PHRASE_CONFIDENCE};
use formwright_domain::{
    Diagnostics, ExtractionOutcome, FieldMap, FieldOrigin, FieldSchema, FieldValue, SourceCorpus,
};

use crate::provider::ExtractionProvider;

/// Rule-table extractor; always available, no external calls
#[derive(Debug, Clone, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    /// Create a pattern extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract values for `schema` from plain text
    ///
    /// Category rules whose keyword appears in the name or label are tried
    /// first (confidence 0.8); when none matches, a label phrase search
    /// (confidence 0.6). Fields matching
    /// neither are left out.
    pub fn extract_fields(&self, text: &str, schema: &[FieldSchema]) -> FieldMap {
        let mut fields = FieldMap::new();

        for field in schema {
            let categorised = rules_for(field.name.as_str(), &field.alt_label)
                .find_map(|rule| apply_rule(rule, text));
            if let Some(value) = categorised {
                fields.insert(
                    field.name.clone(),
                    FieldValue::new(value, PATTERN_CONFIDENCE, FieldOrigin::Pattern),
                );
                continue;
            }

            let found = field
                .search_labels()
                .iter()
                .find_map(|label| phrase_search(text, label));
            if let Some(value) = found {
                fields.insert(
                    field.name.clone(),
                    FieldValue::new(value, PHRASE_CONFIDENCE, FieldOrigin::Phrase),
                );
            }
        }

        fields
    }

    /// Full outcome for `schema` from plain text
    pub fn outcome(&self, text: &str, schema: &[FieldSchema], provider_id: &str) -> ExtractionOutcome {
        let fields = self.extract_fields(text, schema);
        let quality = extraction_quality(&fields, schema.len());
        ExtractionOutcome::new(fields, quality, provider_id)
    }
}

#[async_trait]
impl ExtractionProvider for PatternExtractor {
    fn id(&self) -> &str {
        "pattern"
    }

    async fn extract(
        &self,
        corpus: &SourceCorpus,
        schema: &[FieldSchema],
        diagnostics: &Diagnostics,
    ) -> ExtractionOutcome {
        let outcome = self.outcome(&corpus.content_text(), schema, self.id());
        diagnostics.info(
            "extractor",
            format!(
                "Pattern extraction filled {}/{} field(s), quality {:.2}",
                outcome.fields.len(),
                schema.len(),
                outcome.quality_score
            ),
        );
        outcome
    }
}
