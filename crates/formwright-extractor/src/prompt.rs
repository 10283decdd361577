//! Prompt construction for generative extraction

use formwright_domain::FieldSchema;
use std::collections::BTreeMap;

/// Builds the single instruction prompt for a generative backend
pub struct PromptBuilder<'a> {
    corpus_text: &'a str,
    schema: &'a [FieldSchema],
    max_corpus_chars: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder over the rendered corpus and target fields
    pub fn new(corpus_text: &'a str, schema: &'a [FieldSchema]) -> Self {
        Self {
            corpus_text,
            schema,
            max_corpus_chars: 8_000,
        }
    }

    /// Limit how much of the corpus is embedded
    pub fn with_max_corpus_chars(mut self, max: usize) -> Self {
        self.max_corpus_chars = max;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(TASK_INSTRUCTIONS);
        prompt.push_str("\n\nTARGET FORM FIELDS TO POPULATE:\n");
        prompt.push_str(&self.field_listing());
        prompt.push_str("\n\nCOMPLETED FORM TEXT TO ANALYZE:\n");
        prompt.push_str(truncate_chars(self.corpus_text, self.max_corpus_chars));
        prompt.push_str("\n\n");
        prompt.push_str(EXTRACTION_RULES);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT);

        prompt
    }

    /// Field identifier to label, as pretty JSON
    fn field_listing(&self) -> String {
        let listing: BTreeMap<&str, &str> = self
            .schema
            .iter()
            .map(|f| {
                let label = if f.alt_label.trim().is_empty() {
                    f.name.as_str()
                } else {
                    f.alt_label.as_str()
                };
                (f.name.as_str(), label)
            })
            .collect();
        serde_json::to_string_pretty(&listing).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Prefix of at most `max` characters, cut on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

const TASK_INSTRUCTIONS: &str = "You are extracting data from a COMPLETED form and its supporting \
documents to populate a blank fillable form with the same structure.

TASK: Extract the actual entered values for the target fields from the text below \
(and from any attached document).";

const EXTRACTION_RULES: &str = r#"EXTRACTION RULES:
1. Look for FILLED-IN VALUES, not field labels or instructions
2. Extract actual data entries such as:
   - Names of people and organisations
   - Case numbers (e.g. "24STFL00615")
   - Monetary amounts
   - Account details
   - Addresses and descriptions of assets or debts
   - Dates and other specific client information
3. IGNORE:
   - Form instructions and field labels
   - Empty fields showing "0.00" or blank
   - Template text like "Give details" or "Attach copy"
4. PREFER specific entities (names, case numbers, amounts, addresses) over generic boilerplate"#;

const OUTPUT_FORMAT: &str = r#"RETURN FORMAT (JSON only):
{
  "extracted_data": {
    "field_name": "actual value"
  },
  "confidence_scores": {
    "field_name": 0.95
  }
}

Use the target field identifiers as keys. Omit fields you cannot find."#;
