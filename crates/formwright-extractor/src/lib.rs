//! Formwright Extractor
//!
//! Extraction strategies that turn a source corpus into field values with
//! per-field confidence.
//!
//! # Architecture
//!
//! ```text
//! SourceCorpus + [FieldSchema] → ExtractionProvider → ExtractionOutcome
//! ```
//!
//! # Strategies
//!
//! - **Pattern**: fixed rule table keyed by semantic category (case
//!   identifiers, phones, emails, dates, amounts, addresses, names,
//!   national identifiers, postal codes), then label phrase search
//! - **Generative**: one prompt to an LLM backend, with native document
//!   attachment, text-only degrade and pattern fallback
//!
//! # Example Usage
//!
//! ```no_run
//! use formwright_domain::{Diagnostics, FieldSchema, SourceCorpus};
//! use formwright_extractor::{build_provider, ExtractorConfig, ProviderKind, ProviderSpec};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = ProviderSpec { kind: ProviderKind::Pattern, ..Default::default() };
//! let provider = build_provider(&spec, &ExtractorConfig::default())?;
//!
//! let corpus = SourceCorpus::from_text("inline text #1", "Case Number: 24STFL00615");
//! let schema = vec![FieldSchema::text("case_number")];
//! let outcome = provider.extract(&corpus, &schema, &Diagnostics::new()).await;
//!
//! println!("quality {:.2}", outcome.quality_score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod generative;
mod parser;
mod pattern;
pub mod patterns;
mod prompt;
mod provider;
mod value_type;


pub use config::ExtractorConfig;
pub use error::{ExtractorError, ResponseParseError};
pub use generative::GenerativeExtractor;
pub use parser::{parse_response, ParsedResponse};
pub use pattern::PatternExtractor;
pub use prompt::PromptBuilder;
pub use provider::{build_backend, build_provider, ExtractionProvider, ProviderKind, ProviderSpec};
pub use value_type::{detect_value_type, ValueType};
