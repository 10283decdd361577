//! Formwright Domain Layer
//!
//! Core vocabulary of the form-filling pipeline: target field schemas, the
//! typed field-value map, the aggregated source corpus, extraction outcomes,
//! quality assessments and the iteration audit trail.
//!
//! ## Key Concepts
//!
//! - **Field map**: field name to value record (value, confidence, origin);
//!   keys are only ever added or overwritten
//! - **Corpus**: ordered source segments, text or binary references
//! - **Quality score**: weighted completion/confidence aggregate in [0, 1]
//! - **Diagnostics**: run-scoped sink for absorbed failures
//!
//! Infrastructure (form tool, model backends, source readers) lives in other
//! crates behind the traits in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assessment;
pub mod corpus;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod iteration;
pub mod outcome;
pub mod quality;
pub mod traits;

// Re-exports for convenience
pub use assessment::QualityAssessment;
pub use corpus::{BinaryRendering, CorpusSegment, SourceContent, SourceCorpus};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{SchemaError, WriteError};
pub use field::{FieldKind, FieldMap, FieldName, FieldOrigin, FieldSchema, FieldValue};
pub use iteration::{IterationKind, IterationRecord, RunState};
pub use outcome::ExtractionOutcome;
pub use traits::{FormSchemaReader, FormWriter};
