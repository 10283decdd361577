//! Formwright Quality Assessor
//!
//! Judges a field map against the form schema and the source corpus:
//!
//! - Completion and confidence statistics
//! - Targeted re-scan of the corpus for fields that are still missing
//! - Stricter re-extraction for low-confidence fields (pluggable heuristics)
//! - A completion-adjusted overall score and a retry verdict
//!
//! The assessor never mutates its inputs; proposed values are returned as
//! corrections for the refiner to merge.

#![warn(missing_docs)]

pub mod assessor;
pub mod config;
pub mod error;
pub mod repair;
pub mod rescan;

pub use assessor::{Assessor, QualityAssessor};
pub use config::AssessorConfig;
pub use error::QualityError;
pub use repair::{FieldRepairer, LegalFormRepairer};
