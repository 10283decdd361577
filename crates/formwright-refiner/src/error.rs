//! Error types for refinement runs

use formwright_domain::SchemaError;
use thiserror::Error;

/// Errors that abort a run before extraction starts
#[derive(Error, Debug)]
pub enum RefineError {
    /// Target schema could not be obtained
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
