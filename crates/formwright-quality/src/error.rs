//! Quality assessor error types

use thiserror::Error;

/// Errors that prevent an assessment from running
#[derive(Error, Debug, PartialEq)]
pub enum QualityError {
    /// A field carries a confidence that is not a number in [0, 1]
    #[error("Invalid confidence for field '{field}': {value}")]
    InvalidConfidence {
        /// Field name
        field: String,
        /// Offending value
        value: f64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
