//! Errors at the form-tool adapter boundary

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a target form's field schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The external form-reading tool is not installed
    #[error("{tool} is not available. {hint}")]
    ToolUnavailable {
        /// Tool name
        tool: String,
        /// Installation hint for the user
        hint: String,
    },

    /// The target form does not exist
    #[error("Form not found: {0}")]
    FormNotFound(PathBuf),

    /// The form or the tool's description of it could not be understood
    #[error("Malformed form: {0}")]
    Malformed(String),

    /// The tool did not answer in time
    #[error("Schema read timed out after {0}s")]
    Timeout(u64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to write a populated copy of the form
#[derive(Error, Debug)]
pub enum WriteError {
    /// The external form-writing tool is not installed
    #[error("{tool} is not available. {hint}")]
    ToolUnavailable {
        /// Tool name
        tool: String,
        /// Installation hint for the user
        hint: String,
    },

    /// The tool ran but reported failure
    #[error("Form write failed: {0}")]
    ToolFailed(String),

    /// The tool did not finish in time
    #[error("Form write timed out after {0}s")]
    Timeout(u64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
