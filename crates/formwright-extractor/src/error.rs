//! Error types for the Extractor

use thiserror::Error;

/// Errors raised while setting up extraction
///
/// Extraction itself never fails: per-call problems degrade the outcome.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Provider needs a credential that was not supplied
    #[error("Missing API key for provider '{0}' (pass --api-key or set {1})")]
    MissingCredential(String, String),

    /// Unknown provider selector
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a generative response could not be used
#[derive(Error, Debug, PartialEq)]
pub enum ResponseParseError {
    /// No `{ ... }` span in the response
    #[error("No JSON object found in response")]
    NoJson,

    /// The span did not decode
    #[error("JSON parse error: {0}")]
    InvalidJson(String),

    /// Decoded, but not the expected shape
    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

impl From<serde_json::Error> for ResponseParseError {
    fn from(e: serde_json::Error) -> Self {
        ResponseParseError::InvalidJson(e.to_string())
    }
}
