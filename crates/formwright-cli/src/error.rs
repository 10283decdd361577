//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider construction error
    #[error("{0}")]
    Extractor(#[from] formwright_extractor::ExtractorError),

    /// Form schema error
    #[error("{0}")]
    Schema(#[from] formwright_domain::SchemaError),

    /// Refiner setup error
    #[error("{0}")]
    Refine(#[from] formwright_refiner::RefineError),

    /// Run aborted by interrupt or deadline
    #[error("Run cancelled: {0}")]
    Cancelled(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
