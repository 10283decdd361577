//! Error types for source resolution

use std::path::PathBuf;
use thiserror::Error;

/// Failure to resolve one source's content
///
/// Never fatal to a run: the aggregator turns it into an inline note.
#[derive(Error, Debug)]
pub enum SourceError {
    /// File could not be read
    #[error("Error reading file {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Extension has no reader
    #[error("Unsupported file type: .{0}")]
    UnsupportedType(String),

    /// Structured file did not parse
    #[error("Invalid {format} in {path}: {message}")]
    Structured {
        /// `json` or `toml`
        format: &'static str,
        /// File path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Network failure fetching a URL
    #[error("Error fetching {url}: {message}")]
    Fetch {
        /// The URL
        url: String,
        /// Error detail
        message: String,
    },

    /// URL fetch did not finish in time
    #[error("Timed out fetching {0}")]
    Timeout(String),
}

/// Result type for source operations
pub type Result<T> = std::result::Result<T, SourceError>;
