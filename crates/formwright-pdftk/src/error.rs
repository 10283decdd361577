//! Errors from running pdftk

use formwright_domain::{SchemaError, WriteError};
use std::path::PathBuf;
use thiserror::Error;

/// Shown whenever pdftk cannot be found
pub const INSTALL_HINT: &str = "Please install pdftk:\n  \
    macOS: brew install pdftk-java\n  \
    Ubuntu: sudo apt install pdftk\n  \
    Windows: download from pdftk.org";

/// Failure of a single pdftk invocation
#[derive(Error, Debug)]
pub enum PdftkError {
    /// The binary could not be found
    #[error("pdftk not found at {0}")]
    NotInstalled(PathBuf),

    /// The process could not be started or awaited
    #[error("Failed to run pdftk: {0}")]
    Spawn(#[from] std::io::Error),

    /// pdftk exited unsuccessfully
    #[error("pdftk exited with status {status}: {stderr}")]
    Failed {
        /// Exit code, -1 when killed by a signal
        status: i32,
        /// Captured standard error
        stderr: String,
    },

    /// pdftk did not finish in time
    #[error("pdftk timed out after {0}s")]
    Timeout(u64),
}

impl From<PdftkError> for SchemaError {
    fn from(err: PdftkError) -> Self {
        match err {
            PdftkError::NotInstalled(_) => SchemaError::ToolUnavailable {
                tool: "pdftk".to_string(),
                hint: INSTALL_HINT.to_string(),
            },
            PdftkError::Spawn(e) => SchemaError::Io(e),
            PdftkError::Failed { stderr, .. } => SchemaError::Malformed(stderr),
            PdftkError::Timeout(secs) => SchemaError::Timeout(secs),
        }
    }
}

impl From<PdftkError> for WriteError {
    fn from(err: PdftkError) -> Self {
        match err {
            PdftkError::NotInstalled(_) => WriteError::ToolUnavailable {
                tool: "pdftk".to_string(),
                hint: INSTALL_HINT.to_string(),
            },
            PdftkError::Spawn(e) => WriteError::Io(e),
            failed @ PdftkError::Failed { .. } => WriteError::ToolFailed(failed.to_string()),
            PdftkError::Timeout(secs) => WriteError::Timeout(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_distinct_from_malformed_form() {
        let missing: SchemaError = PdftkError::NotInstalled(PathBuf::from("pdftk")).into();
        assert!(matches!(missing, SchemaError::ToolUnavailable { .. }));
        assert!(missing.to_string().contains("brew install pdftk-java"));

        let malformed: SchemaError = PdftkError::Failed {
            status: 1,
            stderr: "Error: Unexpected Exception in open_reader()".into(),
        }
        .into();
        assert!(matches!(malformed, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_write_failure_keeps_stderr() {
        let err: WriteError = PdftkError::Failed {
            status: 1,
            stderr: "Error: Failed to open form data file".into(),
        }
        .into();
        assert!(err.to_string().contains("Failed to open form data file"));
    }
}
