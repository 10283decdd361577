//! pdftk adapter configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the pdftk adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdftkConfig {
    /// pdftk executable, looked up on `PATH` when not absolute
    pub binary: PathBuf,

    /// Per-invocation timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PdftkConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("pdftk"),
            timeout_secs: 60,
        }
    }
}

impl PdftkConfig {
    /// Per-invocation timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.binary.as_os_str().is_empty() {
            return Err("binary must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be > 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
