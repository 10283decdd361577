//! Source aggregator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the source aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Per-URL fetch timeout in seconds
    pub fetch_timeout_secs: u64,

    /// Maximum characters of a path or URL shown in a segment header
    pub header_max_chars: usize,

    /// User agent sent with page fetches
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            header_max_chars: 50,
            user_agent: format!("formwright/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SourceConfig {
    /// Per-URL fetch timeout
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be > 0".to_string());
        }
        if self.header_max_chars == 0 {
            return Err("header_max_chars must be > 0".to_string());
        }
        Ok(())
    }

    /// Load from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
