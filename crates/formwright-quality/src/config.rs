//! Assessor configuration

use formwright_domain::quality::{LOW_CONFIDENCE, RETRY_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Configuration for the quality assessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessorConfig {
    /// Re-scan the corpus for fields missing from the map
    pub rescan_missing: bool,

    /// Try stricter re-extraction for weak fields
    pub repair_low_confidence: bool,

    /// Confidence below which a field is considered weak
    pub low_confidence_threshold: f64,

    /// Overall score below which a retry is suggested
    pub retry_threshold: f64,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            rescan_missing: true,
            repair_low_confidence: true,
            low_confidence_threshold: LOW_CONFIDENCE,
            retry_threshold: RETRY_THRESHOLD,
        }
    }
}

impl AssessorConfig {
    /// Report only: no corrections are proposed
    pub fn report_only() -> Self {
        Self {
            rescan_missing: false,
            repair_low_confidence: false,
            ..Self::default()
        }
    }

    /// Treat more fields as weak and keep refining longer
    pub fn strict() -> Self {
        Self {
            low_confidence_threshold: 0.75,
            retry_threshold: 0.9,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err("low_confidence_threshold must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.retry_threshold) {
            return Err("retry_threshold must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
