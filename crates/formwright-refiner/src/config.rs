//! Refiner configuration

use formwright_domain::quality::QUALITY_GATE;
use serde::{Deserialize, Serialize};

/// Configuration for the refinement loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerConfig {
    /// Upper bound on passes, the initial extraction included
    pub max_iterations: usize,

    /// Quality at or above which no further pass is attempted
    pub quality_gate: f64,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            quality_gate: QUALITY_GATE,
        }
    }
}

impl RefinerConfig {
    /// Single extraction pass, no refinement
    pub fn single_pass() -> Self {
        Self {
            max_iterations: 1,
            ..Self::default()
        }
    }

    /// Override the iteration bound
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.quality_gate) {
            return Err("quality_gate must be between 0.0 and 1.0".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RefinerConfig::default();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.quality_gate, 0.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = RefinerConfig::default().with_max_iterations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RefinerConfig::from_toml("max_iterations = 5").unwrap();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.quality_gate, 0.9);
    }
}
