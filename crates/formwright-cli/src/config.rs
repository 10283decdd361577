//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use formwright_extractor::{ExtractorConfig, ProviderKind};
use formwright_sources::{BaseDirs, SourceConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the Ollama endpoint
pub const OLLAMA_HOST_VAR: &str = "OLLAMA_HOST";

/// CLI configuration, read from `~/.formwright/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for command-line options
    #[serde(default)]
    pub defaults: Defaults,

    /// Base directories for relative locators
    #[serde(default)]
    pub dirs: DirSettings,

    /// Generative backend settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Source fetching settings
    #[serde(default)]
    pub sources: SourceSettings,
}

/// Defaults for command-line options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Extraction provider
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Maximum passes per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

/// Base directories; the FORMS_DIR / DATA_DIR / OUTPUT_DIR variables win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirSettings {
    /// Forms directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forms: Option<PathBuf>,
    /// Data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Generative backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Ollama endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Send PDF sources to capable backends as attachments
    #[serde(default = "default_true")]
    pub attach_documents: bool,
}

/// Source fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Per-URL fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
    /// Comma-separated values
    Csv,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".formwright").join("config.toml"))
    }

    /// Load configuration from `explicit` or the default path.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::load_from(path)
            }
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.defaults.max_iterations == 0 {
            return Err(CliError::Config("defaults.max_iterations must be at least 1".into()));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(CliError::Config("llm.request_timeout_secs must be > 0".into()));
        }
        if self.sources.fetch_timeout_secs == 0 {
            return Err(CliError::Config("sources.fetch_timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    /// Base directories: environment first, then `[dirs]`.
    pub fn base_dirs(&self) -> BaseDirs {
        BaseDirs::from_env().or(BaseDirs {
            forms: self.dirs.forms.clone(),
            data: self.dirs.data.clone(),
            output: self.dirs.output.clone(),
        })
    }

    /// Extractor configuration; `OLLAMA_HOST` overrides the endpoint.
    pub fn extractor_config(&self) -> ExtractorConfig {
        let defaults = ExtractorConfig::default();
        let endpoint = std::env::var(OLLAMA_HOST_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.llm.ollama_endpoint.clone())
            .unwrap_or(defaults.ollama_endpoint.clone());

        ExtractorConfig {
            request_timeout_secs: self.llm.request_timeout_secs,
            attach_documents: self.llm.attach_documents,
            ollama_endpoint: endpoint,
            ..defaults
        }
    }

    /// Source aggregator configuration.
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            fetch_timeout_secs: self.sources.fetch_timeout_secs,
            ..SourceConfig::default()
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Pattern,
            model: None,
            max_iterations: default_max_iterations(),
            format: default_format(),
            color: true,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            ollama_endpoint: None,
            request_timeout_secs: default_request_timeout(),
            attach_documents: true,
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_max_iterations() -> usize {
    3
}

fn default_request_timeout() -> u64 {
    120
}

fn default_fetch_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.provider, ProviderKind::Pattern);
        assert_eq!(config.defaults.max_iterations, 3);
        assert_eq!(config.defaults.format, OutputFormat::Table);
        assert!(config.defaults.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[defaults]
provider = "anthropic"
max_iterations = 5
format = "json"

[dirs]
forms = "/srv/forms"

[llm]
request_timeout_secs = 60

[sources]
fetch_timeout_secs = 10
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.defaults.provider, ProviderKind::Anthropic);
        assert_eq!(config.defaults.max_iterations, 5);
        assert_eq!(config.defaults.format, OutputFormat::Json);
        assert_eq!(config.dirs.forms, Some(PathBuf::from("/srv/forms")));
        assert_eq!(config.extractor_config().request_timeout_secs, 60);
        assert!(config.extractor_config().attach_documents);
        assert_eq!(config.source_config().fetch_timeout_secs, 10);
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/formwright.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\nmax_iterations = 0\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
