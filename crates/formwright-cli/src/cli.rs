//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use formwright_extractor::ProviderKind;
use formwright_llm::TaskKind;
use std::path::PathBuf;

/// Formwright - fill PDF forms from unstructured sources.
#[derive(Debug, Parser)]
#[command(name = "formwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON run report
    Json,
    /// Quiet format (output path only)
    Quiet,
    /// CSV: one row per field with value, confidence and type
    Csv,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract values from sources and fill a form
    Fill(FillArgs),

    /// List the fillable fields of a form
    Fields(FieldsArgs),

    /// List known models, check backend access or pick a model for a task
    Models(ModelsArgs),
}

/// Arguments for the fill command.
#[derive(Debug, Parser)]
pub struct FillArgs {
    /// Target form (looked up under FORMS_DIR when relative and not found)
    #[arg(long)]
    pub form: String,

    /// Sources: text, files, directories, glob patterns or URLs
    #[arg(short, long, num_args = 1.., required = true)]
    pub sources: Vec<String>,

    /// Extraction provider
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model identifier for generative providers
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (falls back to OPENAI_API_KEY / ANTHROPIC_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// OpenAI credential from the environment
    #[arg(long, env = "OPENAI_API_KEY", hide = true, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Anthropic credential from the environment
    #[arg(long, env = "ANTHROPIC_API_KEY", hide = true, hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// Maximum passes, the initial extraction included
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Output path for the filled form
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extract only; do not write a filled form
    #[arg(long)]
    pub no_write: bool,

    /// Also write the JSON run report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Extra file extensions picked up from directories
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub include_extensions: Vec<String>,

    /// Descend into subdirectories of directory sources
    #[arg(short, long)]
    pub recursive: bool,

    /// Abort the run after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl FillArgs {
    /// Credential for `kind`: the flag first, then the provider's variable
    pub fn credential(&self, kind: ProviderKind) -> Option<String> {
        let from_env = match kind {
            ProviderKind::OpenAi => self.openai_api_key.clone(),
            ProviderKind::Anthropic => self.anthropic_api_key.clone(),
            ProviderKind::Pattern | ProviderKind::Ollama => None,
        };
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(from_env)
            .filter(|k| !k.trim().is_empty())
    }
}

/// Arguments for the fields command.
#[derive(Debug, Parser)]
pub struct FieldsArgs {
    /// Target form
    #[arg(long)]
    pub form: String,
}

/// Arguments for the models command.
#[derive(Debug, Parser)]
pub struct ModelsArgs {
    /// Only this provider
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Ask each backend which models it serves
    #[arg(long, conflicts_with = "recommend")]
    pub check: bool,

    /// Rank models for a kind of form work
    #[arg(long, value_enum)]
    pub recommend: Option<TaskArg>,

    /// Favour cheaper models when recommending
    #[arg(long, requires = "recommend")]
    pub budget: bool,

    /// OpenAI credential from the environment
    #[arg(long, env = "OPENAI_API_KEY", hide = true, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Anthropic credential from the environment
    #[arg(long, env = "ANTHROPIC_API_KEY", hide = true, hide_env_values = true)]
    pub anthropic_api_key: Option<String>,
}

impl ModelsArgs {
    /// Credential for `kind` from its environment variable
    pub fn credential(&self, kind: ProviderKind) -> Option<String> {
        let key = match kind {
            ProviderKind::OpenAi => self.openai_api_key.clone(),
            ProviderKind::Anthropic => self.anthropic_api_key.clone(),
            ProviderKind::Pattern | ProviderKind::Ollama => None,
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

/// Task argument for recommendations.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TaskArg {
    /// Court and legal paperwork
    LegalForms,
    /// General document extraction
    DataExtraction,
    /// Short, simple forms
    SimpleForms,
    /// Long or messy documents
    ComplexAnalysis,
}

/// Provider argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProviderArg {
    /// Deterministic pattern rules (no network)
    Pattern,
    /// OpenAI
    Openai,
    /// Anthropic
    Anthropic,
    /// Local Ollama
    Ollama,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
            CliFormat::Csv => crate::config::OutputFormat::Csv,
        }
    }
}

impl From<TaskArg> for TaskKind {
    fn from(task: TaskArg) -> Self {
        match task {
            TaskArg::LegalForms => TaskKind::LegalForms,
            TaskArg::DataExtraction => TaskKind::DataExtraction,
            TaskArg::SimpleForms => TaskKind::SimpleForms,
            TaskArg::ComplexAnalysis => TaskKind::ComplexAnalysis,
        }
    }
}

impl From<ProviderArg> for ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Pattern => ProviderKind::Pattern,
            ProviderArg::Openai => ProviderKind::OpenAi,
            ProviderArg::Anthropic => ProviderKind::Anthropic,
            ProviderArg::Ollama => ProviderKind::Ollama,
        }
    }
}
