//! Models command implementation.

use crate::cli::ModelsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use formwright_extractor::{build_backend, ExtractorError, ProviderKind, ProviderSpec};
use formwright_llm::{known_models, recommend, TaskKind};
use serde::Serialize;
use std::time::Duration;

/// How long one backend gets to answer a model listing
const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of recommendations shown
const TOP_PICKS: usize = 3;

const GENERATIVE: [ProviderKind; 3] = [
    ProviderKind::OpenAi,
    ProviderKind::Anthropic,
    ProviderKind::Ollama,
];

/// Outcome of asking one backend for its models
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Answered with a model list
    Available,
    /// No credential configured
    MissingKey,
    /// Request failed or timed out
    Unreachable,
}

/// Access check result for one provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    /// Provider name
    pub provider: ProviderKind,
    /// Outcome
    pub access: Access,
    /// Error text or the missing variable
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    /// Served models, when available
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
}

/// Execute the models command.
pub async fn execute_models(args: ModelsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let only: Option<ProviderKind> = args.provider.map(Into::into);

    if args.check {
        let statuses = check_access(&args, config, only).await;
        println!("{}", formatter.format_access(&statuses)?);
        return Ok(());
    }

    let candidates = known_models(only.map(|k| k.as_str()));
    match args.recommend {
        Some(task) => {
            let task = TaskKind::from(task);
            let picks: Vec<_> = recommend(task, args.budget, &candidates)
                .into_iter()
                .take(TOP_PICKS)
                .collect();
            println!("{}", formatter.format_recommendations(task, &picks)?);
        }
        None => println!("{}", formatter.format_models(&candidates)?),
    }
    Ok(())
}

/// Ask every generative backend (or just `only`) which models it serves.
///
/// Providers without a credential are reported, not contacted.
pub async fn check_access(
    args: &ModelsArgs,
    config: &Config,
    only: Option<ProviderKind>,
) -> Vec<ProviderStatus> {
    let extractor_config = config.extractor_config();
    let mut statuses = Vec::new();

    for kind in GENERATIVE.into_iter().filter(|k| only.is_none_or(|o| o == *k)) {
        let spec = ProviderSpec {
            kind,
            model: None,
            api_key: args.credential(kind),
        };
        let status = match build_backend(&spec, &extractor_config) {
            Ok(Some(llm)) => match tokio::time::timeout(CHECK_TIMEOUT, llm.list_models()).await {
                Ok(Ok(models)) => status(kind, Access::Available, String::new(), models),
                Ok(Err(e)) => status(kind, Access::Unreachable, e.to_string(), Vec::new()),
                Err(_) => status(
                    kind,
                    Access::Unreachable,
                    format!("no answer within {}s", CHECK_TIMEOUT.as_secs()),
                    Vec::new(),
                ),
            },
            Ok(None) => continue,
            Err(ExtractorError::MissingCredential(_, var)) => {
                status(kind, Access::MissingKey, format!("{} not set", var), Vec::new())
            }
            Err(e) => status(kind, Access::Unreachable, e.to_string(), Vec::new()),
        };
        tracing::debug!(provider = %kind, access = ?status.access, "Checked backend");
        statuses.push(status);
    }
    statuses
}

fn status(provider: ProviderKind, access: Access, detail: String, models: Vec<String>) -> ProviderStatus {
    ProviderStatus {
        provider,
        access,
        detail,
        models,
    }
}
