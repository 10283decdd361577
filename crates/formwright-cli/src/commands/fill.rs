//! Fill command implementation.

use crate::cli::FillArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use formwright_domain::Diagnostics;
use formwright_extractor::{build_provider, ExtractionProvider, ProviderKind, ProviderSpec};
use formwright_pdftk::PdftkForm;
use formwright_refiner::{Refiner, RefinerConfig, RunReport, RunRequest};
use formwright_sources::{ExpandOptions, LocatorResolver, SourceAggregator};
use std::fs;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Everything checked before any extraction work starts
#[derive(Debug)]
pub struct Preflight {
    /// Selected provider
    pub kind: ProviderKind,
    /// Iteration bound
    pub max_iterations: usize,
    /// Provider spec handed to the factory
    pub spec: ProviderSpec,
}

/// Validate provider selection, credentials and the iteration bound.
pub fn preflight(args: &FillArgs, config: &Config) -> Result<Preflight> {
    let kind = args.provider.map(Into::into).unwrap_or(config.defaults.provider);

    let max_iterations = args.max_iterations.unwrap_or(config.defaults.max_iterations);
    if max_iterations == 0 {
        return Err(CliError::InvalidInput("--max-iterations must be at least 1".into()));
    }

    let api_key = args.credential(kind);
    if kind.requires_api_key() && api_key.is_none() {
        return Err(CliError::Config(format!(
            "Missing API key for {}: pass --api-key or set {}",
            kind,
            kind.api_key_var().unwrap_or_default()
        )));
    }

    let model = args.model.clone().or_else(|| config.defaults.model.clone());
    Ok(Preflight {
        kind,
        max_iterations,
        spec: ProviderSpec { kind, model, api_key },
    })
}

/// Execute the fill command and return the run report.
pub async fn execute_fill(args: FillArgs, config: &Config, formatter: &Formatter) -> Result<RunReport> {
    let checked = preflight(&args, config)?;
    let extractor: Box<dyn ExtractionProvider> = build_provider(&checked.spec, &config.extractor_config())?;

    let resolver = LocatorResolver::new(
        config.base_dirs(),
        ExpandOptions {
            recursive: args.recursive,
            include_extensions: args.include_extensions.clone(),
        },
    );
    let form = resolver
        .resolve_form(&args.form)
        .ok_or_else(|| CliError::Config(format!("Form not found: {}", args.form)))?;

    let diagnostics = Diagnostics::new();
    let sources = resolver.resolve_sources(&args.sources, &diagnostics);
    tracing::info!("{} source(s) resolved for {}", sources.len(), form.display());

    let mut request = RunRequest::new(form.clone(), sources).with_max_iterations(checked.max_iterations);
    if !args.no_write {
        request = request.with_output(resolver.output_destination(&form, args.output.as_deref()));
    }

    let pdftk = Arc::new(PdftkForm::default());
    let refiner = Refiner::new(
        RefinerConfig::default().with_max_iterations(checked.max_iterations),
        pdftk.clone(),
        pdftk,
        extractor,
    )?
    .with_aggregator(SourceAggregator::new(config.source_config()));

    let report = tokio::select! {
        report = with_deadline(refiner.run(&request, &diagnostics), args.timeout_secs) => report?,
        _ = tokio::signal::ctrl_c() => {
            return Err(CliError::Cancelled("interrupted".into()));
        }
    };

    if let Some(path) = &args.report {
        fs::write(path, report.to_json()?)?;
    }

    let rendered = formatter.format_report(&report)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(report)
}

/// Await `run`, bounded by `timeout_secs` when given.
async fn with_deadline<F>(run: F, timeout_secs: Option<u64>) -> Result<RunReport>
where
    F: Future<Output = RunReport>,
{
    match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), run)
            .await
            .map_err(|_| CliError::Cancelled(format!("timed out after {}s", secs))),
        None => Ok(run.await),
    }
}
