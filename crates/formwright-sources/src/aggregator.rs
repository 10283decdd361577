//! Source aggregator: descriptors in, one corpus out

use crate::config::SourceConfig;
use crate::descriptor::SourceDescriptor;
use crate::error::{Result, SourceError};
use crate::markup::strip_markup;
use crate::readers::read_file;
use formwright_domain::corpus::truncate_origin;
use formwright_domain::{Diagnostics, SourceContent, SourceCorpus};
use tracing::{info, warn};

const COMPONENT: &str = "sources";

/// Builds a [`SourceCorpus`] from an ordered list of sources
///
/// Sources are resolved one at a time. A source that cannot be resolved
/// contributes an inline note instead of failing the run.
pub struct SourceAggregator {
    config: SourceConfig,
    client: reqwest::Client,
}

impl SourceAggregator {
    /// Create an aggregator
    pub fn new(config: SourceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "HTTP client setup failed; using defaults");
                reqwest::Client::new()
            });
        Self { config, client }
    }

    /// Configuration in use
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Resolve every source and concatenate the results
    pub async fn aggregate(
        &self,
        sources: &[SourceDescriptor],
        diagnostics: &Diagnostics,
    ) -> SourceCorpus {
        let mut corpus = SourceCorpus::new();
        let mut inline_count = 0;

        for source in sources {
            if source.is_empty() {
                diagnostics.debug(COMPONENT, "Skipping empty source");
                continue;
            }
            info!(source = %source, "Processing source");

            let origin = match source {
                SourceDescriptor::Text(_) => {
                    inline_count += 1;
                    format!("inline text #{}", inline_count)
                }
                other => truncate_origin(&other.to_string(), self.config.header_max_chars),
            };

            let content = match self.resolve(source).await {
                Ok(content) => content,
                Err(e) => {
                    diagnostics.warn(COMPONENT, e.to_string());
                    SourceContent::Text(degraded_note(source, &e))
                }
            };
            corpus.push(origin, content);
        }

        diagnostics.info(
            COMPONENT,
            format!("Built corpus from {} source(s)", corpus.segments().len()),
        );
        corpus
    }

    /// Resolve a single source
    pub async fn resolve(&self, source: &SourceDescriptor) -> Result<SourceContent> {
        match source {
            SourceDescriptor::Text(text) => Ok(SourceContent::Text(text.clone())),
            SourceDescriptor::File(path) => read_file(path).await,
            SourceDescriptor::Url(url) => {
                // Bounded here as well, whatever the client was built with
                match tokio::time::timeout(self.config.fetch_timeout(), self.fetch(url)).await {
                    Ok(page) => page.map(SourceContent::Text),
                    Err(_) => Err(SourceError::Timeout(url.clone())),
                }
            }
            SourceDescriptor::Empty => Ok(SourceContent::Text(String::new())),
        }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let fetch_error = |e: reqwest::Error| {
            if e.is_timeout() {
                SourceError::Timeout(url.to_string())
            } else {
                SourceError::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?;
        let body = response.text().await.map_err(fetch_error)?;
        Ok(strip_markup(&body))
    }
}

impl Default for SourceAggregator {
    fn default() -> Self {
        Self::new(SourceConfig::default())
    }
}

/// Inline note standing in for a source that could not be resolved
fn degraded_note(source: &SourceDescriptor, error: &SourceError) -> String {
    match (source, error) {
        (_, SourceError::UnsupportedType(_)) => error.to_string(),
        (SourceDescriptor::Url(_), _) => format!("Error extracting from URL: {}", error),
        _ => format!("Error reading file: {}", error),
    }
}
