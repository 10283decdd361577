//! pdftk-backed schema reader and form writer

use crate::dump::parse_field_dump;
use crate::fdf::render_fdf;
use crate::runner::run;
use crate::PdftkConfig;
use async_trait::async_trait;
use formwright_domain::traits::{FormSchemaReader, FormWriter};
use formwright_domain::{Diagnostics, FieldSchema, SchemaError, WriteError};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

/// Reads field schemas with `dump_data_fields` and fills forms with
/// `fill_form` through a temporary FDF file
#[derive(Debug, Clone, Default)]
pub struct PdftkForm {
    config: PdftkConfig,
}

impl PdftkForm {
    /// Create an adapter with the given configuration
    pub fn new(config: PdftkConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &PdftkConfig {
        &self.config
    }
}

#[async_trait]
impl FormSchemaReader for PdftkForm {
    async fn read_schema(
        &self,
        form: &Path,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<FieldSchema>, SchemaError> {
        if !tokio::fs::try_exists(form).await.unwrap_or(false) {
            return Err(SchemaError::FormNotFound(form.to_path_buf()));
        }

        let output = run(
            &self.config.binary,
            [form.as_os_str(), OsStr::new("dump_data_fields")],
            self.config.timeout(),
        )
        .await?;

        let dump = parse_field_dump(&output)?;
        for warning in &dump.warnings {
            diagnostics.warn("pdftk", format!("{}: {}", form.display(), warning));
        }
        tracing::debug!("{} field(s) in {}", dump.fields.len(), form.display());
        Ok(dump.fields)
    }
}

#[async_trait]
impl FormWriter for PdftkForm {
    async fn write_form(
        &self,
        form: &Path,
        values: &BTreeMap<String, String>,
        destination: &Path,
    ) -> Result<(), WriteError> {
        if !tokio::fs::try_exists(form).await.unwrap_or(false) {
            return Err(WriteError::ToolFailed(format!("Form not found: {}", form.display())));
        }

        // removed when dropped, including on failure
        let mut fdf = tempfile::Builder::new()
            .prefix("formwright-")
            .suffix(".fdf")
            .tempfile()?;
        fdf.write_all(render_fdf(values).as_bytes())?;
        fdf.flush()?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        run(
            &self.config.binary,
            [
                form.as_os_str(),
                OsStr::new("fill_form"),
                fdf.path().as_os_str(),
                OsStr::new("output"),
                destination.as_os_str(),
            ],
            self.config.timeout(),
        )
        .await?;

        tracing::info!("Filled {} -> {}", form.display(), destination.display());
        Ok(())
    }
}
