//! Fields command implementation.

use crate::cli::FieldsArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use formwright_domain::traits::FormSchemaReader;
use formwright_domain::Diagnostics;
use formwright_pdftk::PdftkForm;
use formwright_sources::{ExpandOptions, LocatorResolver};

/// Execute the fields command.
pub async fn execute_fields(args: FieldsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let resolver = LocatorResolver::new(config.base_dirs(), ExpandOptions::default());
    let form = resolver
        .resolve_form(&args.form)
        .ok_or_else(|| CliError::Config(format!("Form not found: {}", args.form)))?;

    let diagnostics = Diagnostics::new();
    let fields = PdftkForm::default().read_schema(&form, &diagnostics).await?;
    println!("{}", formatter.format_fields(&fields)?);
    for warning in diagnostics.warnings() {
        eprintln!("{}", formatter.warning(&warning.message));
    }
    Ok(())
}
