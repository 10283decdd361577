//! Output formatting for the CLI.

use crate::commands::models::{Access, ProviderStatus};
use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use formwright_domain::{FieldSchema, IterationKind, RunState, Severity};
use formwright_llm::{ModelInfo, TaskKind};
use formwright_refiner::{OutputStatus, RunReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Csv => Ok(report_csv(report)),
            OutputFormat::Quiet => Ok(report
                .output
                .written_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let mut sections = Vec::new();

        let status = match report.state {
            RunState::Done => self.success("Extraction complete"),
            _ => self.error(&format!(
                "Run failed: {}",
                report.error.as_deref().unwrap_or("unknown error")
            )),
        };
        sections.push(status);

        if report.state == RunState::Failed {
            return sections.join("\n");
        }

        let mut summary = Builder::default();
        summary.push_record(["Quality", "Fields", "Provider", "Passes", "Output"]);
        summary.push_record([
            format!("{:.1}%", report.quality_score * 100.0),
            format!("{}/{}", report.filled_fields, report.total_fields),
            report.provider_id.clone(),
            report.iterations.len().to_string(),
            describe_output(&report.output),
        ]);
        sections.push(styled(summary));

        let mut passes = Builder::default();
        passes.push_record(["Pass", "Kind", "Filled", "Quality", "Corrections"]);
        for record in &report.iterations {
            let kind = match record.kind {
                IterationKind::InitialExtraction => "extraction",
                IterationKind::QualityImprovement => "improvement",
            };
            passes.push_record([
                record.iteration.to_string(),
                kind.to_string(),
                record.fields_filled.to_string(),
                format!("{:.1}%", record.quality_score * 100.0),
                record.corrections.len().to_string(),
            ]);
        }
        sections.push(styled(passes));

        if report.fields.is_empty() {
            sections.push(self.warning("No field values found."));
        } else {
            let mut fields = Builder::default();
            fields.push_record(["Field", "Value", "Confidence", "Type"]);
            for (name, value) in &report.fields {
                let confidence = report
                    .confidence
                    .get(name)
                    .map(|c| format!("{:.2}", c))
                    .unwrap_or_else(|| "-".to_string());
                let value_type = report.field_types.get(name).copied().unwrap_or_default();
                fields.push_record([
                    name.as_str(),
                    truncate(value, 60).as_str(),
                    confidence.as_str(),
                    value_type.as_str(),
                ]);
            }
            sections.push(styled(fields));
        }

        for diagnostic in &report.diagnostics {
            if diagnostic.severity == Severity::Warning {
                sections.push(self.warning(&diagnostic.message));
            }
        }

        match &report.output {
            OutputStatus::Written { path } => {
                sections.push(self.success(&format!("Filled form: {}", path.display())))
            }
            OutputStatus::Failed { error, .. } => {
                sections.push(self.error(&format!("Form not written: {}", error)))
            }
            OutputStatus::NotRequested | OutputStatus::SkippedEmpty => {}
        }

        sections.join("\n")
    }

    /// Format a form's field schema.
    pub fn format_fields(&self, fields: &[FieldSchema]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
            OutputFormat::Csv => {
                let mut rows = vec![csv_row(&["name", "type", "label", "options"])];
                for field in fields {
                    rows.push(csv_row(&[
                        field.name.as_str(),
                        field.kind.as_str(),
                        field.alt_label.as_str(),
                        field.choice_options.join("|").as_str(),
                    ]));
                }
                Ok(rows.join("\n"))
            }
            OutputFormat::Quiet => Ok(fields
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if fields.is_empty() {
                    return Ok(self.colorize("No fillable fields found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Name", "Type", "Label", "Options"]);
                for field in fields {
                    builder.push_record([
                        field.name.as_str(),
                        field.kind.as_str(),
                        field.alt_label.as_str(),
                        field.choice_options.join(", ").as_str(),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format catalogued models.
    pub fn format_models(&self, models: &[&ModelInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(models)?),
            OutputFormat::Quiet => Ok(model_ids(models)),
            OutputFormat::Csv => {
                let mut rows = vec![csv_row(&["id", "provider", "context_window", "cost_tier", "documents"])];
                for model in models {
                    let window = model.context_window.to_string();
                    let tier = model.cost_tier.to_string();
                    rows.push(csv_row(&[
                        model.id,
                        model.provider,
                        window.as_str(),
                        tier.as_str(),
                        if model.documents { "true" } else { "false" },
                    ]));
                }
                Ok(rows.join("\n"))
            }
            OutputFormat::Table => {
                if models.is_empty() {
                    return Ok(self.warning("No known models for that provider."));
                }
                Ok(styled(model_table(models)))
            }
        }
    }

    /// Format the top models for `task`, with a usage hint.
    pub fn format_recommendations(&self, task: TaskKind, picks: &[&ModelInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(picks)?),
            OutputFormat::Quiet | OutputFormat::Csv => Ok(model_ids(picks)),
            OutputFormat::Table => {
                let Some(best) = picks.first() else {
                    return Ok(self.warning("No known models for that provider."));
                };
                let sections = [
                    format!("Recommended for {}:", task.as_str()),
                    styled(model_table(picks)),
                    format!(
                        "Use: formwright fill --provider {} --model {} --form <FORM> --sources <SOURCES>",
                        best.provider, best.id
                    ),
                ];
                Ok(sections.join("\n"))
            }
        }
    }

    /// Format backend access checks.
    pub fn format_access(&self, statuses: &[ProviderStatus]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(statuses)?),
            OutputFormat::Quiet => Ok(statuses
                .iter()
                .filter(|s| s.access == Access::Available)
                .map(|s| s.provider.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Csv => {
                let mut rows = vec![csv_row(&["provider", "access", "models", "detail"])];
                for status in statuses {
                    rows.push(csv_row(&[
                        status.provider.as_str(),
                        access_label(&status.access),
                        status.models.join("|").as_str(),
                        status.detail.as_str(),
                    ]));
                }
                Ok(rows.join("\n"))
            }
            OutputFormat::Table => Ok(statuses
                .iter()
                .map(|s| match s.access {
                    Access::Available => self.success(&format!(
                        "{}: {} model(s) available",
                        s.provider,
                        s.models.len()
                    )),
                    Access::MissingKey => self.warning(&format!("{}: {}", s.provider, s.detail)),
                    Access::Unreachable => self.error(&format!("{}: {}", s.provider, s.detail)),
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn model_table(models: &[&ModelInfo]) -> Builder {
    let mut builder = Builder::default();
    builder.push_record(["Model", "Provider", "Context", "Cost", "PDF", "Description"]);
    for model in models {
        builder.push_record([
            model.id.to_string(),
            model.provider.to_string(),
            format!("{}k", model.context_window / 1000),
            model.cost_tier.to_string(),
            if model.documents { "yes" } else { "no" }.to_string(),
            model.description.to_string(),
        ]);
    }
    builder
}

fn model_ids(models: &[&ModelInfo]) -> String {
    models.iter().map(|m| m.id).collect::<Vec<_>>().join("\n")
}

fn access_label(access: &Access) -> &'static str {
    match access {
        Access::Available => "available",
        Access::MissingKey => "missing_key",
        Access::Unreachable => "unreachable",
    }
}

/// One row per extracted field; unscored fields get confidence 0
fn report_csv(report: &RunReport) -> String {
    let mut rows = vec![csv_row(&["field_name", "value", "confidence", "field_type"])];
    for (name, value) in &report.fields {
        let confidence = report.confidence.get(name).copied().unwrap_or(0.0);
        let value_type = report.field_types.get(name).copied().unwrap_or_default();
        let confidence = confidence.to_string();
        rows.push(csv_row(&[name.as_str(), value.as_str(), confidence.as_str(), value_type.as_str()]));
    }
    rows.join("\n")
}

pub(crate) fn csv_row(cells: &[&str]) -> String {
    cells.iter().map(|c| csv_cell(c)).collect::<Vec<_>>().join(",")
}

/// Quote a cell when it holds a delimiter, quote or line break
fn csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn describe_output(output: &OutputStatus) -> String {
    match output {
        OutputStatus::NotRequested => "not requested".to_string(),
        OutputStatus::SkippedEmpty => "skipped (nothing extracted)".to_string(),
        OutputStatus::Written { .. } => "written".to_string(),
        OutputStatus::Failed { .. } => "failed".to_string(),
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
