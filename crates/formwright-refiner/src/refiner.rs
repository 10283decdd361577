//! Refinement orchestrator

use crate::report::{OutputStatus, RunReport, RunRequest};
use crate::{RefineError, RefinerConfig};
use formwright_domain::quality::extraction_quality;
use formwright_domain::traits::{FormSchemaReader, FormWriter};
use formwright_domain::{
    Diagnostics, FieldMap, FieldSchema, IterationKind, IterationRecord, RunState, SourceCorpus,
};
use formwright_extractor::{detect_value_type, ExtractionProvider, ValueType};
use formwright_quality::{Assessor, QualityAssessor};
use formwright_sources::SourceAggregator;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

const COMPONENT: &str = "refiner";

/// Drives extraction, assessment and correction for one form
///
/// # Examples
///
/// ```no_run
/// use formwright_domain::Diagnostics;
/// use formwright_extractor::PatternExtractor;
/// use formwright_pdftk::PdftkForm;
/// use formwright_refiner::{Refiner, RefinerConfig, RunRequest};
/// use formwright_sources::SourceDescriptor;
/// use std::sync::Arc;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let form = Arc::new(PdftkForm::default());
/// let refiner = Refiner::new(
///     RefinerConfig::default(),
///     form.clone(),
///     form,
///     Box::new(PatternExtractor::new()),
/// )?;
///
/// let request = RunRequest::new(
///     "petition.pdf",
///     vec![SourceDescriptor::File("notes.txt".into())],
/// )
/// .with_output("petition_filled.pdf");
///
/// let report = refiner.run(&request, &Diagnostics::new()).await;
/// println!("{}", report.to_json()?);
/// # Ok(())
/// # }
/// ```
pub struct Refiner {
    config: RefinerConfig,
    schema_reader: Arc<dyn FormSchemaReader>,
    writer: Arc<dyn FormWriter>,
    aggregator: SourceAggregator,
    extractor: Box<dyn ExtractionProvider>,
    assessor: Box<dyn Assessor>,
}

/// Mutable state of one run
struct Run {
    state: RunState,
    fields: FieldMap,
    quality: f64,
    iterations: Vec<IterationRecord>,
}

impl Run {
    fn transition(&mut self, next: RunState) {
        tracing::debug!("{} -> {}", self.state, next);
        self.state = next;
    }
}

impl Refiner {
    /// Create a refiner with the default source aggregator and assessor
    ///
    /// # Errors
    ///
    /// Returns [`RefineError::Config`] if the configuration is invalid.
    pub fn new(
        config: RefinerConfig,
        schema_reader: Arc<dyn FormSchemaReader>,
        writer: Arc<dyn FormWriter>,
        extractor: Box<dyn ExtractionProvider>,
    ) -> Result<Self, RefineError> {
        config.validate().map_err(RefineError::Config)?;
        Ok(Self {
            config,
            schema_reader,
            writer,
            aggregator: SourceAggregator::default(),
            extractor,
            assessor: Box::new(QualityAssessor::default_config()),
        })
    }

    /// Replace the source aggregator
    pub fn with_aggregator(mut self, aggregator: SourceAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Replace the quality assessor
    pub fn with_assessor(mut self, assessor: Box<dyn Assessor>) -> Self {
        self.assessor = assessor;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &RefinerConfig {
        &self.config
    }

    /// Execute one run to a terminal state
    ///
    /// Never returns an error: configuration-class failures end in
    /// [`RunState::Failed`] with the reason in the report, everything else
    /// is absorbed into `diagnostics` and a lower quality score.
    pub async fn run(&self, request: &RunRequest, diagnostics: &Diagnostics) -> RunReport {
        let max_iterations = request.max_iterations.unwrap_or(self.config.max_iterations);
        if max_iterations == 0 {
            let error = RefineError::Config("max_iterations must be at least 1".into());
            return self.fail(request, error, diagnostics);
        }

        let mut run = Run {
            state: RunState::Initializing,
            fields: FieldMap::new(),
            quality: 0.0,
            iterations: Vec::new(),
        };

        tracing::info!("Starting run for {}", request.form.display());
        let (schema, corpus) = match self.initialize(request, diagnostics).await {
            Ok(resolved) => resolved,
            Err(e) => return self.fail(request, e, diagnostics),
        };

        run.transition(RunState::Extracting);
        let outcome = self.extractor.extract(&corpus, &schema, diagnostics).await;
        let provider_id = outcome.provider_id.clone();
        run.fields = outcome.fields;
        run.quality = outcome.quality_score;
        run.iterations.push(IterationRecord {
            iteration: 1,
            kind: IterationKind::InitialExtraction,
            corrections: BTreeMap::new(),
            quality_score: run.quality,
            fields_filled: run.fields.len(),
        });
        diagnostics.info(
            COMPONENT,
            format!(
                "Initial extraction by {}: {}/{} fields, quality {:.2}",
                provider_id,
                run.fields.len(),
                schema.len(),
                run.quality
            ),
        );

        self.refine(&mut run, &schema, &corpus, max_iterations, diagnostics);

        run.transition(RunState::Finalizing);
        let output = self.finalize(request, &run.fields, diagnostics).await;

        run.transition(RunState::Done);
        tracing::info!(
            "Run finished: {}/{} fields, quality {:.2}, {} pass(es)",
            run.fields.len(),
            schema.len(),
            run.quality,
            run.iterations.len()
        );

        let fields = run.fields.values();
        let field_types = value_types(&fields, &schema);

        RunReport {
            success: true,
            state: run.state,
            form: request.form.clone(),
            provider_id,
            fields,
            confidence: run
                .fields
                .confidences()
                .into_iter()
                .map(|(name, c)| (name.as_str().to_string(), c))
                .collect(),
            field_types,
            quality_score: run.quality,
            total_fields: schema.len(),
            filled_fields: run.fields.len(),
            iterations: run.iterations,
            output,
            error: None,
            diagnostics: diagnostics.entries(),
        }
    }

    async fn initialize(
        &self,
        request: &RunRequest,
        diagnostics: &Diagnostics,
    ) -> Result<(Vec<FieldSchema>, SourceCorpus), RefineError> {
        let schema = self
            .schema_reader
            .read_schema(&request.form, diagnostics)
            .await?;
        diagnostics.info(COMPONENT, format!("Found {} form fields", schema.len()));

        let corpus = self.aggregator.aggregate(&request.sources, diagnostics).await;
        Ok((schema, corpus))
    }

    /// Assessment/correction loop, starting at pass 2
    fn refine(
        &self,
        run: &mut Run,
        schema: &[FieldSchema],
        corpus: &SourceCorpus,
        max_iterations: usize,
        diagnostics: &Diagnostics,
    ) {
        for iteration in 2..=max_iterations {
            if run.quality >= self.config.quality_gate {
                diagnostics.info(COMPONENT, format!("Quality threshold met: {:.2}", run.quality));
                return;
            }

            run.transition(RunState::Assessing);
            let assessment = match self.assessor.assess(&run.fields, schema, corpus, diagnostics) {
                Ok(assessment) => assessment,
                Err(e) => {
                    diagnostics.warn(COMPONENT, format!("Assessment failed: {}", e));
                    return;
                }
            };

            if !assessment.has_corrections() || !assessment.should_retry {
                diagnostics.info(COMPONENT, "No quality improvements suggested");
                return;
            }

            run.transition(RunState::Correcting);
            run.fields.merge_corrections(&assessment.corrected_fields, iteration);
            run.quality = extraction_quality(&run.fields, schema.len());
            diagnostics.info(
                COMPONENT,
                format!(
                    "Pass {}: applied {} correction(s), quality {:.2}",
                    iteration,
                    assessment.corrected_fields.len(),
                    run.quality
                ),
            );

            run.iterations.push(IterationRecord {
                iteration,
                kind: IterationKind::QualityImprovement,
                corrections: assessment.corrected_fields,
                quality_score: run.quality,
                fields_filled: run.fields.len(),
            });
        }
    }

    async fn finalize(
        &self,
        request: &RunRequest,
        fields: &FieldMap,
        diagnostics: &Diagnostics,
    ) -> OutputStatus {
        let Some(destination) = request.output.as_deref() else {
            return OutputStatus::NotRequested;
        };
        if fields.is_empty() {
            diagnostics.warn(COMPONENT, "No field values extracted; form not written");
            return OutputStatus::SkippedEmpty;
        }

        match self.write(&request.form, fields, destination).await {
            Ok(()) => {
                diagnostics.info(COMPONENT, format!("Form written: {}", destination.display()));
                OutputStatus::Written {
                    path: destination.to_path_buf(),
                }
            }
            Err(error) => {
                diagnostics.warn(COMPONENT, format!("Failed to write form: {}", error));
                OutputStatus::Failed {
                    path: destination.to_path_buf(),
                    error,
                }
            }
        }
    }

    async fn write(&self, form: &Path, fields: &FieldMap, destination: &Path) -> Result<(), String> {
        self.writer
            .write_form(form, &fields.values(), destination)
            .await
            .map_err(|e| e.to_string())
    }

    fn fail(&self, request: &RunRequest, error: RefineError, diagnostics: &Diagnostics) -> RunReport {
        tracing::error!("Run failed: {}", error);
        let mut report = RunReport::failed(request.form.clone(), error.to_string());
        report.diagnostics = diagnostics.entries();
        report
    }
}

fn value_types(
    fields: &BTreeMap<String, String>,
    schema: &[FieldSchema],
) -> BTreeMap<String, ValueType> {
    fields
        .iter()
        .map(|(name, value)| {
            let entry = schema.iter().find(|f| f.name.as_str() == name);
            (name.clone(), detect_value_type(name, value, entry))
        })
        .collect()
}
