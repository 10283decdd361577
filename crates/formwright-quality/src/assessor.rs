//! Quality assessment of a field map

use crate::config::AssessorConfig;
use crate::repair::{FieldRepairer, LegalFormRepairer};
use crate::rescan::find_missing;
use crate::QualityError;
use formwright_domain::quality::{assessment_score, mean};
use formwright_domain::{Diagnostics, FieldMap, FieldSchema, QualityAssessment, SourceCorpus};

const COMPONENT: &str = "assessor";

/// Judges a field map against the schema and the source corpus
pub trait Assessor: Send + Sync {
    /// Produce a fresh assessment; the inputs are never modified
    fn assess(
        &self,
        fields: &FieldMap,
        schema: &[FieldSchema],
        corpus: &SourceCorpus,
        diagnostics: &Diagnostics,
    ) -> Result<QualityAssessment, QualityError>;
}

/// The default assessor: missing-field re-scan plus low-confidence repair
pub struct QualityAssessor<R: FieldRepairer = LegalFormRepairer> {
    config: AssessorConfig,
    repairer: R,
}

impl QualityAssessor<LegalFormRepairer> {
    /// Create an assessor with the legal-form heuristics
    pub fn new(config: AssessorConfig) -> Self {
        Self {
            config,
            repairer: LegalFormRepairer,
        }
    }

    /// Default configuration
    pub fn default_config() -> Self {
        Self::new(AssessorConfig::default())
    }
}

impl<R: FieldRepairer> QualityAssessor<R> {
    /// Create an assessor with a custom repairer
    pub fn with_repairer(config: AssessorConfig, repairer: R) -> Self {
        Self { config, repairer }
    }

    /// Get the configuration
    pub fn config(&self) -> &AssessorConfig {
        &self.config
    }
}

impl<R: FieldRepairer> Assessor for QualityAssessor<R> {
    fn assess(
        &self,
        fields: &FieldMap,
        schema: &[FieldSchema],
        corpus: &SourceCorpus,
        diagnostics: &Diagnostics,
    ) -> Result<QualityAssessment, QualityError> {
        self.config.validate().map_err(QualityError::Config)?;

        let confidences = fields.confidences();
        for (name, &value) in &confidences {
            if !(0.0..=1.0).contains(&value) {
                return Err(QualityError::InvalidConfidence {
                    field: name.to_string(),
                    value,
                });
            }
        }

        let total = schema.len();
        let filled = fields.len();
        let completion_rate = if total == 0 {
            0.0
        } else {
            (filled as f64 / total as f64).min(1.0)
        };
        let values: Vec<f64> = confidences.values().copied().collect();
        let confidence_average = mean(&values);

        let mut assessment = QualityAssessment {
            completion_rate,
            confidence_average,
            ..Default::default()
        };
        let text = corpus.content_text();

        let mut recovered = 0;
        for field in schema.iter().filter(|f| !fields.contains(&f.name)) {
            let found = if self.config.rescan_missing {
                find_missing(field, &text)
            } else {
                None
            };
            match found {
                Some(value) => {
                    assessment
                        .recommendations
                        .push(format!("Found missing field '{}': {}", field.name, value));
                    assessment.corrected_fields.insert(field.name.clone(), value);
                    recovered += 1;
                }
                None => {
                    assessment
                        .issues
                        .push(format!("Missing required field: {}", field.name));
                }
            }
        }

        for (name, &confidence) in &confidences {
            if confidence >= self.config.low_confidence_threshold {
                continue;
            }
            assessment
                .issues
                .push(format!("Low confidence for field '{}': {:.2}", name, confidence));

            if !self.config.repair_low_confidence {
                continue;
            }
            let Some(improved) = self.repairer.repair(name, &text) else {
                continue;
            };
            if fields.value_of(name.as_str()) != Some(improved.as_str()) {
                assessment
                    .recommendations
                    .push(format!("Improved field '{}': {}", name, improved));
                assessment.corrected_fields.insert(name.clone(), improved);
            }
        }

        assessment.overall_score = assessment_score(total, filled, recovered, confidence_average);
        assessment.should_retry =
            assessment.overall_score < self.config.retry_threshold && assessment.has_corrections();

        diagnostics.debug(
            COMPONENT,
            format!(
                "score {:.2} (completion {:.2}, confidence {:.2}), {} issue(s), {} correction(s)",
                assessment.overall_score,
                completion_rate,
                confidence_average,
                assessment.issues.len(),
                assessment.corrected_fields.len()
            ),
        );

        Ok(assessment)
    }
}
