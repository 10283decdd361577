//! Quality scoring formulas shared by extractors, the assessor and the refiner

use crate::field::FieldMap;

/// Confidence above which a field counts as high-confidence
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Confidence below which the assessor tries to repair a field
pub const LOW_CONFIDENCE: f64 = 0.6;

/// Quality at or above which refinement stops
pub const QUALITY_GATE: f64 = 0.9;

/// Assessment score below which another pass is worthwhile
pub const RETRY_THRESHOLD: f64 = 0.8;

/// Confidence of a category-rule match
pub const PATTERN_CONFIDENCE: f64 = 0.8;

/// Confidence of a phrase-search match
pub const PHRASE_CONFIDENCE: f64 = 0.6;

/// Weighted extraction quality from raw counts
///
/// `0.4 * filled/total + 0.4 * mean(confidences) + 0.2 * high/filled`,
/// clamped to [0, 1]. Zero target fields score 0.
pub fn weighted_quality(total_fields: usize, filled: usize, confidences: &[f64]) -> f64 {
    if total_fields == 0 {
        return 0.0;
    }

    let completion = filled as f64 / total_fields as f64;
    let mean = mean(confidences);
    let high_ratio = if filled == 0 {
        0.0
    } else {
        let high = confidences.iter().filter(|&&c| c > HIGH_CONFIDENCE).count();
        high as f64 / filled as f64
    };

    (0.4 * completion + 0.4 * mean + 0.2 * high_ratio).clamp(0.0, 1.0)
}

/// Extraction quality of a field map against `total_fields` targets
///
/// Fields with unknown confidence count as filled but do not enter the mean.
pub fn extraction_quality(fields: &FieldMap, total_fields: usize) -> f64 {
    let confidences: Vec<f64> = fields.confidences().into_values().collect();
    weighted_quality(total_fields, fields.len(), &confidences)
}

/// Completion-adjusted overall score used by the assessor
///
/// `0.6 * (filled + recovered)/total + 0.4 * confidence_average`, clamped.
pub fn assessment_score(
    total_fields: usize,
    filled: usize,
    recovered: usize,
    confidence_average: f64,
) -> f64 {
    if total_fields == 0 {
        return 0.0;
    }
    let corrected_completion = (filled + recovered) as f64 / total_fields as f64;
    (0.6 * corrected_completion + 0.4 * confidence_average).clamp(0.0, 1.0)
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
