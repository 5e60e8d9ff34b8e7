use std::collections::BTreeMap;

use tracing::debug;

use crate::analysis::{
    AnalysisCandidate, AnalysisResult, CompatibilityDimension, Dimension, DimensionWeights,
    Recommendation, STRENGTHS_AND_GAPS_COUNT,
};

use super::types::{Validation, ValidationFailure, ValidationRule};

/// Minimum justification length, in characters after trimming.
pub const MIN_JUSTIFICATION_CHARS: usize = 30;

/// Allowed distance between `overall_score` and the recomputed weighted sum.
pub const WEIGHTED_SUM_TOLERANCE: u32 = 2;

#[derive(Debug, Clone, Default)]
pub struct QualityValidator {
    weights: DimensionWeights,
}

impl QualityValidator {
    pub fn new(weights: DimensionWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &DimensionWeights {
        &self.weights
    }

    /// Checks every rule in order and reports the first failure.
    pub fn validate(&self, candidate: &AnalysisCandidate) -> Validation {
        match self.check(candidate) {
            Ok(_) => Validation::Valid,
            Err(failure) => Validation::Invalid(failure),
        }
    }

    /// Validates `candidate` and converts it into an [`AnalysisResult`].
    pub fn accept(&self, candidate: AnalysisCandidate) -> Result<AnalysisResult, ValidationFailure> {
        let (overall_score, recommendation, dimensions) = self.check(&candidate)?;

        // check() has verified presence of the list fields.
        Ok(AnalysisResult {
            overall_score,
            recommendation,
            dimensions,
            strengths: candidate.strengths.unwrap_or_default(),
            gaps: candidate.gaps.unwrap_or_default(),
            red_flags: candidate.red_flags.unwrap_or_default(),
        })
    }

    fn check(
        &self,
        candidate: &AnalysisCandidate,
    ) -> Result<(u8, Recommendation, BTreeMap<Dimension, CompatibilityDimension>), ValidationFailure>
    {
        let overall_score = check_overall_score(candidate)?;
        let recommendation = check_recommendation(candidate, overall_score)?;
        let raw_dimensions = check_dimension_keys(candidate)?;

        let mut dimensions = BTreeMap::new();
        for (dimension, raw) in &raw_dimensions {
            let score = integer_in_range(raw.score, 1, 10).ok_or_else(|| {
                ValidationFailure::new(
                    ValidationRule::DimensionScoreRange,
                    format!(
                        "dimension '{dimension}' score {} is not an integer in [1, 10]",
                        describe(raw.score)
                    ),
                )
            })?;
            dimensions.insert(*dimension, score);
        }

        let mut typed = BTreeMap::new();
        for (dimension, raw) in raw_dimensions {
            let justification = raw.justification.as_deref().map(str::trim).unwrap_or("");
            let length = justification.chars().count();
            if length < MIN_JUSTIFICATION_CHARS {
                return Err(ValidationFailure::new(
                    ValidationRule::JustificationLength,
                    format!(
                        "dimension '{dimension}' justification has {length} characters, \
                         minimum is {MIN_JUSTIFICATION_CHARS}"
                    ),
                ));
            }
            typed.insert(
                dimension,
                CompatibilityDimension {
                    score: dimensions[&dimension],
                    justification: justification.to_string(),
                },
            );
        }

        check_list_count(&candidate.strengths, "strengths")?;
        check_list_count(&candidate.gaps, "gaps")?;

        if candidate.red_flags.is_none() {
            return Err(ValidationFailure::new(
                ValidationRule::RedFlagsPresent,
                "redFlags field is missing",
            ));
        }

        let recomputed = self
            .weights
            .weighted_score(typed.iter().map(|(d, v)| (*d, u32::from(v.score))));
        let diff = recomputed.abs_diff(u32::from(overall_score));
        if diff > WEIGHTED_SUM_TOLERANCE {
            return Err(ValidationFailure::new(
                ValidationRule::WeightedSumConsistency,
                format!(
                    "overall score {overall_score} differs from weighted sum {recomputed} \
                     by {diff} (tolerance {WEIGHTED_SUM_TOLERANCE})"
                ),
            ));
        }

        debug!(
            overall_score,
            recommendation = %recommendation,
            weighted_sum = recomputed,
            "Candidate passed validation"
        );

        Ok((overall_score, recommendation, typed))
    }
}

fn check_overall_score(candidate: &AnalysisCandidate) -> Result<u8, ValidationFailure> {
    integer_in_range(candidate.overall_score, 0, 100).ok_or_else(|| {
        ValidationFailure::new(
            ValidationRule::OverallScoreRange,
            format!(
                "overall score {} is not an integer in [0, 100]",
                describe(candidate.overall_score)
            ),
        )
    })
}

fn check_recommendation(
    candidate: &AnalysisCandidate,
    overall_score: u8,
) -> Result<Recommendation, ValidationFailure> {
    let raw = candidate.recommendation.as_deref().ok_or_else(|| {
        ValidationFailure::new(ValidationRule::RecommendationBand, "recommendation is missing")
    })?;

    let recommendation = Recommendation::parse(raw).ok_or_else(|| {
        ValidationFailure::new(
            ValidationRule::RecommendationBand,
            format!("unknown recommendation '{raw}'"),
        )
    })?;

    let expected = Recommendation::for_score(overall_score);
    if recommendation != expected {
        return Err(ValidationFailure::new(
            ValidationRule::RecommendationBand,
            format!("recommendation '{recommendation}' does not match score {overall_score} (expected '{expected}')"),
        ));
    }

    Ok(recommendation)
}

fn check_dimension_keys(
    candidate: &AnalysisCandidate,
) -> Result<BTreeMap<Dimension, crate::analysis::CandidateDimension>, ValidationFailure> {
    let raw = candidate.dimensions.as_ref().ok_or_else(|| {
        ValidationFailure::new(ValidationRule::DimensionKeys, "dimensions field is missing")
    })?;

    let mut resolved = BTreeMap::new();
    for (key, value) in raw {
        let dimension = Dimension::from_key(key).ok_or_else(|| {
            ValidationFailure::new(
                ValidationRule::DimensionKeys,
                format!("unexpected dimension '{key}'"),
            )
        })?;
        if resolved.insert(dimension, value.clone()).is_some() {
            return Err(ValidationFailure::new(
                ValidationRule::DimensionKeys,
                format!("dimension '{dimension}' appears more than once"),
            ));
        }
    }

    let missing: Vec<&str> = Dimension::ALL
        .iter()
        .filter(|d| !resolved.contains_key(d))
        .map(|d| d.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationFailure::new(
            ValidationRule::DimensionKeys,
            format!(
                "{} of {} dimensions present, missing: {}",
                resolved.len(),
                Dimension::ALL.len(),
                missing.join(", ")
            ),
        ));
    }

    Ok(resolved)
}

fn check_list_count(list: &Option<Vec<String>>, field: &str) -> Result<(), ValidationFailure> {
    match list {
        Some(items) if items.len() == STRENGTHS_AND_GAPS_COUNT => Ok(()),
        Some(items) => Err(ValidationFailure::new(
            ValidationRule::StrengthsAndGapsCount,
            format!(
                "{field} has {} entries, expected exactly {STRENGTHS_AND_GAPS_COUNT}",
                items.len()
            ),
        )),
        None => Err(ValidationFailure::new(
            ValidationRule::StrengthsAndGapsCount,
            format!("{field} field is missing"),
        )),
    }
}

fn integer_in_range(value: Option<f64>, min: u8, max: u8) -> Option<u8> {
    let value = value?;
    if value.fract() != 0.0 || value < f64::from(min) || value > f64::from(max) {
        return None;
    }
    Some(value as u8)
}

fn describe(value: Option<f64>) -> String {
    value.map_or_else(|| "<missing>".to_string(), |v| v.to_string())
}
