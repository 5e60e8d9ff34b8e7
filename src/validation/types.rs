use thiserror::Error;

/// Validation rules in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    OverallScoreRange,
    RecommendationBand,
    DimensionKeys,
    DimensionScoreRange,
    JustificationLength,
    StrengthsAndGapsCount,
    RedFlagsPresent,
    WeightedSumConsistency,
}

impl ValidationRule {
    /// 1-based position in evaluation order.
    pub fn number(&self) -> u8 {
        match self {
            ValidationRule::OverallScoreRange => 1,
            ValidationRule::RecommendationBand => 2,
            ValidationRule::DimensionKeys => 3,
            ValidationRule::DimensionScoreRange => 4,
            ValidationRule::JustificationLength => 5,
            ValidationRule::StrengthsAndGapsCount => 6,
            ValidationRule::RedFlagsPresent => 7,
            ValidationRule::WeightedSumConsistency => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationRule::OverallScoreRange => "overall_score_range",
            ValidationRule::RecommendationBand => "recommendation_band",
            ValidationRule::DimensionKeys => "dimension_keys",
            ValidationRule::DimensionScoreRange => "dimension_score_range",
            ValidationRule::JustificationLength => "justification_length",
            ValidationRule::StrengthsAndGapsCount => "strengths_and_gaps_count",
            ValidationRule::RedFlagsPresent => "red_flags_present",
            ValidationRule::WeightedSumConsistency => "weighted_sum_consistency",
        }
    }
}

impl std::fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule {} ({})", self.number(), self.as_str())
    }
}

/// First failing rule and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{rule}: {reason}")]
pub struct ValidationFailure {
    pub rule: ValidationRule,
    pub reason: String,
}

impl ValidationFailure {
    pub(crate) fn new(rule: ValidationRule, reason: impl Into<String>) -> Self {
        Self {
            rule,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(ValidationFailure),
}

impl Validation {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(failure) => Some(failure),
        }
    }

    /// Rule that failed, if any.
    pub fn rule(&self) -> Option<ValidationRule> {
        self.failure().map(|f| f.rule)
    }
}
