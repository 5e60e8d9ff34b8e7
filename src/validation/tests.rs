use serde_json::{Value, json};

use super::*;
use crate::analysis::fixtures::{analysis_value, good_match_json, truncated_analysis_json};
use crate::analysis::{AnalysisCandidate, Dimension, Recommendation, parse_candidate};

fn candidate_from(value: Value) -> AnalysisCandidate {
    serde_json::from_value(value).expect("candidate shape")
}

fn valid_value() -> Value {
    analysis_value(|d| if d == Dimension::SkillMatch { 8 } else { 7 })
}

fn rule_for(value: Value) -> Option<ValidationRule> {
    QualityValidator::default()
        .validate(&candidate_from(value))
        .rule()
}

#[test]
fn test_valid_candidate_passes() {
    let validator = QualityValidator::default();
    let candidate = parse_candidate(&good_match_json()).unwrap();

    assert!(validator.validate(&candidate).is_valid());

    let result = validator.accept(candidate).expect("accepted");
    assert_eq!(result.overall_score, 72);
    assert_eq!(result.recommendation, Recommendation::Good);
    assert_eq!(result.dimensions.len(), 10);
    assert_eq!(result.strengths.len(), 3);
    assert_eq!(result.gaps.len(), 3);
    assert!(result.red_flags.is_empty());
}

#[test]
fn test_rule_1_overall_score_out_of_range() {
    let mut value = valid_value();
    value["overallScore"] = json!(101);
    assert_eq!(rule_for(value), Some(ValidationRule::OverallScoreRange));

    let mut value = valid_value();
    value["overallScore"] = json!(-1);
    assert_eq!(rule_for(value), Some(ValidationRule::OverallScoreRange));
}

#[test]
fn test_rule_1_overall_score_missing_or_fractional() {
    let mut value = valid_value();
    value.as_object_mut().unwrap().remove("overallScore");
    assert_eq!(rule_for(value), Some(ValidationRule::OverallScoreRange));

    let mut value = valid_value();
    value["overallScore"] = json!(72.5);
    assert_eq!(rule_for(value), Some(ValidationRule::OverallScoreRange));
}

#[test]
fn test_rule_2_recommendation_mismatch_is_not_corrected() {
    let mut value = valid_value();
    value["recommendation"] = json!("Strong Match");

    let validation = QualityValidator::default().validate(&candidate_from(value));
    let failure = validation.failure().expect("should fail");
    assert_eq!(failure.rule, ValidationRule::RecommendationBand);
    assert!(failure.reason.contains("Good Match"));
}

#[test]
fn test_rule_2_unknown_or_missing_recommendation() {
    let mut value = valid_value();
    value["recommendation"] = json!("Excellent Match");
    assert_eq!(rule_for(value), Some(ValidationRule::RecommendationBand));

    let mut value = valid_value();
    value.as_object_mut().unwrap().remove("recommendation");
    assert_eq!(rule_for(value), Some(ValidationRule::RecommendationBand));
}

#[test]
fn test_rule_3_missing_dimensions() {
    let candidate = parse_candidate(&truncated_analysis_json(7)).unwrap();
    let validation = QualityValidator::default().validate(&candidate);
    let failure = validation.failure().expect("should fail");

    assert_eq!(failure.rule, ValidationRule::DimensionKeys);
    assert!(failure.reason.contains("7 of 10"));
}

#[test]
fn test_rule_3_extra_dimension() {
    let mut value = valid_value();
    value["dimensions"]["charisma"] =
        json!({ "score": 5, "justification": "An extra key that is not part of the table." });
    assert_eq!(rule_for(value), Some(ValidationRule::DimensionKeys));
}

#[test]
fn test_rule_3_duplicate_dimension_spelling() {
    let mut value = valid_value();
    value["dimensions"]["skillMatch"] = value["dimensions"]["skill_match"].clone();
    assert_eq!(rule_for(value), Some(ValidationRule::DimensionKeys));
}

#[test]
fn test_rule_3_dimensions_field_missing() {
    let mut value = valid_value();
    value.as_object_mut().unwrap().remove("dimensions");
    assert_eq!(rule_for(value), Some(ValidationRule::DimensionKeys));
}

#[test]
fn test_rule_4_dimension_score_range() {
    for bad in [json!(0), json!(11), json!(6.5), Value::Null] {
        let mut value = valid_value();
        value["dimensions"]["seniority"]["score"] = bad.clone();
        assert_eq!(
            rule_for(value),
            Some(ValidationRule::DimensionScoreRange),
            "score {bad} should be rejected"
        );
    }
}

#[test]
fn test_rule_5_short_justification() {
    let mut value = valid_value();
    value["dimensions"]["location_match"]["justification"] = json!("Good fit.");
    assert_eq!(rule_for(value), Some(ValidationRule::JustificationLength));
}

#[test]
fn test_rule_5_whitespace_does_not_count() {
    let mut value = valid_value();
    value["dimensions"]["location_match"]["justification"] =
        json!(format!("   {}   ", "x".repeat(MIN_JUSTIFICATION_CHARS - 1)));
    assert_eq!(rule_for(value), Some(ValidationRule::JustificationLength));

    let mut value = valid_value();
    value["dimensions"]["location_match"]["justification"] =
        json!("x".repeat(MIN_JUSTIFICATION_CHARS));
    assert_eq!(rule_for(value), None);
}

#[test]
fn test_rule_6_strengths_and_gaps_count() {
    let mut value = valid_value();
    value["strengths"] = json!(["one", "two"]);
    assert_eq!(rule_for(value), Some(ValidationRule::StrengthsAndGapsCount));

    let mut value = valid_value();
    value["gaps"] = json!(["one", "two", "three", "four"]);
    assert_eq!(rule_for(value), Some(ValidationRule::StrengthsAndGapsCount));

    let mut value = valid_value();
    value.as_object_mut().unwrap().remove("gaps");
    assert_eq!(rule_for(value), Some(ValidationRule::StrengthsAndGapsCount));
}

#[test]
fn test_rule_7_red_flags_absent_vs_empty() {
    let mut value = valid_value();
    value.as_object_mut().unwrap().remove("redFlags");
    assert_eq!(rule_for(value), Some(ValidationRule::RedFlagsPresent));

    let mut value = valid_value();
    value["redFlags"] = json!([]);
    assert_eq!(rule_for(value), None);

    let mut value = valid_value();
    value["redFlags"] = json!(["Three roles in eighteen months"]);
    assert_eq!(rule_for(value), None);
}

#[test]
fn test_rule_8_weighted_sum_tolerance() {
    // Weighted sum is 72 and 75 is still a Good Match, so only rule 8 is violated.
    let mut value = valid_value();
    value["overallScore"] = json!(75);
    assert_eq!(rule_for(value), Some(ValidationRule::WeightedSumConsistency));

    let mut value = valid_value();
    value["overallScore"] = json!(74);
    assert_eq!(rule_for(value), None);

    let mut value = valid_value();
    value["overallScore"] = json!(70);
    assert_eq!(rule_for(value), None);
}

#[test]
fn test_first_failing_rule_is_reported() {
    let mut value = valid_value();
    value["overallScore"] = json!(150);
    value["strengths"] = json!([]);
    value.as_object_mut().unwrap().remove("redFlags");
    assert_eq!(rule_for(value), Some(ValidationRule::OverallScoreRange));
}

#[test]
fn test_validation_failure_display_names_rule() {
    let failure = ValidationFailure::new(ValidationRule::RedFlagsPresent, "redFlags field is missing");
    assert_eq!(
        failure.to_string(),
        "rule 7 (red_flags_present): redFlags field is missing"
    );
}

#[test]
fn test_accepted_results_satisfy_weighted_sum_invariant() {
    let validator = QualityValidator::default();
    for base in 1..=10u8 {
        for bump in [Dimension::SkillMatch, Dimension::ScaleAlignment, Dimension::Seniority] {
            let value = analysis_value(|d| if d == bump { base.max(2) - 1 } else { base });
            let result = validator
                .accept(candidate_from(value))
                .expect("fixture results are valid");
            let weighted = validator.weights().weighted_score(
                result
                    .dimensions
                    .iter()
                    .map(|(d, v)| (*d, u32::from(v.score))),
            );
            assert!(weighted.abs_diff(u32::from(result.overall_score)) <= WEIGHTED_SUM_TOLERANCE);
        }
    }
}

#[test]
fn test_custom_weights_change_the_expected_sum() {
    let weights = crate::analysis::DimensionWeights::parse_overrides(
        "skill_match=30,experience_level=5",
    )
    .unwrap();
    let validator = QualityValidator::new(weights);

    // Default-weighted fixture: 72 overall, but with skill_match=30 the sum is 73.
    let candidate = parse_candidate(&good_match_json()).unwrap();
    assert!(validator.validate(&candidate).is_valid());

    let mut value = analysis_value(|d| if d == Dimension::SkillMatch { 10 } else { 6 });
    // Default weights: (200 + 480) / 10 = 68. Custom: (300 + 420) / 10 = 72.
    value["overallScore"] = json!(72);
    value["recommendation"] = json!("Good Match");
    assert_eq!(
        QualityValidator::default()
            .validate(&candidate_from(value.clone()))
            .rule(),
        Some(ValidationRule::WeightedSumConsistency)
    );
    assert!(validator.validate(&candidate_from(value)).is_valid());
}
