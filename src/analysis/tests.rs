use super::fixtures::{good_match_json, uniform_analysis_json};
use super::*;

#[test]
fn test_default_weights_sum_to_total() {
    let weights = DimensionWeights::default();
    assert!(weights.validate().is_ok());
    assert_eq!(weights.iter().map(|(_, w)| w).sum::<u32>(), WEIGHT_TOTAL);
    assert_eq!(weights.iter().count(), Dimension::ALL.len());
}

#[test]
fn test_weighted_score_bounds() {
    let weights = DimensionWeights::default();
    let all = |score: u32| Dimension::ALL.map(|d| (d, score));

    assert_eq!(weights.weighted_score(all(10)), 100);
    assert_eq!(weights.weighted_score(all(1)), 10);
    assert_eq!(weights.weighted_score(all(7)), 70);
}

#[test]
fn test_weighted_score_respects_weights() {
    let weights = DimensionWeights::default();
    let scores = Dimension::ALL.map(|d| (d, if d == Dimension::SkillMatch { 8 } else { 7 }));
    assert_eq!(weights.weighted_score(scores), 72);
}

#[test]
fn test_weighted_score_rounds_half_up() {
    let weights = DimensionWeights::default();
    // 700 + 6 = 706 tenths → 70.6 → 71.
    let scores = Dimension::ALL.map(|d| (d, if d == Dimension::ScaleAlignment { 8 } else { 7 }));
    assert_eq!(weights.weighted_score(scores), 71);
}

#[test]
fn test_weight_overrides_valid() {
    let weights =
        DimensionWeights::parse_overrides("skill_match=25, scale_alignment=1").expect("valid");
    assert_eq!(weights.weight(Dimension::SkillMatch), 25);
    assert_eq!(weights.weight(Dimension::ScaleAlignment), 1);
}

#[test]
fn test_weight_overrides_reject_bad_total() {
    let err = DimensionWeights::parse_overrides("skill_match=30").unwrap_err();
    assert_eq!(err, WeightsError::InvalidTotal { actual: 110 });
}

#[test]
fn test_weight_overrides_reject_unknown_dimension() {
    let err = DimensionWeights::parse_overrides("charisma=10").unwrap_err();
    assert!(matches!(err, WeightsError::UnknownDimension { .. }));
}

#[test]
fn test_weight_overrides_reject_malformed_entry() {
    let err = DimensionWeights::parse_overrides("skill_match:20").unwrap_err();
    assert!(matches!(err, WeightsError::MalformedEntry { .. }));
}

#[test]
fn test_weight_overrides_reject_oversized_weight() {
    let err = DimensionWeights::parse_overrides("skill_match=4294967295,industry_match=31")
        .unwrap_err();
    assert_eq!(
        err,
        WeightsError::WeightOutOfRange {
            dimension: Dimension::SkillMatch,
            weight: u32::MAX,
        }
    );
}

#[test]
fn test_weighted_score_saturates_on_huge_scores() {
    let weights = DimensionWeights::default();
    assert_eq!(weights.weighted_score([(Dimension::SkillMatch, u32::MAX)]), u32::MAX);
}

#[test]
fn test_weights_missing_dimension() {
    let err = DimensionWeights::new([(Dimension::SkillMatch, 100)]).unwrap_err();
    assert!(matches!(err, WeightsError::MissingDimension { .. }));
}

#[test]
fn test_recommendation_bands() {
    assert_eq!(Recommendation::for_score(100), Recommendation::Strong);
    assert_eq!(Recommendation::for_score(80), Recommendation::Strong);
    assert_eq!(Recommendation::for_score(79), Recommendation::Good);
    assert_eq!(Recommendation::for_score(65), Recommendation::Good);
    assert_eq!(Recommendation::for_score(64), Recommendation::Moderate);
    assert_eq!(Recommendation::for_score(50), Recommendation::Moderate);
    assert_eq!(Recommendation::for_score(49), Recommendation::Weak);
    assert_eq!(Recommendation::for_score(35), Recommendation::Weak);
    assert_eq!(Recommendation::for_score(34), Recommendation::Poor);
    assert_eq!(Recommendation::for_score(0), Recommendation::Poor);
}

#[test]
fn test_recommendation_bands_match_ranges() {
    for score in 0..=100u8 {
        let (lo, hi) = Recommendation::for_score(score).score_range();
        assert!(lo <= score && score <= hi, "score {score} outside its band");
    }
}

#[test]
fn test_recommendation_parse_accepts_labels_and_categories() {
    assert_eq!(Recommendation::parse("Good Match"), Some(Recommendation::Good));
    assert_eq!(Recommendation::parse("good"), Some(Recommendation::Good));
    assert_eq!(Recommendation::parse(" STRONG match "), Some(Recommendation::Strong));
    assert_eq!(Recommendation::parse("Excellent"), None);
}

#[test]
fn test_recommendation_serializes_as_label() {
    let json = serde_json::to_string(&Recommendation::Good).unwrap();
    assert_eq!(json, "\"Good Match\"");
    let back: Recommendation = serde_json::from_str("\"Weak\"").unwrap();
    assert_eq!(back, Recommendation::Weak);
}

#[test]
fn test_dimension_from_key() {
    assert_eq!(Dimension::from_key("skill_match"), Some(Dimension::SkillMatch));
    assert_eq!(Dimension::from_key("softSkillsLeadership"), Some(Dimension::SoftSkillsLeadership));
    assert_eq!(Dimension::from_key("unknown"), None);
}

#[test]
fn test_parse_candidate_plain_json() {
    let candidate = parse_candidate(&uniform_analysis_json(7)).expect("parse");
    assert_eq!(candidate.overall_score, Some(70.0));
    assert_eq!(candidate.recommendation.as_deref(), Some("Good Match"));
    assert_eq!(candidate.dimensions.as_ref().map(|d| d.len()), Some(10));
    assert_eq!(candidate.red_flags, Some(vec![]));
}

#[test]
fn test_parse_candidate_strips_fences_and_prose() {
    let raw = format!("Here is the analysis:\n```json\n{}\n```\nThanks!", good_match_json());
    let candidate = parse_candidate(&raw).expect("parse");
    assert_eq!(candidate.overall_score, Some(72.0));
}

#[test]
fn test_parse_candidate_accepts_snake_case() {
    let candidate =
        parse_candidate(r#"{"overall_score": 40, "red_flags": ["gap in 2021"]}"#).expect("parse");
    assert_eq!(candidate.overall_score, Some(40.0));
    assert_eq!(candidate.red_flags, Some(vec!["gap in 2021".to_string()]));
    assert!(candidate.dimensions.is_none());
}

#[test]
fn test_parse_candidate_no_object() {
    assert!(matches!(
        parse_candidate("I cannot help with that."),
        Err(ParseError::NoJsonObject)
    ));
    assert!(matches!(parse_candidate("} {"), Err(ParseError::NoJsonObject)));
}

#[test]
fn test_parse_candidate_invalid_json() {
    assert!(matches!(
        parse_candidate("{ overallScore: seventy }"),
        Err(ParseError::InvalidJson(_))
    ));
}

#[test]
fn test_request_accessors() {
    let request = AnalysisRequest::new("S1", "T1", "profile", "posting");
    assert_eq!(request.subject_id(), "S1");
    assert_eq!(request.target_id(), "T1");
    assert_eq!(request.profile_snapshot(), "profile");
    assert_eq!(request.target_snapshot(), "posting");
}
