//! Canned requests and provider payloads for tests and local runs.

use serde_json::{Value, json};

use super::types::{AnalysisRequest, Dimension, Recommendation};
use super::weights::DimensionWeights;

pub const SAMPLE_JUSTIFICATION: &str =
    "Recent roles show direct, hands-on evidence supporting this rating.";

pub fn sample_request(subject_id: &str, target_id: &str) -> AnalysisRequest {
    AnalysisRequest::new(
        subject_id,
        target_id,
        r#"{"name":"Ada","skills":["rust","distributed systems"],"years":9}"#,
        r#"{"title":"Staff Engineer","requirements":["rust","kubernetes"],"location":"remote"}"#,
    )
}

/// Provider payload whose overall score and recommendation agree with `score_for`
/// under the canonical weights.
pub fn analysis_value(score_for: impl Fn(Dimension) -> u8) -> Value {
    let weights = DimensionWeights::default();
    let overall = weights.weighted_score(Dimension::ALL.map(|d| (d, u32::from(score_for(d)))));
    let overall = overall as u8;

    let mut dimensions = serde_json::Map::new();
    for dimension in Dimension::ALL {
        dimensions.insert(
            dimension.as_str().to_string(),
            json!({ "score": score_for(dimension), "justification": SAMPLE_JUSTIFICATION }),
        );
    }

    json!({
        "overallScore": overall,
        "recommendation": Recommendation::for_score(overall).label(),
        "dimensions": dimensions,
        "strengths": ["Deep Rust expertise", "Led platform migrations", "Strong mentoring record"],
        "gaps": ["No Kubernetes operator work", "Limited fintech exposure", "No on-call leadership"],
        "redFlags": []
    })
}

pub fn uniform_analysis_json(score: u8) -> String {
    analysis_value(|_| score).to_string()
}

/// Valid payload with an overall score of 72 ("Good Match").
pub fn good_match_json() -> String {
    analysis_value(|d| if d == Dimension::SkillMatch { 8 } else { 7 }).to_string()
}

/// Payload that keeps only the first `count` dimensions.
pub fn truncated_analysis_json(count: usize) -> String {
    let mut value = analysis_value(|_| 7);
    if let Some(dimensions) = value["dimensions"].as_object_mut() {
        let keep: Vec<String> = Dimension::ALL
            .iter()
            .take(count)
            .map(|d| d.as_str().to_string())
            .collect();
        dimensions.retain(|k, _| keep.contains(k));
    }
    value.to_string()
}
