//! Prompt text sent to language-model providers.

use std::fmt::Write;

use crate::analysis::{AnalysisRequest, DimensionWeights, Recommendation, STRENGTHS_AND_GAPS_COUNT};
use crate::validation::MIN_JUSTIFICATION_CHARS;

/// Instructions describing the expected JSON document.
pub fn system_prompt(weights: &DimensionWeights) -> String {
    let mut prompt = String::from(
        "You are an expert technical recruiter. Compare the candidate profile with the job \
         posting and answer with a single JSON object and nothing else.\n\n",
    );

    prompt.push_str("Score each dimension from 1 to 10 (key: weight, meaning):\n");
    for (dimension, weight) in weights.iter() {
        let _ = writeln!(prompt, "- {}: {}, {}", dimension.as_str(), weight, dimension.description());
    }

    prompt.push_str(
        "\noverallScore is round(sum(score * weight) / 10), an integer from 0 to 100.\n\
         recommendation follows overallScore:\n",
    );
    for recommendation in [
        Recommendation::Strong,
        Recommendation::Good,
        Recommendation::Moderate,
        Recommendation::Weak,
        Recommendation::Poor,
    ] {
        let (low, high) = recommendation.score_range();
        let _ = writeln!(prompt, "- \"{}\": {}-{}", recommendation.label(), low, high);
    }

    let _ = write!(
        prompt,
        "\nRules: every dimension needs a justification of at least {MIN_JUSTIFICATION_CHARS} \
         characters citing concrete evidence. Give exactly {STRENGTHS_AND_GAPS_COUNT} strengths \
         and exactly {STRENGTHS_AND_GAPS_COUNT} gaps. Always include redFlags, using [] when \
         there are none.\n\n"
    );

    prompt.push_str(
        "Schema:\n{\"overallScore\": 0, \"recommendation\": \"\", \"dimensions\": \
         {\"<key>\": {\"score\": 0, \"justification\": \"\"}}, \"strengths\": [], \
         \"gaps\": [], \"redFlags\": []}",
    );
    prompt
}

/// The two snapshots, delimited for the model.
pub fn user_prompt(request: &AnalysisRequest) -> String {
    format!(
        "CANDIDATE PROFILE ({subject}):\n{profile}\n\nJOB POSTING ({target}):\n{posting}\n",
        subject = request.subject_id(),
        profile = request.profile_snapshot(),
        target = request.target_id(),
        posting = request.target_snapshot(),
    )
}
