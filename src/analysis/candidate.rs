//! Lenient parse target for raw provider output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("provider output contains no JSON object")]
    NoJsonObject,

    #[error("provider output is not valid analysis JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Shape of an analysis before validation. Every field is optional so that a missing
/// field is reported by the validator rule that owns it rather than by serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisCandidate {
    #[serde(default, alias = "overallScore")]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub dimensions: Option<BTreeMap<String, CandidateDimension>>,
    #[serde(default)]
    pub strengths: Option<Vec<String>>,
    #[serde(default)]
    pub gaps: Option<Vec<String>>,
    #[serde(default, alias = "redFlags")]
    pub red_flags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateDimension {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub justification: Option<String>,
}

/// Extracts the outermost `{...}` block from `raw` and parses it.
///
/// Models often wrap JSON in Markdown fences or a sentence of prose; anything outside
/// the first `{` and the last `}` is ignored.
pub fn parse_candidate(raw: &str) -> Result<AnalysisCandidate, ParseError> {
    let start = raw.find('{').ok_or(ParseError::NoJsonObject)?;
    let end = raw.rfind('}').ok_or(ParseError::NoJsonObject)?;
    if end < start {
        return Err(ParseError::NoJsonObject);
    }
    Ok(serde_json::from_str(&raw[start..=end])?)
}
