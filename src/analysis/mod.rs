//! Compatibility analysis data model.
//!
//! [`AnalysisRequest`] identifies a candidate/job pair, [`AnalysisResult`] is the
//! validated output, and [`AnalysisCandidate`] is the lenient shape raw provider text is
//! parsed into before the [`QualityValidator`](crate::validation::QualityValidator)
//! decides whether it may become a result.

pub mod candidate;
#[cfg(any(test, feature = "mock"))]
pub mod fixtures;
pub mod types;
pub mod weights;

#[cfg(test)]
mod tests;

pub use candidate::{AnalysisCandidate, CandidateDimension, ParseError, parse_candidate};
pub use types::{
    AnalysisRequest, AnalysisResult, CompatibilityDimension, Dimension, Recommendation,
    STRENGTHS_AND_GAPS_COUNT,
};
pub use weights::{DEFAULT_DIMENSION_WEIGHTS, DimensionWeights, WEIGHT_TOTAL, WeightsError};
