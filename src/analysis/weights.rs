//! Dimension weight table.
//!
//! One canonical table drives both prompting and validation. Weights are integers that
//! must sum to [`WEIGHT_TOTAL`]; the weighted sum of 1..=10 dimension scores is scaled
//! to 0..=100 by dividing by 10 and rounding half away from zero.

use std::collections::BTreeMap;

use thiserror::Error;

use super::types::Dimension;

/// Required sum of all dimension weights.
pub const WEIGHT_TOTAL: u32 = 100;

/// Canonical weight table, in [`Dimension::ALL`] order.
pub const DEFAULT_DIMENSION_WEIGHTS: [(Dimension, u32); 10] = [
    (Dimension::SkillMatch, 20),
    (Dimension::IndustryMatch, 10),
    (Dimension::ExperienceLevel, 15),
    (Dimension::LocationMatch, 10),
    (Dimension::Seniority, 10),
    (Dimension::EducationCertification, 8),
    (Dimension::SoftSkillsLeadership, 7),
    (Dimension::EmploymentStability, 7),
    (Dimension::GrowthPotential, 7),
    (Dimension::ScaleAlignment, 6),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightsError {
    #[error("dimension weights must sum to {WEIGHT_TOTAL}, got {actual}")]
    InvalidTotal { actual: u32 },

    #[error("weight {weight} for dimension '{dimension}' exceeds {WEIGHT_TOTAL}")]
    WeightOutOfRange { dimension: Dimension, weight: u32 },

    #[error("missing weight for dimension '{dimension}'")]
    MissingDimension { dimension: Dimension },

    #[error("unknown dimension '{name}'")]
    UnknownDimension { name: String },

    #[error("invalid weight entry '{entry}': expected name=weight")]
    MalformedEntry { entry: String },
}

/// Validated weight table (one weight per dimension, summing to 100).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionWeights {
    weights: BTreeMap<Dimension, u32>,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            weights: DEFAULT_DIMENSION_WEIGHTS.into_iter().collect(),
        }
    }
}

impl DimensionWeights {
    /// Builds a table from explicit entries and validates it.
    pub fn new(entries: impl IntoIterator<Item = (Dimension, u32)>) -> Result<Self, WeightsError> {
        let table = Self {
            weights: entries.into_iter().collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Parses `name=weight,name=weight` overrides on top of the canonical table.
    ///
    /// The merged table is validated, so a partial override that breaks the total fails.
    pub fn parse_overrides(overrides: &str) -> Result<Self, WeightsError> {
        let mut weights: BTreeMap<Dimension, u32> = DEFAULT_DIMENSION_WEIGHTS.into_iter().collect();

        for entry in overrides.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, value) =
                entry
                    .split_once('=')
                    .ok_or_else(|| WeightsError::MalformedEntry {
                        entry: entry.to_string(),
                    })?;
            let dimension =
                Dimension::from_key(name.trim()).ok_or_else(|| WeightsError::UnknownDimension {
                    name: name.trim().to_string(),
                })?;
            let weight: u32 = value
                .trim()
                .parse()
                .map_err(|_| WeightsError::MalformedEntry {
                    entry: entry.to_string(),
                })?;
            weights.insert(dimension, weight);
        }

        Self::new(weights)
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        if let Some(missing) = Dimension::ALL
            .into_iter()
            .find(|d| !self.weights.contains_key(d))
        {
            return Err(WeightsError::MissingDimension { dimension: missing });
        }

        if let Some((dimension, weight)) = self.iter().find(|(_, w)| *w > WEIGHT_TOTAL) {
            return Err(WeightsError::WeightOutOfRange { dimension, weight });
        }

        // Bounded by 10 × WEIGHT_TOTAL after the range check.
        let actual: u32 = self.weights.values().sum();
        if actual != WEIGHT_TOTAL {
            return Err(WeightsError::InvalidTotal { actual });
        }
        Ok(())
    }

    #[inline]
    pub fn weight(&self, dimension: Dimension) -> u32 {
        self.weights.get(&dimension).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u32)> + '_ {
        self.weights.iter().map(|(d, w)| (*d, *w))
    }

    /// Weighted sum of `scores` scaled to 0..=100.
    ///
    /// Dimensions absent from `scores` contribute zero.
    pub fn weighted_score<I>(&self, scores: I) -> u32
    where
        I: IntoIterator<Item = (Dimension, u32)>,
    {
        let raw: u64 = scores
            .into_iter()
            .map(|(dimension, score)| u64::from(score) * u64::from(self.weight(dimension)))
            .fold(0, u64::saturating_add);
        // raw is in tenths of a point: 10 × 100 for in-range scores.
        u32::try_from(raw.saturating_add(5) / 10).unwrap_or(u32::MAX)
    }
}
