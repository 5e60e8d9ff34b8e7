use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of entries required in both `strengths` and `gaps`.
pub const STRENGTHS_AND_GAPS_COUNT: usize = 3;

/// Inputs for one analysis call. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    subject_id: String,
    target_id: String,
    profile_snapshot: String,
    target_snapshot: String,
}

impl AnalysisRequest {
    pub fn new(
        subject_id: impl Into<String>,
        target_id: impl Into<String>,
        profile_snapshot: impl Into<String>,
        target_snapshot: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            target_id: target_id.into(),
            profile_snapshot: profile_snapshot.into(),
            target_snapshot: target_snapshot.into(),
        }
    }

    /// Candidate identifier.
    #[inline]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Job posting identifier.
    #[inline]
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Serialized candidate profile, passed to providers as-is.
    #[inline]
    pub fn profile_snapshot(&self) -> &str {
        &self.profile_snapshot
    }

    /// Serialized job posting, passed to providers as-is.
    #[inline]
    pub fn target_snapshot(&self) -> &str {
        &self.target_snapshot
    }
}

/// The ten fixed compatibility dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    SkillMatch,
    IndustryMatch,
    ExperienceLevel,
    LocationMatch,
    Seniority,
    EducationCertification,
    SoftSkillsLeadership,
    EmploymentStability,
    GrowthPotential,
    ScaleAlignment,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::SkillMatch,
        Dimension::IndustryMatch,
        Dimension::ExperienceLevel,
        Dimension::LocationMatch,
        Dimension::Seniority,
        Dimension::EducationCertification,
        Dimension::SoftSkillsLeadership,
        Dimension::EmploymentStability,
        Dimension::GrowthPotential,
        Dimension::ScaleAlignment,
    ];

    /// Wire name used in provider output and serialized results.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::SkillMatch => "skill_match",
            Dimension::IndustryMatch => "industry_match",
            Dimension::ExperienceLevel => "experience_level",
            Dimension::LocationMatch => "location_match",
            Dimension::Seniority => "seniority",
            Dimension::EducationCertification => "education_certification",
            Dimension::SoftSkillsLeadership => "soft_skills_leadership",
            Dimension::EmploymentStability => "employment_stability",
            Dimension::GrowthPotential => "growth_potential",
            Dimension::ScaleAlignment => "scale_alignment",
        }
    }

    /// Short description used when prompting providers.
    pub fn description(&self) -> &'static str {
        match self {
            Dimension::SkillMatch => "overlap between required and demonstrated skills",
            Dimension::IndustryMatch => "relevance of industry and domain background",
            Dimension::ExperienceLevel => "years and depth of relevant experience",
            Dimension::LocationMatch => "location, relocation and remote-work fit",
            Dimension::Seniority => "alignment of current and target seniority",
            Dimension::EducationCertification => "required degrees and certifications",
            Dimension::SoftSkillsLeadership => "communication, collaboration and leadership",
            Dimension::EmploymentStability => "tenure patterns and career continuity",
            Dimension::GrowthPotential => "trajectory and room to grow into the role",
            Dimension::ScaleAlignment => "experience with comparable team and company scale",
        }
    }

    /// Accepts the snake_case wire name or its camelCase spelling.
    pub fn from_key(key: &str) -> Option<Self> {
        let mut normalized = String::with_capacity(key.len() + 4);
        for c in key.trim().chars() {
            if c.is_ascii_uppercase() {
                if !normalized.is_empty() {
                    normalized.push('_');
                }
                normalized.push(c.to_ascii_lowercase());
            } else {
                normalized.push(c);
            }
        }
        Self::ALL.into_iter().find(|d| d.as_str() == normalized)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score bands, highest first: `(minimum overall score, recommendation)`.
const RECOMMENDATION_BANDS: [(u8, Recommendation); 5] = [
    (80, Recommendation::Strong),
    (65, Recommendation::Good),
    (50, Recommendation::Moderate),
    (35, Recommendation::Weak),
    (0, Recommendation::Poor),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    Strong,
    Good,
    Moderate,
    Weak,
    Poor,
}

impl Recommendation {
    /// Returns the band an overall score falls into.
    pub fn for_score(overall_score: u8) -> Self {
        RECOMMENDATION_BANDS
            .iter()
            .find(|(min, _)| overall_score >= *min)
            .map(|(_, rec)| *rec)
            .unwrap_or(Recommendation::Poor)
    }

    /// Inclusive score range for this band.
    pub fn score_range(&self) -> (u8, u8) {
        match self {
            Recommendation::Strong => (80, 100),
            Recommendation::Good => (65, 79),
            Recommendation::Moderate => (50, 64),
            Recommendation::Weak => (35, 49),
            Recommendation::Poor => (0, 34),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Strong => "Strong Match",
            Recommendation::Good => "Good Match",
            Recommendation::Moderate => "Moderate Match",
            Recommendation::Weak => "Weak Match",
            Recommendation::Poor => "Poor Match",
        }
    }

    /// Parses a label ("Good Match") or bare category ("good"), case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        let category = lowered.strip_suffix(" match").unwrap_or(&lowered).trim();
        match category {
            "strong" => Some(Recommendation::Strong),
            "good" => Some(Recommendation::Good),
            "moderate" => Some(Recommendation::Moderate),
            "weak" => Some(Recommendation::Weak),
            "poor" => Some(Recommendation::Poor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Recommendation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Recommendation::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown recommendation '{raw}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityDimension {
    /// 1..=10.
    pub score: u8,
    pub justification: String,
}

/// A validated compatibility analysis.
///
/// Only [`QualityValidator::accept`](crate::validation::QualityValidator::accept) builds
/// these from provider output, so every instance satisfies the validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub recommendation: Recommendation,
    pub dimensions: BTreeMap<Dimension, CompatibilityDimension>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub red_flags: Vec<String>,
}

impl AnalysisResult {
    pub fn dimension(&self, dimension: Dimension) -> Option<&CompatibilityDimension> {
        self.dimensions.get(&dimension)
    }
}
