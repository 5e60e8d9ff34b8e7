use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::AnalysisResult;
use crate::cache::CacheTier;
use crate::cascade::CascadeError;

pub const DEFAULT_EPHEMERAL_TTL: Duration = Duration::from_secs(60 * 60);

pub const DEFAULT_DURABLE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Behavior switches fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// When `false`, misses go straight to the premium provider.
    pub cascade_enabled: bool,
    pub ttl_ephemeral: Duration,
    pub ttl_durable: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            cascade_enabled: true,
            ttl_ephemeral: DEFAULT_EPHEMERAL_TTL,
            ttl_durable: DEFAULT_DURABLE_TTL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheSource {
    Ephemeral,
    Durable,
    Generated,
}

impl CacheSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheSource::Ephemeral => "ephemeral",
            CacheSource::Durable => "durable",
            CacheSource::Generated => "generated",
        }
    }
}

impl From<CacheTier> for CacheSource {
    fn from(tier: CacheTier) -> Self {
        match tier {
            CacheTier::Ephemeral => CacheSource::Ephemeral,
            CacheTier::Durable => CacheSource::Durable,
        }
    }
}

impl std::fmt::Display for CacheSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a result was produced. Never affects its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub cached: bool,
    pub cache_source: CacheSource,
    pub model_used: String,
}

/// A validated analysis plus provenance, serialized as one flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("analysis failed: {0}")]
    Cascade(#[from] CascadeError),
}
