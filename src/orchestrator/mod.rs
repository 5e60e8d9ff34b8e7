//! Public `analyze` surface tying the cache and the cascade together.

pub mod engine;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::AnalysisOrchestrator;
pub use types::{
    AnalysisError, AnalysisOutcome, CacheSource, DEFAULT_DURABLE_TTL, DEFAULT_EPHEMERAL_TTL,
    OrchestratorOptions, Provenance,
};
