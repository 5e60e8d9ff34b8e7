//! Match-cascade library crate (used by the server and integration tests).
//!
//! Produces validated candidate/job compatibility analyses at the lowest provider cost
//! that still passes quality checks, behind a two-tier cache.
//!
//! ## Pipeline
//! - [`AnalysisOrchestrator`]: the `analyze` entry point
//! - [`CacheManager`]: ephemeral ([`EphemeralTier`]) over durable ([`DurableStore`]) lookup
//! - [`CascadeExecutor`]: low-cost providers with retry, then the premium provider
//! - [`QualityValidator`]: the eight acceptance rules
//! - [`ProviderClient`]: one inference backend
//!
//! ## Test/Mock Support
//! [`MockDurableStore`], [`MockProvider`] and the `analysis::fixtures` payloads are
//! available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod cache;
pub mod cascade;
pub mod config;
pub mod gateway;
pub mod hashing;
pub mod orchestrator;
pub mod provider;
pub mod telemetry;
pub mod validation;

pub use analysis::{
    AnalysisCandidate, AnalysisRequest, AnalysisResult, CompatibilityDimension, Dimension,
    DimensionWeights, Recommendation, WeightsError, parse_candidate,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::MockDurableStore;
pub use cache::{
    CacheEntry, CacheError, CacheLookup, CacheManager, CacheTier, DurableStore, EntryMetadata,
    EphemeralTier, FileDurableStore,
};
pub use cascade::{
    AttemptOutcome, CascadeError, CascadeExecutor, CascadeOutcome, CascadePolicy, ProviderAttempt,
};
pub use config::{ConfigError, EngineConfig};
pub use gateway::{CACHE_SOURCE_HEADER, GatewayState, create_router};
pub use hashing::{CacheKey, cache_key_for, derive_cache_key, hash_snapshots};
pub use orchestrator::{
    AnalysisError, AnalysisOrchestrator, AnalysisOutcome, CacheSource, OrchestratorOptions,
    Provenance,
};
#[cfg(any(test, feature = "mock"))]
pub use provider::MockProvider;
pub use provider::{GenaiProvider, ProviderClient, ProviderError, RawOutput};
pub use telemetry::{EngineMetrics, MetricsSnapshot};
pub use validation::{QualityValidator, Validation, ValidationFailure, ValidationRule};
