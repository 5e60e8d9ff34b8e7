use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::types::{AnalysisError, AnalysisOutcome, CacheSource, OrchestratorOptions, Provenance};
use crate::analysis::AnalysisRequest;
use crate::cache::{CacheLookup, CacheManager, DurableStore, EntryMetadata};
use crate::cascade::CascadeExecutor;
use crate::hashing::{cache_key_for, derive_cache_key, hash_snapshots};
use crate::provider::ProviderClient;
use crate::telemetry::{EngineMetrics, MetricsSnapshot, RequestMetrics};

/// Entry point: cache lookup, then the cascade on a miss, then write-through.
///
/// Concurrent calls for the same pair may both miss and both generate; the later write
/// wins. No per-key locking is done.
pub struct AnalysisOrchestrator<D: DurableStore> {
    cache: Arc<CacheManager<D>>,
    executor: CascadeExecutor,
    low_cost: Vec<Arc<dyn ProviderClient>>,
    premium: Arc<dyn ProviderClient>,
    options: OrchestratorOptions,
    metrics: Arc<EngineMetrics>,
}

impl<D: DurableStore> AnalysisOrchestrator<D> {
    pub fn new(
        cache: Arc<CacheManager<D>>,
        executor: CascadeExecutor,
        low_cost: Vec<Arc<dyn ProviderClient>>,
        premium: Arc<dyn ProviderClient>,
        options: OrchestratorOptions,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            cache,
            executor,
            low_cost,
            premium,
            options,
            metrics,
        }
    }

    pub fn cache(&self) -> &Arc<CacheManager<D>> {
        &self.cache
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.cache.durable_error_count())
    }

    /// Ids of the low-cost providers in cascade order.
    pub fn low_cost_ids(&self) -> Vec<&str> {
        self.low_cost.iter().map(|p| p.id()).collect()
    }

    pub fn premium_id(&self) -> &str {
        self.premium.id()
    }

    #[instrument(
        skip_all,
        fields(subject_id = %request.subject_id(), target_id = %request.target_id())
    )]
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        if request.subject_id().trim().is_empty() {
            return Err(AnalysisError::InvalidRequest("subjectId must not be empty".to_string()));
        }
        if request.target_id().trim().is_empty() {
            return Err(AnalysisError::InvalidRequest("targetId must not be empty".to_string()));
        }

        let key = cache_key_for(request);
        let fingerprint = hash_snapshots(request.profile_snapshot(), request.target_snapshot());

        match self.cache.lookup(&key).await {
            CacheLookup::Hit(entry) if entry.metadata.content_hash == fingerprint => {
                self.metrics.record_cache_hit(entry.tier);
                let source = CacheSource::from(entry.tier);
                debug!(cache_source = %source, model_used = %entry.metadata.model_used, "Cache hit");
                return Ok(AnalysisOutcome {
                    result: entry.value,
                    provenance: Provenance {
                        cached: true,
                        cache_source: source,
                        model_used: entry.metadata.model_used,
                    },
                });
            }
            CacheLookup::Hit(entry) => {
                info!(tier = %entry.tier, "Cached analysis is stale, recomputing");
                self.metrics.record_stale();
                self.metrics.record_miss();
                self.cache.invalidate(&key).await;
            }
            CacheLookup::Miss => self.metrics.record_miss(),
        }

        let low_cost: &[Arc<dyn ProviderClient>] = if self.options.cascade_enabled {
            &self.low_cost
        } else {
            debug!("Cascade disabled, using premium provider directly");
            &[]
        };

        let outcome = match self.executor.run(request, low_cost, &self.premium).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.metrics
                    .merge(&RequestMetrics::from_attempts(e.attempts()), false);
                warn!(error = %e, "Analysis failed");
                return Err(e.into());
            }
        };

        self.metrics
            .merge(&RequestMetrics::from_attempts(&outcome.attempts), true);

        self.cache
            .store(
                key,
                outcome.result.clone(),
                EntryMetadata {
                    model_used: outcome.model_used.clone(),
                    content_hash: fingerprint,
                },
                self.options.ttl_ephemeral,
                self.options.ttl_durable,
            )
            .await;

        info!(
            model_used = %outcome.model_used,
            overall_score = outcome.result.overall_score,
            attempts = outcome.attempts.len(),
            "Analysis generated"
        );

        Ok(AnalysisOutcome {
            result: outcome.result,
            provenance: Provenance {
                cached: false,
                cache_source: CacheSource::Generated,
                model_used: outcome.model_used,
            },
        })
    }

    /// Drops the cached analysis for a pair, e.g. after the profile or posting changed.
    pub async fn invalidate(&self, subject_id: &str, target_id: &str) {
        self.cache
            .invalidate(&derive_cache_key(subject_id, target_id))
            .await;
    }

    pub async fn is_ready(&self) -> bool {
        self.cache.is_durable_ready().await
    }
}
