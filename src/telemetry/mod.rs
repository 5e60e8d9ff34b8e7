//! Process-wide counters.
//!
//! Requests accumulate into a local [`RequestMetrics`] and merge once at the end, so the
//! shared [`EngineMetrics`] only ever sees atomic adds.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::cache::CacheTier;
use crate::cascade::{AttemptOutcome, ProviderAttempt};

#[derive(Debug, Default)]
pub struct EngineMetrics {
    analyses: AtomicU64,
    ephemeral_hits: AtomicU64,
    durable_hits: AtomicU64,
    misses: AtomicU64,
    stale_invalidations: AtomicU64,
    provider_attempts: AtomicU64,
    transient_errors: AtomicU64,
    validation_failures: AtomicU64,
    premium_fallbacks: AtomicU64,
    failed_analyses: AtomicU64,
    estimated_cost_micros: AtomicU64,
}

/// Per-call accumulator, merged into [`EngineMetrics`] once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestMetrics {
    pub provider_attempts: u64,
    pub transient_errors: u64,
    pub validation_failures: u64,
    pub premium_fallbacks: u64,
    pub cost_micros: u64,
}

impl RequestMetrics {
    pub fn from_attempts(attempts: &[ProviderAttempt]) -> Self {
        let mut metrics = Self::default();
        for attempt in attempts {
            metrics.provider_attempts += 1;
            metrics.cost_micros = metrics.cost_micros.saturating_add(attempt.cost_micros);
            match attempt.outcome {
                AttemptOutcome::Success => {}
                AttemptOutcome::TransientError => metrics.transient_errors += 1,
                AttemptOutcome::ValidationFailure => metrics.validation_failures += 1,
            }
            if attempt.premium {
                metrics.premium_fallbacks += 1;
            }
        }
        metrics
    }
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self, tier: CacheTier) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
        match tier {
            CacheTier::Ephemeral => self.ephemeral_hits.fetch_add(1, Ordering::Relaxed),
            CacheTier::Durable => self.durable_hits.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale(&self) {
        self.stale_invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Merges one generated (or failed) call.
    pub fn merge(&self, request: &RequestMetrics, succeeded: bool) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.failed_analyses.fetch_add(1, Ordering::Relaxed);
        }
        self.provider_attempts
            .fetch_add(request.provider_attempts, Ordering::Relaxed);
        self.transient_errors
            .fetch_add(request.transient_errors, Ordering::Relaxed);
        self.validation_failures
            .fetch_add(request.validation_failures, Ordering::Relaxed);
        self.premium_fallbacks
            .fetch_add(request.premium_fallbacks, Ordering::Relaxed);
        self.estimated_cost_micros
            .fetch_add(request.cost_micros, Ordering::Relaxed);
    }

    /// `durable_errors` comes from the cache manager, which owns that counter.
    pub fn snapshot(&self, durable_errors: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses: self.analyses.load(Ordering::Relaxed),
            ephemeral_hits: self.ephemeral_hits.load(Ordering::Relaxed),
            durable_hits: self.durable_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_invalidations: self.stale_invalidations.load(Ordering::Relaxed),
            provider_attempts: self.provider_attempts.load(Ordering::Relaxed),
            transient_errors: self.transient_errors.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            premium_fallbacks: self.premium_fallbacks.load(Ordering::Relaxed),
            failed_analyses: self.failed_analyses.load(Ordering::Relaxed),
            durable_errors,
            estimated_cost_micros: self.estimated_cost_micros.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub analyses: u64,
    pub ephemeral_hits: u64,
    pub durable_hits: u64,
    pub misses: u64,
    pub stale_invalidations: u64,
    pub provider_attempts: u64,
    pub transient_errors: u64,
    pub validation_failures: u64,
    pub premium_fallbacks: u64,
    pub failed_analyses: u64,
    pub durable_errors: u64,
    pub estimated_cost_micros: u64,
}

impl MetricsSnapshot {
    /// Fraction of analyses served from either cache tier.
    pub fn hit_rate(&self) -> f64 {
        if self.analyses == 0 {
            return 0.0;
        }
        (self.ephemeral_hits + self.durable_hits) as f64 / self.analyses as f64
    }
}
