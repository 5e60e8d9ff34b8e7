//! Two-tier cache: ephemeral in front of durable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::durable::DurableStore;
use super::ephemeral::EphemeralTier;
use super::types::{CacheEntry, CacheLookup, CacheTier, EntryMetadata, now_millis};
use crate::analysis::AnalysisResult;
use crate::hashing::CacheKey;

/// Hierarchical lookup with write-through stores.
///
/// The durable tier is an optimization like the ephemeral one: its failures are logged and
/// counted, and lookups degrade to ephemeral-only instead of failing.
pub struct CacheManager<D: DurableStore> {
    ephemeral: EphemeralTier,
    durable: D,
    backfill_ttl: Duration,
    durable_errors: AtomicU64,
}

impl<D: DurableStore> std::fmt::Debug for CacheManager<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("ephemeral", &self.ephemeral)
            .field("backfill_ttl", &self.backfill_ttl)
            .field("durable_errors", &self.durable_error_count())
            .finish_non_exhaustive()
    }
}

impl<D: DurableStore> CacheManager<D> {
    /// `backfill_ttl` caps the lifetime of ephemeral copies made from durable hits.
    pub fn new(ephemeral: EphemeralTier, durable: D, backfill_ttl: Duration) -> Self {
        Self {
            ephemeral,
            durable,
            backfill_ttl,
            durable_errors: AtomicU64::new(0),
        }
    }

    pub fn ephemeral(&self) -> &EphemeralTier {
        &self.ephemeral
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    /// Number of durable tier operations that failed since startup.
    pub fn durable_error_count(&self) -> u64 {
        self.durable_errors.load(Ordering::Relaxed)
    }

    pub async fn is_durable_ready(&self) -> bool {
        self.durable.is_ready().await
    }

    #[instrument(skip(self), fields(key = %key))]
    pub async fn lookup(&self, key: &CacheKey) -> CacheLookup {
        if let Some(entry) = self.ephemeral.get(key) {
            debug!("Ephemeral tier hit");
            return CacheLookup::Hit(entry);
        }

        debug!("Ephemeral miss, checking durable tier");

        let entry = match self.durable.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("Durable tier miss");
                return CacheLookup::Miss;
            }
            Err(e) => {
                self.durable_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Durable tier lookup failed, continuing without it");
                return CacheLookup::Miss;
            }
        };

        let now = now_millis();
        let Some(remaining) = entry.remaining_ttl(now) else {
            debug!(written_at = entry.written_at, "Durable entry expired");
            if let Err(e) = self.durable.remove(key).await {
                self.durable_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Failed to remove expired durable entry");
            }
            return CacheLookup::Miss;
        };

        let backfill = entry.retiered(CacheTier::Ephemeral, remaining.min(self.backfill_ttl));
        self.ephemeral.insert(backfill);

        info!(remaining_secs = remaining.as_secs(), "Durable tier hit, ephemeral backfilled");
        CacheLookup::Hit(entry)
    }

    /// Writes `value` to both tiers, replacing whatever was there.
    ///
    /// `ttl_ephemeral` is clamped to `ttl_durable` so the ephemeral copy never outlives
    /// the durable one.
    #[instrument(skip(self, value, metadata), fields(key = %key, model = %metadata.model_used))]
    pub async fn store(
        &self,
        key: CacheKey,
        value: AnalysisResult,
        metadata: EntryMetadata,
        ttl_ephemeral: Duration,
        ttl_durable: Duration,
    ) {
        let ttl_ephemeral = if ttl_ephemeral > ttl_durable {
            warn!(
                ephemeral_secs = ttl_ephemeral.as_secs(),
                durable_secs = ttl_durable.as_secs(),
                "Ephemeral TTL exceeds durable TTL, clamping"
            );
            ttl_durable
        } else {
            ttl_ephemeral
        };

        let durable_entry = CacheEntry::new(key, value, metadata, ttl_durable, CacheTier::Durable);
        let ephemeral_entry = durable_entry.retiered(CacheTier::Ephemeral, ttl_ephemeral);

        self.ephemeral.insert(ephemeral_entry);

        match self.durable.put(&durable_entry).await {
            Ok(()) => debug!("Stored in both tiers"),
            Err(e) => {
                self.durable_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Durable tier write failed, entry cached ephemerally only");
            }
        }
    }

    /// Drops `key` from both tiers.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn invalidate(&self, key: &CacheKey) {
        self.ephemeral.remove(key);
        if let Err(e) = self.durable.remove(key).await {
            self.durable_errors.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "Durable tier invalidation failed");
        } else {
            debug!("Invalidated in both tiers");
        }
    }
}
