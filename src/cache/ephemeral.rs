//! Ephemeral tier (in-memory).
//!
//! Keyed by [`CacheKey`]; each entry expires after its own TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::types::{CacheEntry, now_millis};
use crate::hashing::CacheKey;

struct EntryTtl;

impl Expiry<CacheKey, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    // Overwrites restart the clock with the new entry's TTL (last writer wins).
    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory cache with bounded capacity and per-entry expiry.
#[derive(Clone)]
pub struct EphemeralTier {
    entries: Arc<Cache<CacheKey, CacheEntry>>,
}

impl EphemeralTier {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a tier with a max entry capacity (LRU-style eviction).
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Arc::new(
                Cache::builder()
                    .max_capacity(capacity)
                    .expire_after(EntryTtl)
                    .build(),
            ),
        }
    }

    /// Returns the entry if present and not yet expired.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if entry.is_expired_at(now_millis()) {
            self.entries.invalidate(key);
            return None;
        }
        Some(entry)
    }

    #[inline]
    pub fn insert(&self, entry: CacheEntry) {
        self.entries.insert(entry.key, entry);
    }

    #[inline]
    pub fn remove(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    #[inline]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Runs pending maintenance so `len` reflects recent writes.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for EphemeralTier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EphemeralTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralTier")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
