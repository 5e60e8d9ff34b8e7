use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::hashing::CacheKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    Ephemeral,
    Durable,
}

impl CacheTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTier::Ephemeral => "ephemeral",
            CacheTier::Durable => "durable",
        }
    }
}

impl std::fmt::Display for CacheTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping stored next to a cached result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Provider that generated the result.
    pub model_used: String,
    /// Fingerprint of the snapshots the result was computed from.
    pub content_hash: u64,
}

/// A cached analysis in one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub value: AnalysisResult,
    pub metadata: EntryMetadata,
    /// Unix timestamp in milliseconds.
    pub written_at: i64,
    pub ttl: Duration,
    pub tier: CacheTier,
}

impl CacheEntry {
    pub fn new(
        key: CacheKey,
        value: AnalysisResult,
        metadata: EntryMetadata,
        ttl: Duration,
        tier: CacheTier,
    ) -> Self {
        Self {
            key,
            value,
            metadata,
            written_at: now_millis(),
            ttl,
            tier,
        }
    }

    #[inline]
    pub fn expires_at(&self) -> i64 {
        self.written_at
            .saturating_add(i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX))
    }

    #[inline]
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at()
    }

    /// Time left before expiry, `None` if already expired.
    pub fn remaining_ttl(&self, now_millis: i64) -> Option<Duration> {
        let remaining = self.expires_at().checked_sub(now_millis)?;
        if remaining <= 0 {
            return None;
        }
        Some(Duration::from_millis(remaining as u64))
    }

    /// Copy of this entry for another tier, written now.
    pub fn retiered(&self, tier: CacheTier, ttl: Duration) -> Self {
        Self::new(self.key, self.value.clone(), self.metadata.clone(), ttl, tier)
    }
}

/// Outcome of [`CacheManager::lookup`](super::CacheManager::lookup).
#[derive(Debug, Clone)]
pub enum CacheLookup {
    Hit(CacheEntry),
    Miss,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Tier that served the hit.
    pub fn tier(&self) -> Option<CacheTier> {
        match self {
            CacheLookup::Hit(entry) => Some(entry.tier),
            CacheLookup::Miss => None,
        }
    }

    pub fn into_entry(self) -> Option<CacheEntry> {
        match self {
            CacheLookup::Hit(entry) => Some(entry),
            CacheLookup::Miss => None,
        }
    }
}

#[inline]
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
