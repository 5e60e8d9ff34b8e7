use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisRequest;

/// Stable, collision-resistant cache key for a `(subject_id, target_id)` pair.
///
/// Full 32-byte BLAKE3 output; rendered as lowercase hex for storage paths and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Derives the cache key for a subject/target pair.
///
/// Each id is length-prefixed so `("ab", "c")` and `("a", "bc")` never collide.
#[inline]
pub fn derive_cache_key(subject_id: &str, target_id: &str) -> CacheKey {
    let mut hasher = Hasher::new();
    hasher.update(&(subject_id.len() as u64).to_le_bytes());
    hasher.update(subject_id.as_bytes());
    hasher.update(&(target_id.len() as u64).to_le_bytes());
    hasher.update(target_id.as_bytes());
    CacheKey(*hasher.finalize().as_bytes())
}

#[inline]
pub fn cache_key_for(request: &AnalysisRequest) -> CacheKey {
    derive_cache_key(request.subject_id(), request.target_id())
}

/// 64-bit fingerprint of both snapshots, used to detect changed profile or posting content.
#[inline]
pub fn hash_snapshots(profile_snapshot: &str, target_snapshot: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(&(profile_snapshot.len() as u64).to_le_bytes());
    hasher.update(profile_snapshot.as_bytes());
    hasher.update(target_snapshot.as_bytes());

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
