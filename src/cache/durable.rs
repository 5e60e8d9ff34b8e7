//! Durable tier backends.
//!
//! [`FileDurableStore`] keeps one JSON file per key under a root directory, sharded by the
//! first byte of the key. Writes go to a temp file first and are renamed into place, so a
//! reader never observes a partial entry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{CacheError, CacheResult};
use super::types::CacheEntry;
use crate::hashing::CacheKey;

const ENTRY_EXTENSION: &str = "json";

const TEMP_EXTENSION: &str = "json.tmp";

/// Backend for the long-lived cache tier.
pub trait DurableStore: Send + Sync {
    /// Returns `true` if the backend can serve requests.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Loads the entry stored under `key`, if any. Expiry is the caller's concern.
    fn get(
        &self,
        key: &CacheKey,
    ) -> impl std::future::Future<Output = CacheResult<Option<CacheEntry>>> + Send;

    /// Stores `entry` under its key, replacing any previous entry.
    fn put(&self, entry: &CacheEntry) -> impl std::future::Future<Output = CacheResult<()>> + Send;

    /// Removes the entry under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &CacheKey) -> impl std::future::Future<Output = CacheResult<()>> + Send;
}

#[derive(Debug, Clone)]
pub struct FileDurableStore {
    root: PathBuf,
}

impl FileDurableStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist.
    pub async fn ensure_root(&self) -> CacheResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| unavailable(&self.root, e))
    }

    fn shard_dir(&self, key: &CacheKey) -> PathBuf {
        let hex = key.to_hex();
        self.root.join(&hex[..2])
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.shard_dir(key)
            .join(format!("{}.{}", key.to_hex(), ENTRY_EXTENSION))
    }

    fn temp_entry_path(&self, key: &CacheKey) -> PathBuf {
        // Unique per write so concurrent writers of one key never share a temp file.
        self.shard_dir(key).join(format!(
            "{}.{}.{}",
            key.to_hex(),
            uuid::Uuid::new_v4().simple(),
            TEMP_EXTENSION
        ))
    }
}

impl DurableStore for FileDurableStore {
    async fn is_ready(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unavailable(&path, e)),
        };

        let entry = serde_json::from_slice::<CacheEntry>(&bytes).map_err(|e| {
            CacheError::CorruptEntry {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Some(entry))
    }

    async fn put(&self, entry: &CacheEntry) -> CacheResult<()> {
        let bytes = serde_json::to_vec(entry)?;

        let dir = self.shard_dir(&entry.key);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| unavailable(&dir, e))?;

        let temp_path = self.temp_entry_path(&entry.key);
        let final_path = self.entry_path(&entry.key);

        tokio::fs::write(&temp_path, &bytes)
            .await
            .map_err(|e| unavailable(&temp_path, e))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(unavailable(&final_path, e));
        }

        debug!(key = %entry.key, path = %final_path.display(), "Durable entry written");
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        let path = self.entry_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable(&path, e)),
        }
    }
}

fn unavailable(path: &Path, e: std::io::Error) -> CacheError {
    CacheError::DurableUnavailable {
        reason: format!("{}: {}", path.display(), e),
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockDurableStore;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use parking_lot::RwLock;

    use super::{CacheError, CacheResult, DurableStore};
    use crate::cache::types::CacheEntry;
    use crate::hashing::CacheKey;

    /// In-memory durable tier that can simulate an outage.
    #[derive(Default, Clone)]
    pub struct MockDurableStore {
        entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
        unavailable: Arc<AtomicBool>,
        puts: Arc<AtomicUsize>,
        gets: Arc<AtomicUsize>,
    }

    impl MockDurableStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every operation fail with [`CacheError::DurableUnavailable`].
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::Release);
        }

        /// Inserts directly, bypassing availability checks.
        pub fn insert(&self, entry: CacheEntry) {
            self.entries.write().insert(entry.key, entry);
        }

        pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
            self.entries.read().get(key).cloned()
        }

        pub fn len(&self) -> usize {
            self.entries.read().len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.read().is_empty()
        }

        pub fn put_count(&self) -> usize {
            self.puts.load(Ordering::Acquire)
        }

        pub fn get_count(&self) -> usize {
            self.gets.load(Ordering::Acquire)
        }

        fn check_available(&self) -> CacheResult<()> {
            if self.unavailable.load(Ordering::Acquire) {
                return Err(CacheError::DurableUnavailable {
                    reason: "mock durable store is offline".to_string(),
                });
            }
            Ok(())
        }
    }

    impl DurableStore for MockDurableStore {
        async fn is_ready(&self) -> bool {
            !self.unavailable.load(Ordering::Acquire)
        }

        async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
            self.gets.fetch_add(1, Ordering::AcqRel);
            self.check_available()?;
            Ok(self.entries.read().get(key).cloned())
        }

        async fn put(&self, entry: &CacheEntry) -> CacheResult<()> {
            self.puts.fetch_add(1, Ordering::AcqRel);
            self.check_available()?;
            self.entries.write().insert(entry.key, entry.clone());
            Ok(())
        }

        async fn remove(&self, key: &CacheKey) -> CacheResult<()> {
            self.check_available()?;
            self.entries.write().remove(key);
            Ok(())
        }
    }
}
