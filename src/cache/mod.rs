//! Two-tier analysis cache and its durable backends.

pub mod durable;
pub mod ephemeral;
pub mod error;
pub mod manager;
pub mod types;


#[cfg(any(test, feature = "mock"))]
pub use durable::MockDurableStore;
pub use durable::{DurableStore, FileDurableStore};
pub use ephemeral::EphemeralTier;
pub use error::{CacheError, CacheResult};
pub use manager::CacheManager;
pub use types::{CacheEntry, CacheLookup, CacheTier, EntryMetadata};
