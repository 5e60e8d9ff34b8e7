//! Inference backends behind [`ProviderClient`].

pub mod client;
pub mod error;
pub mod genai;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;

pub use client::{ProviderClient, RawOutput};
pub use error::{ProviderError, ProviderResult};
pub use self::genai::GenaiProvider;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockProvider;
