use thiserror::Error;

use super::types::ProviderAttempt;
use crate::provider::ProviderError;

#[derive(Debug, Error)]
/// Fatal cascade failures. Everything else is recovered inside the run.
pub enum CascadeError {
    /// Every low-cost provider was exhausted and the premium call failed.
    #[error("premium provider failed after cascade exhaustion: {source}")]
    PremiumFailed {
        #[source]
        source: ProviderError,
        attempts: Vec<ProviderAttempt>,
    },

    /// The premium provider answered with output that did not validate.
    #[error("premium provider '{provider}' returned an invalid analysis: {reason}")]
    PremiumRejected {
        provider: String,
        reason: String,
        attempts: Vec<ProviderAttempt>,
    },
}

impl CascadeError {
    /// Attempts made before the failure, premium included.
    pub fn attempts(&self) -> &[ProviderAttempt] {
        match self {
            CascadeError::PremiumFailed { attempts, .. }
            | CascadeError::PremiumRejected { attempts, .. } => attempts,
        }
    }
}

/// Convenience result type for cascade runs.
pub type CascadeResult<T> = Result<T, CascadeError>;
