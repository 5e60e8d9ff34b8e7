use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure modes of a single provider invocation.
pub enum ProviderError {
    /// No response before the attempt deadline.
    #[error("provider '{provider}' timed out after {after:?}")]
    Timeout { provider: String, after: Duration },

    /// Backend reported its own timeout; the deadline is not known here.
    #[error("provider '{provider}' timed out: {reason}")]
    BackendTimeout { provider: String, reason: String },

    /// Backend refused the call because of quota or rate limits.
    #[error("provider '{provider}' rate limited: {reason}")]
    RateLimited { provider: String, reason: String },

    /// Backend answered, but not with usable text.
    #[error("provider '{provider}' returned malformed output: {reason}")]
    MalformedOutput { provider: String, reason: String },

    /// Backend could not be reached or failed internally.
    #[error("provider '{provider}' unavailable: {reason}")]
    Unavailable { provider: String, reason: String },
}

impl ProviderError {
    /// Returns `true` for errors worth retrying against the same provider.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ProviderError::MalformedOutput { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Timeout { .. } | ProviderError::BackendTimeout { .. } => "timeout",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::MalformedOutput { .. } => "malformed_output",
            ProviderError::Unavailable { .. } => "unavailable",
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Timeout { provider, .. }
            | ProviderError::BackendTimeout { provider, .. }
            | ProviderError::RateLimited { provider, .. }
            | ProviderError::MalformedOutput { provider, .. }
            | ProviderError::Unavailable { provider, .. } => provider,
        }
    }
}

/// Convenience result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;
