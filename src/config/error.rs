//! Configuration error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::analysis::WeightsError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to parse {name}='{value}' as a number")]
    InvalidNumber { name: &'static str, value: String },

    #[error("failed to parse {name}='{value}' as a boolean")]
    InvalidBool { name: &'static str, value: String },

    /// Dimension weights are malformed or do not sum to 100.
    #[error("invalid dimension weights: {0}")]
    InvalidWeights(#[from] WeightsError),

    #[error("at least one low-cost provider must be configured while the cascade is enabled")]
    EmptyProviderList,

    #[error("premium provider must be configured")]
    MissingPremiumProvider,

    #[error("max retries must be at least 1")]
    InvalidRetries,

    #[error("backoff schedule must contain at least one delay")]
    EmptyBackoff,

    /// A timeout or TTL that must be positive is zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    #[error("ephemeral TTL {ephemeral:?} exceeds durable TTL {durable:?}")]
    TtlOrder { ephemeral: Duration, durable: Duration },

    #[error("ephemeral cache capacity must be greater than zero")]
    ZeroCapacity,

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
