//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `MATCH_*` environment variables, then call
//! [`EngineConfig::validate`] before building the engine.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::DimensionWeights;
use crate::cascade::{CascadePolicy, DEFAULT_MAX_RETRIES};
use crate::orchestrator::{DEFAULT_DURABLE_TTL, DEFAULT_EPHEMERAL_TTL, OrchestratorOptions};

/// Low-cost models tried in order when `MATCH_LOW_COST_PROVIDERS` is not set.
pub const DEFAULT_LOW_COST_PROVIDERS: [&str; 2] = ["gpt-4o-mini", "claude-3-5-haiku-latest"];

/// Model used after the cascade is exhausted when `MATCH_PREMIUM_PROVIDER` is not set.
pub const DEFAULT_PREMIUM_PROVIDER: &str = "gpt-4o";

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory for the durable cache tier. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Max entries in the ephemeral tier. Default: `10_000`.
    pub ephemeral_capacity: u64,

    /// Low-cost models in cascade order.
    pub low_cost_providers: Vec<String>,

    pub premium_provider: String,

    /// Default: `true`.
    pub cascade_enabled: bool,

    /// Attempts per low-cost provider. Default: `2`.
    pub max_retries: u32,

    /// Default: `1000,2000` ms.
    pub backoff: Vec<Duration>,

    pub attempt_timeout: Duration,

    pub premium_timeout: Duration,

    pub escalation_budget: Duration,

    /// Default: 1 hour.
    pub ephemeral_ttl: Duration,

    /// Default: 7 days.
    pub durable_ttl: Duration,

    pub weights: DimensionWeights,

    pub low_cost_call_cost_micros: u64,

    pub premium_call_cost_micros: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let policy = CascadePolicy::default();
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            storage_path: PathBuf::from("./.data"),
            ephemeral_capacity: 10_000,
            low_cost_providers: DEFAULT_LOW_COST_PROVIDERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            premium_provider: DEFAULT_PREMIUM_PROVIDER.to_string(),
            cascade_enabled: true,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: policy.backoff,
            attempt_timeout: policy.attempt_timeout,
            premium_timeout: policy.premium_timeout,
            escalation_budget: policy.escalation_budget,
            ephemeral_ttl: DEFAULT_EPHEMERAL_TTL,
            durable_ttl: DEFAULT_DURABLE_TTL,
            weights: DimensionWeights::default(),
            low_cost_call_cost_micros: 300,
            premium_call_cost_micros: 5_000,
        }
    }
}

impl EngineConfig {
    const ENV_PORT: &'static str = "MATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "MATCH_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "MATCH_STORAGE_PATH";
    const ENV_EPHEMERAL_CAPACITY: &'static str = "MATCH_EPHEMERAL_CAPACITY";
    const ENV_LOW_COST_PROVIDERS: &'static str = "MATCH_LOW_COST_PROVIDERS";
    const ENV_PREMIUM_PROVIDER: &'static str = "MATCH_PREMIUM_PROVIDER";
    const ENV_CASCADE_ENABLED: &'static str = "MATCH_CASCADE_ENABLED";
    const ENV_MAX_RETRIES: &'static str = "MATCH_MAX_RETRIES";
    const ENV_BACKOFF_MS: &'static str = "MATCH_BACKOFF_MS";
    const ENV_ATTEMPT_TIMEOUT_SECS: &'static str = "MATCH_ATTEMPT_TIMEOUT_SECS";
    const ENV_PREMIUM_TIMEOUT_SECS: &'static str = "MATCH_PREMIUM_TIMEOUT_SECS";
    const ENV_ESCALATION_BUDGET_SECS: &'static str = "MATCH_ESCALATION_BUDGET_SECS";
    const ENV_EPHEMERAL_TTL_SECS: &'static str = "MATCH_EPHEMERAL_TTL_SECS";
    const ENV_DURABLE_TTL_SECS: &'static str = "MATCH_DURABLE_TTL_SECS";
    const ENV_DIMENSION_WEIGHTS: &'static str = "MATCH_DIMENSION_WEIGHTS";
    const ENV_LOW_COST_CALL_COST_MICROS: &'static str = "MATCH_LOW_COST_CALL_COST_MICROS";
    const ENV_PREMIUM_CALL_COST_MICROS: &'static str = "MATCH_PREMIUM_CALL_COST_MICROS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Values that are set but unparseable are errors, not silently defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let ephemeral_capacity =
            Self::parse_u64_from_env(Self::ENV_EPHEMERAL_CAPACITY, defaults.ephemeral_capacity)?;
        let low_cost_providers =
            Self::parse_list_from_env(Self::ENV_LOW_COST_PROVIDERS, defaults.low_cost_providers);
        let premium_provider = Self::parse_string_from_env(
            Self::ENV_PREMIUM_PROVIDER,
            defaults.premium_provider,
        );
        let cascade_enabled =
            Self::parse_bool_from_env(Self::ENV_CASCADE_ENABLED, defaults.cascade_enabled)?;
        let max_retries = Self::parse_u64_from_env(Self::ENV_MAX_RETRIES, defaults.max_retries.into())?;
        let max_retries = u32::try_from(max_retries).map_err(|_| ConfigError::InvalidNumber {
            name: Self::ENV_MAX_RETRIES,
            value: max_retries.to_string(),
        })?;
        let backoff = Self::parse_backoff_from_env(defaults.backoff)?;
        let attempt_timeout =
            Self::parse_secs_from_env(Self::ENV_ATTEMPT_TIMEOUT_SECS, defaults.attempt_timeout)?;
        let premium_timeout =
            Self::parse_secs_from_env(Self::ENV_PREMIUM_TIMEOUT_SECS, defaults.premium_timeout)?;
        let escalation_budget =
            Self::parse_secs_from_env(Self::ENV_ESCALATION_BUDGET_SECS, defaults.escalation_budget)?;
        let ephemeral_ttl =
            Self::parse_secs_from_env(Self::ENV_EPHEMERAL_TTL_SECS, defaults.ephemeral_ttl)?;
        let durable_ttl =
            Self::parse_secs_from_env(Self::ENV_DURABLE_TTL_SECS, defaults.durable_ttl)?;
        let weights = match env::var(Self::ENV_DIMENSION_WEIGHTS) {
            Ok(value) if !value.trim().is_empty() => DimensionWeights::parse_overrides(&value)?,
            _ => defaults.weights,
        };
        let low_cost_call_cost_micros = Self::parse_u64_from_env(
            Self::ENV_LOW_COST_CALL_COST_MICROS,
            defaults.low_cost_call_cost_micros,
        )?;
        let premium_call_cost_micros = Self::parse_u64_from_env(
            Self::ENV_PREMIUM_CALL_COST_MICROS,
            defaults.premium_call_cost_micros,
        )?;

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            ephemeral_capacity,
            low_cost_providers,
            premium_provider,
            cascade_enabled,
            max_retries,
            backoff,
            attempt_timeout,
            premium_timeout,
            escalation_budget,
            ephemeral_ttl,
            durable_ttl,
            weights,
            low_cost_call_cost_micros,
            premium_call_cost_micros,
        })
    }

    /// Checks the invariants the engine relies on (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;

        if self.cascade_enabled && self.low_cost_providers.is_empty() {
            return Err(ConfigError::EmptyProviderList);
        }
        if self.premium_provider.trim().is_empty() {
            return Err(ConfigError::MissingPremiumProvider);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidRetries);
        }
        if self.backoff.is_empty() {
            return Err(ConfigError::EmptyBackoff);
        }

        for (name, value) in [
            (Self::ENV_ATTEMPT_TIMEOUT_SECS, self.attempt_timeout),
            (Self::ENV_PREMIUM_TIMEOUT_SECS, self.premium_timeout),
            (Self::ENV_ESCALATION_BUDGET_SECS, self.escalation_budget),
            (Self::ENV_EPHEMERAL_TTL_SECS, self.ephemeral_ttl),
            (Self::ENV_DURABLE_TTL_SECS, self.durable_ttl),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration { name });
            }
        }

        if self.ephemeral_ttl > self.durable_ttl {
            return Err(ConfigError::TtlOrder {
                ephemeral: self.ephemeral_ttl,
                durable: self.durable_ttl,
            });
        }

        if self.ephemeral_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn cascade_policy(&self) -> CascadePolicy {
        CascadePolicy {
            max_retries: self.max_retries,
            backoff: self.backoff.clone(),
            attempt_timeout: self.attempt_timeout,
            premium_timeout: self.premium_timeout,
            escalation_budget: self.escalation_budget,
        }
    }

    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            cascade_enabled: self.cascade_enabled,
            ttl_ephemeral: self.ephemeral_ttl,
            ttl_durable: self.durable_ttl,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .map(|v| v.trim().to_string())
            .unwrap_or(default)
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => default,
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(var_name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        match env::var(var_name) {
            Ok(_) => Self::parse_u64_from_env(var_name, 0).map(Duration::from_secs),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_backoff_from_env(default: Vec<Duration>) -> Result<Vec<Duration>, ConfigError> {
        let Ok(value) = env::var(Self::ENV_BACKOFF_MS) else {
            return Ok(default);
        };

        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|ms| {
                ms.parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidNumber {
                        name: Self::ENV_BACKOFF_MS,
                        value: ms.to_string(),
                    })
            })
            .collect()
    }
}
