use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// Default attempts per low-cost provider.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Retry and escalation settings for one cascade run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePolicy {
    /// Maximum attempts against each low-cost provider, counting the first.
    pub max_retries: u32,
    /// Delay after the n-th failed attempt is `backoff[min(n - 1, len - 1)]`.
    pub backoff: Vec<Duration>,
    /// Deadline for a single low-cost attempt.
    pub attempt_timeout: Duration,
    /// Deadline for the premium call.
    pub premium_timeout: Duration,
    /// Time after which the cascade stops trying low-cost providers.
    pub escalation_budget: Duration,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: vec![Duration::from_secs(1), Duration::from_secs(2)],
            attempt_timeout: Duration::from_secs(30),
            premium_timeout: Duration::from_secs(60),
            escalation_budget: Duration::from_secs(90),
        }
    }
}

impl CascadePolicy {
    /// Backoff delay after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.backoff.is_empty() {
            return Duration::ZERO;
        }
        let index = (attempt.saturating_sub(1) as usize).min(self.backoff.len() - 1);
        self.backoff[index]
    }

    /// Worst-case backoff time across `providers` low-cost providers:
    /// `providers × max_retries × max(backoff)`.
    pub fn backoff_ceiling(&self, providers: usize) -> Duration {
        let max_delay = self.backoff.iter().max().copied().unwrap_or(Duration::ZERO);
        let multiplier = (providers as u32).saturating_mul(self.max_retries);
        max_delay.saturating_mul(multiplier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    TransientError,
    ValidationFailure,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::TransientError => "transient_error",
            AttemptOutcome::ValidationFailure => "validation_failure",
        }
    }
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one provider invocation within a cascade run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAttempt {
    pub provider_id: String,
    /// 1-based, per provider.
    pub attempt_number: u32,
    pub duration_ms: u64,
    pub outcome: AttemptOutcome,
    pub premium: bool,
    pub cost_micros: u64,
    /// Error or first failing rule, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProviderAttempt {
    pub fn is_failure(&self) -> bool {
        self.outcome != AttemptOutcome::Success
    }
}

/// A validated result and how the cascade got there.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub result: AnalysisResult,
    pub model_used: String,
    pub attempts: Vec<ProviderAttempt>,
}

impl CascadeOutcome {
    /// `true` if the premium provider produced the result.
    pub fn escalated(&self) -> bool {
        self.attempts.last().is_some_and(|a| a.premium)
    }

    pub fn failed_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_failure()).count()
    }
}
