//! Validation-gated cascade over low-cost providers with premium fallback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use super::error::{CascadeError, CascadeResult};
use super::types::{AttemptOutcome, CascadeOutcome, CascadePolicy, ProviderAttempt};
use crate::analysis::{AnalysisRequest, AnalysisResult, parse_candidate};
use crate::provider::{ProviderClient, ProviderError, ProviderResult, RawOutput};
use crate::validation::QualityValidator;

/// Runs providers in declared order until one produces a valid analysis.
///
/// Transient errors are retried against the same provider with backoff. Output that does
/// not parse or validate moves straight on to the next provider. Once every low-cost
/// provider is spent, or the escalation budget runs out, the premium provider is called
/// exactly once. A low-cost call never runs past the end of the budget.
#[derive(Debug, Clone, Default)]
pub struct CascadeExecutor {
    policy: CascadePolicy,
    validator: QualityValidator,
}

enum Verdict {
    Accepted(AnalysisResult),
    Rejected(String),
}

impl CascadeExecutor {
    pub fn new(policy: CascadePolicy, validator: QualityValidator) -> Self {
        Self { policy, validator }
    }

    pub fn policy(&self) -> &CascadePolicy {
        &self.policy
    }

    pub fn validator(&self) -> &QualityValidator {
        &self.validator
    }

    #[instrument(
        skip_all,
        fields(subject_id = %request.subject_id(), target_id = %request.target_id())
    )]
    pub async fn run(
        &self,
        request: &AnalysisRequest,
        low_cost: &[Arc<dyn ProviderClient>],
        premium: &Arc<dyn ProviderClient>,
    ) -> CascadeResult<CascadeOutcome> {
        let started = Instant::now();
        let mut attempts = Vec::new();

        'providers: for provider in low_cost {
            for attempt_number in 1..=self.policy.max_retries {
                let elapsed = started.elapsed();
                if elapsed >= self.policy.escalation_budget {
                    warn!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        budget_ms = self.policy.escalation_budget.as_millis() as u64,
                        "Escalation budget spent, skipping remaining low-cost providers"
                    );
                    break 'providers;
                }

                let timeout = self
                    .policy
                    .attempt_timeout
                    .min(self.policy.escalation_budget - elapsed);
                let call_started = Instant::now();
                let response = invoke_detached(provider, request, timeout).await;
                let duration = call_started.elapsed();

                match response {
                    Ok(raw) => match self.judge(&raw) {
                        Verdict::Accepted(result) => {
                            attempts.push(record(
                                provider.as_ref(),
                                attempt_number,
                                duration,
                                AttemptOutcome::Success,
                                false,
                                None,
                            ));
                            info!(
                                model_used = %provider.id(),
                                attempts = attempts.len(),
                                "Cascade accepted low-cost result"
                            );
                            return Ok(CascadeOutcome {
                                result,
                                model_used: provider.id().to_string(),
                                attempts,
                            });
                        }
                        Verdict::Rejected(reason) => {
                            attempts.push(record(
                                provider.as_ref(),
                                attempt_number,
                                duration,
                                AttemptOutcome::ValidationFailure,
                                false,
                                Some(reason),
                            ));
                            continue 'providers;
                        }
                    },
                    Err(e) if e.is_transient() => {
                        attempts.push(record(
                            provider.as_ref(),
                            attempt_number,
                            duration,
                            AttemptOutcome::TransientError,
                            false,
                            Some(e.to_string()),
                        ));
                        if attempt_number < self.policy.max_retries {
                            let remaining =
                                self.policy.escalation_budget.saturating_sub(started.elapsed());
                            let delay = self.policy.delay_after(attempt_number).min(remaining);
                            debug!(
                                provider = %provider.id(),
                                delay_ms = delay.as_millis() as u64,
                                "Backing off before retry"
                            );
                            tokio::time::sleep(delay).await;
                        }
                    }
                    Err(e) => {
                        attempts.push(record(
                            provider.as_ref(),
                            attempt_number,
                            duration,
                            AttemptOutcome::ValidationFailure,
                            false,
                            Some(e.to_string()),
                        ));
                        continue 'providers;
                    }
                }
            }
        }

        if !low_cost.is_empty() {
            info!(
                premium = %premium.id(),
                failed_attempts = attempts.len(),
                "Low-cost providers exhausted, escalating"
            );
        }

        self.run_premium(request, premium, attempts).await
    }

    async fn run_premium(
        &self,
        request: &AnalysisRequest,
        premium: &Arc<dyn ProviderClient>,
        mut attempts: Vec<ProviderAttempt>,
    ) -> CascadeResult<CascadeOutcome> {
        let call_started = Instant::now();
        let response = invoke_detached(premium, request, self.policy.premium_timeout).await;
        let duration = call_started.elapsed();

        let raw = match response {
            Ok(raw) => raw,
            Err(e) => {
                let outcome = if e.is_transient() {
                    AttemptOutcome::TransientError
                } else {
                    AttemptOutcome::ValidationFailure
                };
                attempts.push(record(
                    premium.as_ref(),
                    1,
                    duration,
                    outcome,
                    true,
                    Some(e.to_string()),
                ));
                return Err(CascadeError::PremiumFailed {
                    source: e,
                    attempts,
                });
            }
        };

        match self.judge(&raw) {
            Verdict::Accepted(result) => {
                attempts.push(record(
                    premium.as_ref(),
                    1,
                    duration,
                    AttemptOutcome::Success,
                    true,
                    None,
                ));
                Ok(CascadeOutcome {
                    result,
                    model_used: premium.id().to_string(),
                    attempts,
                })
            }
            Verdict::Rejected(reason) => {
                attempts.push(record(
                    premium.as_ref(),
                    1,
                    duration,
                    AttemptOutcome::ValidationFailure,
                    true,
                    Some(reason.clone()),
                ));
                Err(CascadeError::PremiumRejected {
                    provider: premium.id().to_string(),
                    reason,
                    attempts,
                })
            }
        }
    }

    fn judge(&self, raw: &RawOutput) -> Verdict {
        let candidate = match parse_candidate(raw.as_str()) {
            Ok(candidate) => candidate,
            Err(e) => return Verdict::Rejected(e.to_string()),
        };
        match self.validator.accept(candidate) {
            Ok(result) => Verdict::Accepted(result),
            Err(failure) => Verdict::Rejected(failure.to_string()),
        }
    }
}

/// Runs the call on its own task so that dropping the caller leaves it to finish or
/// time out on its own.
async fn invoke_detached(
    provider: &Arc<dyn ProviderClient>,
    request: &AnalysisRequest,
    timeout: Duration,
) -> ProviderResult<RawOutput> {
    let provider = Arc::clone(provider);
    let request = request.clone();
    let id = provider.id().to_string();

    let handle = tokio::spawn(async move {
        tokio::time::timeout(timeout, provider.invoke(&request)).await
    });

    match handle.await {
        Ok(Ok(result)) => result,
        Ok(Err(_elapsed)) => Err(ProviderError::Timeout {
            provider: id,
            after: timeout,
        }),
        Err(join_err) => Err(ProviderError::Unavailable {
            provider: id,
            reason: format!("provider task failed: {join_err}"),
        }),
    }
}

fn record(
    provider: &dyn ProviderClient,
    attempt_number: u32,
    duration: Duration,
    outcome: AttemptOutcome,
    premium: bool,
    detail: Option<String>,
) -> ProviderAttempt {
    let attempt = ProviderAttempt {
        provider_id: provider.id().to_string(),
        attempt_number,
        duration_ms: duration.as_millis() as u64,
        outcome,
        premium,
        cost_micros: provider.cost_estimate_micros(),
        detail,
    };

    match outcome {
        AttemptOutcome::Success => info!(
            provider = %attempt.provider_id,
            attempt = attempt.attempt_number,
            duration_ms = attempt.duration_ms,
            premium,
            outcome = %outcome,
            "Provider attempt"
        ),
        _ => warn!(
            provider = %attempt.provider_id,
            attempt = attempt.attempt_number,
            duration_ms = attempt.duration_ms,
            premium,
            outcome = %outcome,
            detail = attempt.detail.as_deref().unwrap_or_default(),
            "Provider attempt"
        ),
    }

    attempt
}
