//! Scripted provider for tests and local runs.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::{ProviderClient, RawOutput};
use super::error::{ProviderError, ProviderResult};
use crate::analysis::AnalysisRequest;

/// Replays scripted responses in order, then keeps returning the fallback.
#[derive(Clone)]
pub struct MockProvider {
    id: String,
    cost_micros: u64,
    script: Arc<Mutex<VecDeque<ProviderResult<String>>>>,
    fallback: ProviderResult<String>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Provider that always answers with `text`.
    pub fn returning(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Ok(text.into()))
    }

    /// Provider that always fails with an error of the same kind as `error`.
    pub fn failing(id: impl Into<String>, error: fn(String) -> ProviderError) -> Self {
        let id = id.into();
        let err = error(id.clone());
        Self::new(id, Err(err))
    }

    fn new(id: impl Into<String>, fallback: ProviderResult<String>) -> Self {
        Self {
            id: id.into(),
            cost_micros: 0,
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Responses returned before the fallback, first one first.
    pub fn with_script(self, script: impl IntoIterator<Item = ProviderResult<String>>) -> Self {
        self.script.lock().extend(script);
        self
    }

    pub fn with_cost(mut self, cost_micros: u64) -> Self {
        self.cost_micros = cost_micros;
        self
    }

    /// Sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    /// `ProviderError::Unavailable` for `provider`, usable with [`MockProvider::failing`].
    pub fn unavailable(provider: String) -> ProviderError {
        ProviderError::Unavailable {
            provider,
            reason: "scripted outage".to_string(),
        }
    }

    pub fn rate_limited(provider: String) -> ProviderError {
        ProviderError::RateLimited {
            provider,
            reason: "scripted quota".to_string(),
        }
    }

    pub fn malformed(provider: String) -> ProviderError {
        ProviderError::MalformedOutput {
            provider,
            reason: "scripted garbage".to_string(),
        }
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("id", &self.id)
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn cost_estimate_micros(&self) -> u64 {
        self.cost_micros
    }

    async fn invoke(&self, _request: &AnalysisRequest) -> ProviderResult<RawOutput> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.clone()).map(RawOutput::new)
    }
}
