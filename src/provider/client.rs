use async_trait::async_trait;

use super::error::ProviderResult;
use crate::analysis::AnalysisRequest;

/// Unparsed text returned by a provider.
///
/// Parsing belongs to the caller, so malformed text surfaces as a validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput(String);

impl RawOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
/// One inference backend behind a uniform call contract.
pub trait ProviderClient: Send + Sync {
    /// Identifier recorded as `model_used`.
    fn id(&self) -> &str;

    /// Approximate cost of one call, in micro-dollars.
    fn cost_estimate_micros(&self) -> u64;

    /// Sends `request` to the backend. Deadlines are applied by the caller.
    async fn invoke(&self, request: &AnalysisRequest) -> ProviderResult<RawOutput>;
}
