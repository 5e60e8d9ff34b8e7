//! Provider backed by the multi-vendor `genai` client.

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, error};

use super::client::{ProviderClient, RawOutput};
use super::error::{ProviderError, ProviderResult};
use super::prompt::{system_prompt, user_prompt};
use crate::analysis::{AnalysisRequest, DimensionWeights};

/// Calls one `genai` model, e.g. `gpt-4o-mini` or `claude-3-5-haiku-latest`.
///
/// Vendor credentials come from the environment variables `genai` reads
/// (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, ...).
pub struct GenaiProvider {
    model: String,
    client: Client,
    cost_micros: u64,
    system_prompt: String,
    options: ChatOptions,
}

impl GenaiProvider {
    pub fn new(model: impl Into<String>, cost_micros: u64, weights: &DimensionWeights) -> Self {
        Self::with_client(Client::default(), model, cost_micros, weights)
    }

    pub fn with_client(
        client: Client,
        model: impl Into<String>,
        cost_micros: u64,
        weights: &DimensionWeights,
    ) -> Self {
        Self {
            model: model.into(),
            client,
            cost_micros,
            system_prompt: system_prompt(weights),
            options: ChatOptions::default().with_temperature(0.0),
        }
    }

    fn chat_request(&self, request: &AnalysisRequest) -> ChatRequest {
        ChatRequest::new(vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(user_prompt(request)),
        ])
    }
}

impl std::fmt::Debug for GenaiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiProvider")
            .field("model", &self.model)
            .field("cost_micros", &self.cost_micros)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderClient for GenaiProvider {
    fn id(&self) -> &str {
        &self.model
    }

    fn cost_estimate_micros(&self) -> u64 {
        self.cost_micros
    }

    async fn invoke(&self, request: &AnalysisRequest) -> ProviderResult<RawOutput> {
        let response = self
            .client
            .exec_chat(&self.model, self.chat_request(request), Some(&self.options))
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "Provider call failed");
                classify_error(&self.model, &e.to_string())
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::MalformedOutput {
                provider: self.model.clone(),
                reason: "empty completion".to_string(),
            });
        }

        debug!(model = %self.model, chars = text.len(), "Provider call succeeded");
        Ok(RawOutput::new(text))
    }
}

/// Maps a client error message onto the provider error taxonomy.
pub(crate) fn classify_error(provider: &str, message: &str) -> ProviderError {
    let lowered = message.to_ascii_lowercase();
    let provider = provider.to_string();
    let reason = message.to_string();

    if lowered.contains("429") || lowered.contains("rate limit") || lowered.contains("too many requests")
    {
        ProviderError::RateLimited { provider, reason }
    } else if lowered.contains("timed out") || lowered.contains("timeout") {
        ProviderError::BackendTimeout { provider, reason }
    } else {
        ProviderError::Unavailable { provider, reason }
    }
}
