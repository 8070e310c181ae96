use crate::errors::{LlmError, LlmResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod google_provider;

pub use google_provider::GoogleProvider;

/// Request object for LLM providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_parameters(mut self, max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

/// Response object from LLM providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: String,
    pub response_time: Duration,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Provider identification
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderId {
    pub provider_type: String,
    pub model: String,
}

impl ProviderId {
    pub fn new(provider_type: &str, model: &str) -> Self {
        Self {
            provider_type: provider_type.to_string(),
            model: model.to_string(),
        }
    }
}

/// Remote generative-language provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique identifier for this provider instance
    fn id(&self) -> ProviderId;

    /// Execute a single completion request. No retries.
    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmResponse>;

    /// Count tokens for `text` without generating. Used as a cheap liveness probe.
    async fn count_tokens(&self, text: &str) -> LlmResult<u32>;

    /// Validate request before execution
    fn validate_request(&self, request: &LlmRequest) -> LlmResult<()> {
        if request.prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest("prompt is empty".to_string()));
        }

        if let Some(max_tokens) = request.max_tokens {
            if max_tokens == 0 {
                return Err(LlmError::InvalidRequest(
                    "max_tokens must be greater than zero".to_string(),
                ));
            }
        }

        if let Some(temperature) = request.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(LlmError::InvalidRequest(format!(
                    "temperature {temperature} outside 0.0..=2.0"
                )));
            }
        }

        Ok(())
    }

    /// Get human-readable name
    fn name(&self) -> String {
        let id = self.id();
        format!("{} ({})", id.provider_type, id.model)
    }
}
