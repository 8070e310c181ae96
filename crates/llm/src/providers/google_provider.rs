use super::{LlmProvider, LlmRequest, LlmResponse, ProviderId, TokenUsage};
use crate::errors::{LlmError, LlmResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Google Gemini provider over the `generativelanguage` REST API
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl GoogleProvider {
    pub fn new(api_key: String, model: String) -> LlmResult<Self> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration(
                "Google AI API key cannot be empty".to_string(),
            ));
        }

        let timeout = Duration::from_secs(10);
        Ok(Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Self::build_client(timeout)?,
            timeout,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> LlmResult<Self> {
        self.client = Self::build_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_client(timeout: Duration) -> LlmResult<Client> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {e}")))
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    async fn post_json<B, R>(&self, method: &str, body: &B) -> LlmResult<R>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.endpoint(method))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout_ms()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(LlmError::Http { status, message });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new("google", &self.model)
    }

    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmResponse> {
        let start_time = Instant::now();

        self.validate_request(&request)?;

        let google_request = GoogleRequest {
            contents: vec![GoogleContent::user(&request.prompt)],
            generation_config: Some(GoogleGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            }),
            safety_settings: Some(
                [
                    "HARM_CATEGORY_HARASSMENT",
                    "HARM_CATEGORY_HATE_SPEECH",
                    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
                    "HARM_CATEGORY_DANGEROUS_CONTENT",
                ]
                .into_iter()
                .map(|category| GoogleSafetySetting {
                    category: category.to_string(),
                    threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
                })
                .collect(),
            ),
        };

        debug!(
            model = %self.model,
            prompt_chars = request.prompt.len(),
            "Sending generateContent request to Google AI"
        );

        let google_response: GoogleResponse =
            self.post_json("generateContent", &google_request).await?;
        let elapsed = start_time.elapsed();

        let candidate = google_response.candidates.first().ok_or_else(|| {
            let reason = google_response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            LlmError::EmptyResponse(reason)
        })?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse(
                candidate
                    .finish_reason
                    .clone()
                    .unwrap_or_else(|| "no text in candidate".to_string()),
            ));
        }

        // Google AI API doesn't always provide exact counts
        let usage = match &google_response.usage_metadata {
            Some(meta) => TokenUsage::new(
                meta.prompt_token_count.unwrap_or(0),
                meta.candidates_token_count.unwrap_or(0),
            ),
            None => TokenUsage::new(request.prompt.len() as u32 / 4, text.len() as u32 / 4),
        };

        let finish_reason = candidate
            .finish_reason
            .as_ref()
            .map(|r| r.to_lowercase())
            .unwrap_or_else(|| "stop".to_string());

        if finish_reason == "max_tokens" {
            warn!(model = %self.model, "Google AI response truncated at max_output_tokens");
        }

        info!(
            model = %self.model,
            total_tokens = usage.total_tokens,
            response_time_ms = elapsed.as_secs_f64() * 1000.0,
            "Received response from Google AI"
        );

        Ok(LlmResponse {
            content: text,
            usage,
            model: self.model.clone(),
            finish_reason,
            response_time: elapsed,
        })
    }

    async fn count_tokens(&self, text: &str) -> LlmResult<u32> {
        let request = GoogleCountTokensRequest {
            contents: vec![GoogleContent::user(text)],
        };

        let response: GoogleCountTokensResponse = self.post_json("countTokens", &request).await?;
        Ok(response.total_tokens)
    }
}

// Google AI API specific request/response types
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleRequest {
    contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GoogleGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<GoogleSafetySetting>>,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleCountTokensRequest {
    contents: Vec<GoogleContent>,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleContent {
    parts: Vec<GooglePart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

impl GoogleContent {
    fn user(text: &str) -> Self {
        Self {
            parts: vec![GooglePart {
                text: Some(text.to_string()),
            }],
            role: Some("user".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GooglePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleSafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
    usage_metadata: Option<GoogleUsageMetadata>,
    prompt_feedback: Option<GooglePromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCandidate {
    content: Option<GoogleResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponseContent {
    #[serde(default)]
    parts: Vec<GoogleResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleUsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCountTokensResponse {
    total_tokens: u32,
}
