//! AI query relay - forwards a user question plus the sales context digest to
//! the language model.
//!
//! Every branch is reported as a `RelayOutcome`; turning an outcome into the
//! text shown to the user is left to the HTTP layer.

use crate::errors::LlmError;
use crate::providers::{LlmProvider, LlmRequest};
use common::OperationTimer;
use std::sync::Arc;
use tracing::{debug, error, info};

const PROMPT_INSTRUCTIONS: &str = "You are an AI sales analyst for a sales dashboard. \
Answer the question using only the sales data below. \
Be specific, cite names and figures from the data, and keep the answer under 200 words. \
If the data does not contain the answer, say so plainly.";

/// Generation options applied to every relayed question
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_output_tokens: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// No credential configured; nothing was sent
    Disabled,
    /// Question was empty or whitespace; nothing was sent
    EmptyQuestion,
    Answered(String),
    /// The remote call failed; the error has already been logged
    Failed(LlmError),
}

pub struct AiRelay {
    provider: Option<Arc<dyn LlmProvider>>,
    context: Arc<str>,
    settings: GenerationSettings,
}

impl AiRelay {
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        context: impl Into<Arc<str>>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            context: context.into(),
            settings,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn build_prompt(&self, question: &str) -> String {
        format!(
            "{PROMPT_INSTRUCTIONS}\n\nSALES DATA:\n{}\n\nQUESTION: {}\n\nANSWER:",
            self.context,
            question.trim()
        )
    }

    /// Credential check first, then blank-question check, then exactly one remote call.
    pub async fn answer(&self, question: &str) -> RelayOutcome {
        let Some(provider) = &self.provider else {
            debug!("AI relay disabled, skipping question");
            return RelayOutcome::Disabled;
        };

        if question.trim().is_empty() {
            return RelayOutcome::EmptyQuestion;
        }

        let request = LlmRequest::new(self.build_prompt(question)).with_parameters(
            Some(self.settings.max_output_tokens),
            Some(self.settings.temperature),
        );

        let mut timer = OperationTimer::new("ai_relay_answer");
        timer.add_field("provider", provider.name());
        timer.add_field("question_chars", question.len());

        let result = provider.complete(request).await;
        timer.finish_with_result(&result);

        match result {
            Ok(response) => {
                info!(
                    provider = %provider.name(),
                    total_tokens = response.usage.total_tokens,
                    finish_reason = %response.finish_reason,
                    "AI question answered"
                );
                RelayOutcome::Answered(response.content.trim().to_string())
            }
            Err(e) => {
                error!(
                    provider = %provider.name(),
                    error_kind = e.kind(),
                    error = %e,
                    "AI relay call failed"
                );
                RelayOutcome::Failed(e)
            }
        }
    }
}
