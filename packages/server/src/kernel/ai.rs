// AI provider implementations using rig.rs
//
// These are the infrastructure implementations of BaseSummaryModel.
// Business logic (what to prompt for) lives in the summaries domain.

use async_trait::async_trait;
use rig::completion::Prompt;
use rig::providers::{anthropic, openai};

use super::traits::BaseSummaryModel;
use crate::common::Error;

/// Primary summarization model.
pub const CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Fallback summarization model.
pub const OPENAI_MODEL: &str = "gpt-4-turbo-preview";

const MAX_COMPLETION_TOKENS: u64 = 2000;
const TEMPERATURE: f64 = 0.3;

/// Anthropic implementation of BaseSummaryModel
pub struct AnthropicClient {
    client: anthropic::Client,
}

impl AnthropicClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: anthropic::ClientBuilder::new(api_key).build(),
        }
    }
}

#[async_trait]
impl BaseSummaryModel for AnthropicClient {
    fn model_id(&self) -> &str {
        CLAUDE_MODEL
    }

    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        tracing::debug!(
            prompt_length = prompt.len(),
            model = CLAUDE_MODEL,
            "calling Anthropic API"
        );

        let agent = self
            .client
            .agent(CLAUDE_MODEL)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_COMPLETION_TOKENS)
            .build();

        let response = agent.prompt(prompt).await.map_err(|e| {
            tracing::error!(error = %e, model = CLAUDE_MODEL, "Anthropic API call failed");
            Error::Provider(format!("Anthropic API call failed: {e}"))
        })?;

        tracing::debug!(
            response_length = response.len(),
            model = CLAUDE_MODEL,
            "Anthropic API response received"
        );

        Ok(response)
    }
}

/// OpenAI implementation of BaseSummaryModel
pub struct OpenAIClient {
    client: openai::Client,
}

impl OpenAIClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: openai::Client::new(api_key),
        }
    }
}

#[async_trait]
impl BaseSummaryModel for OpenAIClient {
    fn model_id(&self) -> &str {
        OPENAI_MODEL
    }

    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        tracing::debug!(
            prompt_length = prompt.len(),
            model = OPENAI_MODEL,
            "calling OpenAI API"
        );

        let agent = self
            .client
            .agent(OPENAI_MODEL)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_COMPLETION_TOKENS)
            .build();

        let response = agent.prompt(prompt).await.map_err(|e| {
            tracing::error!(error = %e, model = OPENAI_MODEL, "OpenAI API call failed");
            Error::Provider(format!("OpenAI API call failed: {e}"))
        })?;

        tracing::debug!(
            response_length = response.len(),
            model = OPENAI_MODEL,
            "OpenAI API response received"
        );

        Ok(response)
    }
}
