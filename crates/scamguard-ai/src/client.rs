use crate::error::AiError;
use crate::extract::extract_json;
use crate::{Classifier, prompts};
use async_trait::async_trait;
use reqwest::Client;
use scamguard_types::models::{ModerationVerdict, ScamAnalysis, ScamChannel};
use serde_json::json;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Connection settings for the Anthropic Messages API. Analysis and
/// moderation can run on different models; moderation is the high-volume
/// path and usually gets the cheaper one.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub api_key: String,
    pub api_base: String,
    pub analysis_model: String,
    pub moderation_model: String,
}

pub struct AnthropicClient {
    config: ClassifierConfig,
    client: Client,
}

impl AnthropicClient {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// One Messages API round trip, returning the text of the first content
    /// block.
    async fn complete(&self, model: &str, prompt: &str, max_tokens: u32) -> Result<String, AiError> {
        debug!("Classifier call: model={} prompt_chars={}", model, prompt.chars().count());

        let response = self
            .client
            .post(format!("{}/messages", self.config.api_base))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": model,
                "max_tokens": max_tokens,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .map_err(|e| AiError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(AiError::Unavailable(format!("API answered {}", status)));
        }

        let data = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AiError::Unparseable(format!("non-JSON API response: {}", e)))?;

        if !status.is_success() {
            let message = data["error"]["message"].as_str().unwrap_or("unknown error");
            return Err(AiError::Api(format!("{}: {}", status, message)));
        }

        let text = data["content"][0]["text"]
            .as_str()
            .ok_or_else(|| AiError::Unparseable("reply without a text content block".to_string()))?;

        Ok(text.to_string())
    }

    fn parse_reply<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, AiError> {
        let object = extract_json(raw)
            .ok_or_else(|| AiError::Unparseable("no JSON object in reply".to_string()))?;
        serde_json::from_str(object).map_err(|e| AiError::Unparseable(e.to_string()))
    }
}

#[async_trait]
impl Classifier for AnthropicClient {
    async fn analyze_message(&self, text: &str) -> Result<ScamAnalysis, AiError> {
        let reply = self
            .complete(&self.config.analysis_model, &prompts::analysis(text), 1024)
            .await?;

        let analysis: ScamAnalysis = Self::parse_reply(&reply)?;
        analysis.check_bounds().map_err(AiError::Unparseable)?;
        Ok(analysis)
    }

    async fn moderate_post(
        &self,
        content: &str,
        channel: ScamChannel,
    ) -> Result<ModerationVerdict, AiError> {
        let reply = self
            .complete(
                &self.config.moderation_model,
                &prompts::post_review(content, channel),
                512,
            )
            .await?;

        Self::parse_reply(&reply)
    }

    async fn moderate_comment(&self, content: &str) -> Result<ModerationVerdict, AiError> {
        let reply = self
            .complete(
                &self.config.moderation_model,
                &prompts::comment_review(content),
                256,
            )
            .await?;

        Self::parse_reply(&reply)
    }
}
