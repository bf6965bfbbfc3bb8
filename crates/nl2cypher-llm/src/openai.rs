//! OpenAI-compatible chat completion provider
//!
//! Works with any endpoint speaking the `/chat/completions` protocol
//! (OpenAI, DeepSeek, OpenRouter, local gateways).

use async_trait::async_trait;
use nl2cypher_core::{GenerationParams, LlmError, LlmResult, TextGenerator};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Chat-completion text generator
pub struct OpenAiCompatibleGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiCompatibleGenerator {
    /// Create a new generator
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        timeout_secs: u64,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        params: GenerationParams,
    ) -> LlmResult<String> {
        let api_request = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "stream": false,
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout.as_secs())
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        debug!(model = %self.model, chars = content.len(), "Received completion");
        Ok(content.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Chat completion response types
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_creation() {
        let generator = OpenAiCompatibleGenerator::new(
            "sk-test-key".to_string(),
            Some("http://localhost:9000/v1/".to_string()),
            "deepseek-chat".to_string(),
            60,
        );

        assert_eq!(generator.model(), "deepseek-chat");
        assert_eq!(generator.base_url(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_default_base_url() {
        let generator =
            OpenAiCompatibleGenerator::new("k".to_string(), None, "m".to_string(), 5);
        assert_eq!(generator.base_url(), DEFAULT_BASE_URL);
    }
}
