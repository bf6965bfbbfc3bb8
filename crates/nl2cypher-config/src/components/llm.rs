//! Text-generation provider configuration

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL up to, not including, `/chat/completions`. Provider default when unset.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Token budget for explanations and suggestions.
    pub explain_max_tokens: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// The API key, when one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: "deepseek-chat".to_string(),
            temperature: 0.1,
            max_tokens: 2048,
            explain_max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}
