//! Text-generation collaborator
//!
//! The generator turns a system prompt plus a user prompt into free-form text.
//! Its output is untrusted and lexically inconsistent; every caller runs it
//! through the query normalization pipeline before use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Common result type for text generation
pub type LlmResult<T> = Result<T, LlmError>;

/// Text generation errors
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),
}

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new(0.1, 2048)
    }
}

/// A text-generation backend.
///
/// Implementations must be `Send + Sync`; a single instance is shared by every
/// in-flight request.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `user` under the instructions in `system`.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        params: GenerationParams,
    ) -> LlmResult<String>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
