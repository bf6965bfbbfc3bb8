//! Mock text generator for testing
//!
//! Replies are chosen by matching a configured fragment against the system
//! prompt, so one mock can stand in for the generation, explanation and
//! suggestion calls of a single request.

use async_trait::async_trait;
use nl2cypher_core::{GenerationParams, LlmError, LlmResult, TextGenerator};
use std::sync::Mutex;

/// Record of one call to the mock
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub system: String,
    pub user: String,
    pub params: GenerationParams,
}

enum Reply {
    Text(String),
    Fail(LlmError),
}

/// Deterministic [`TextGenerator`] for tests
pub struct MockTextGenerator {
    model_name: String,
    replies: Vec<(String, Reply)>,
    default_response: String,
    call_history: Mutex<Vec<MockCall>>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            model_name: "mock-llm".to_string(),
            replies: Vec::new(),
            default_response: "This is a mock response.".to_string(),
            call_history: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `response` when the system prompt contains `fragment`.
    pub fn respond_when(mut self, fragment: impl Into<String>, response: impl Into<String>) -> Self {
        self.replies
            .push((fragment.into(), Reply::Text(response.into())));
        self
    }

    /// Fail with `error` when the system prompt contains `fragment`.
    pub fn fail_when(mut self, fragment: impl Into<String>, error: LlmError) -> Self {
        self.replies.push((fragment.into(), Reply::Fail(error)));
        self
    }

    /// Reply used when no fragment matches.
    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_history
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        params: GenerationParams,
    ) -> LlmResult<String> {
        if let Ok(mut calls) = self.call_history.lock() {
            calls.push(MockCall {
                system: system.to_string(),
                user: user.to_string(),
                params,
            });
        }
        match self.replies.iter().find(|(fragment, _)| system.contains(fragment.as_str())) {
            Some((_, Reply::Text(text))) => Ok(text.clone()),
            Some((_, Reply::Fail(error))) => Err(error.clone()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reply_selected_by_system_prompt() {
        let mock = MockTextGenerator::new()
            .respond_when("Cypher generator", "MATCH (n) RETURN n")
            .fail_when("Explain", LlmError::Timeout(1));

        let params = GenerationParams::default();
        assert_eq!(
            mock.generate("You are a Cypher generator", "q", params).await.unwrap(),
            "MATCH (n) RETURN n"
        );
        assert!(mock.generate("Explain things", "q", params).await.is_err());
        assert_eq!(
            mock.generate("other", "q", params).await.unwrap(),
            "This is a mock response."
        );
        assert_eq!(mock.calls().len(), 3);
        assert_eq!(mock.calls()[0].user, "q");
    }
}
