//! Text-generation providers for Cypher generation
//!
//! - [`OpenAiCompatibleGenerator`]: `/chat/completions` over HTTP
//! - [`prompts`]: system and user prompt templates plus sampling parameters
//! - `MockTextGenerator` (feature `test-utils`): deterministic replies for tests

pub mod openai;
pub mod prompts;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use openai::{OpenAiCompatibleGenerator, DEFAULT_BASE_URL};
pub use prompts::{
    cypher_system_prompt, explain_prompt, explanation_unavailable, suggestion_prompt,
    user_prompt, EXPLAIN_PARAMS, EXPLAIN_SYSTEM, GENERATE_PARAMS, NO_SUGGESTIONS, SUGGEST_SYSTEM,
};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockCall, MockTextGenerator};
