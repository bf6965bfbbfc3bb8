//! Collaborator abstractions
//!
//! Core defines the seams; implementations depend on core:
//!
//! ```text
//! ┌──────────────────┐
//! │  nl2cypher-core  │  ← defines traits
//! │  - TextGenerator │
//! │  - GraphClient   │
//! │  - QueryValidator│
//! └────────┬─────────┘
//!          │ implemented by
//!          ▼
//! ┌──────────────────┐
//! │  nl2cypher-llm   │  OpenAI-compatible provider, mock provider
//! │  nl2cypher-graph │  Neo4j client, rule-based + live validators
//! └──────────────────┘
//! ```

pub mod graph;
pub mod llm;
pub mod validator;

pub use graph::{GraphClient, GraphError, GraphResult};
pub use llm::{GenerationParams, LlmError, LlmResult, TextGenerator};
pub use validator::QueryValidator;
