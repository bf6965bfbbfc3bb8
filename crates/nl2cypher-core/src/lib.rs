//! # nl2cypher core
//!
//! Domain types and collaborator abstractions shared by every nl2cypher crate.
//!
//! ## Architecture
//!
//! - **Types**: request/response payloads, validation outcomes, execution results
//! - **Schema**: the immutable [`GraphSchema`] loaded once at startup
//! - **Traits**: [`TextGenerator`], [`GraphClient`] and [`QueryValidator`], the
//!   seams behind which the LLM, the graph database and the two validation
//!   strategies live
//! - **Confidence**: the error-count based confidence score and execution threshold
//!
//! Core defines interfaces only. Implementations live in `nl2cypher-llm`
//! (text generation) and `nl2cypher-graph` (Neo4j client and validators), and
//! are injected by the web service at startup.

#![warn(clippy::all)]

pub mod confidence;
pub mod record;
pub mod schema;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use confidence::{confidence_for, is_executable, BASELINE_CONFIDENCE, EXECUTE_THRESHOLD};
pub use record::{RawRecord, RawValue, RecordMap, RecordValue};
pub use schema::{GraphSchema, NodeSchema, RelationshipSchema};
pub use traits::{
    GenerationParams, GraphClient, GraphError, GraphResult, LlmError, LlmResult, QueryValidator,
    TextGenerator,
};
pub use types::{
    ExecuteRequest, ExecutionResult, QueryRequest, QueryResponse, QueryType, ValidationOutcome,
    ValidationRequest, ValidationResponse,
};
