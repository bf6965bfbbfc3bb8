//! # nl2cypher graph layer
//!
//! Everything that touches the graph side of the gateway:
//!
//! - [`schema`]: the label/relationship catalogue queries are checked against
//! - [`validator`]: rule-based and live [`QueryValidator`](nl2cypher_core::QueryValidator) strategies
//! - [`neo4j`]: a [`GraphClient`](nl2cypher_core::GraphClient) over Bolt
//! - [`normalize`]: driver records to tagged, JSON-ready records
//!
//! ```rust
//! use nl2cypher_graph::{medical_schema, RuleBasedValidator};
//!
//! let errors = RuleBasedValidator::new().check("MATCH (x:Foo) RETURN x", &medical_schema());
//! assert_eq!(errors, vec!["Unknown node label: Foo".to_string()]);
//! ```

pub mod neo4j;
pub mod normalize;
pub mod schema;
pub mod validator;

pub use neo4j::Neo4jClient;
pub use normalize::{normalize_record, normalize_records, normalize_value};
pub use schema::{load_schema, medical_schema, resolve_schema, SchemaError};
pub use validator::{select_validator, LiveValidator, RuleBasedValidator};
