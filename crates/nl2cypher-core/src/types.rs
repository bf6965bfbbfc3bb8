//! Request and response payloads.
//!
//! Field names serialize as snake_case. The camelCase spellings are accepted
//! on input as aliases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::RecordMap;

/// Kind of query the caller asks for. Prefixes the user prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    #[serde(alias = "match")]
    Match,
    #[serde(alias = "create")]
    Create,
    #[serde(alias = "merge")]
    Merge,
    #[serde(alias = "delete")]
    Delete,
    #[serde(alias = "set")]
    Set,
    #[serde(alias = "remove")]
    Remove,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::Create => "CREATE",
            Self::Merge => "MERGE",
            Self::Delete => "DELETE",
            Self::Set => "SET",
            Self::Remove => "REMOVE",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `generate` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(alias = "naturalLanguageQuery")]
    pub natural_language_query: String,
    #[serde(default, alias = "queryType", skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            natural_language_query: question.into(),
            query_type: None,
            limit: None,
        }
    }
}

/// `generate` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(alias = "cypherQuery")]
    pub cypher_query: String,
    pub explanation: String,
    pub confidence: f64,
    pub validated: bool,
    #[serde(default, alias = "validationErrors")]
    pub validation_errors: Vec<String>,
}

/// `validate` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    #[serde(alias = "cypherQuery")]
    pub cypher_query: String,
}

/// `execute` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(alias = "cypherQuery")]
    pub cypher_query: String,
}

/// `validate` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(alias = "isValid")]
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Result of validating one query. Valid iff `errors` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// `execute` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default)]
    pub records: Vec<RecordMap>,
    pub count: usize,
    /// Wall-clock seconds spent in the database.
    #[serde(alias = "executionTimeSeconds", alias = "executionTime")]
    pub execution_time: f64,
}
