//! Validation against a live database.

use std::sync::Arc;

use async_trait::async_trait;

use nl2cypher_core::{GraphClient, GraphSchema, QueryValidator, ValidationOutcome};
use nl2cypher_query::lexer::tokenize;

use super::log_outcome;
use super::rules::RuleBasedValidator;

pub const BAD_LEADING_KEYWORD: &str =
    "Query must start with MATCH, OPTIONAL MATCH, CREATE, MERGE, CALL, WITH or UNWIND";

const LEADING_KEYWORDS: &[&str] = &["MATCH", "OPTIONAL", "CREATE", "MERGE", "CALL", "WITH", "UNWIND"];

/// Rule-based checks plus an `EXPLAIN` dry run.
///
/// The dry run is the only check that catches genuine syntax errors. Each
/// validation borrows one session from the client for the duration of the
/// `EXPLAIN` call.
pub struct LiveValidator {
    graph: Arc<dyn GraphClient>,
    rules: RuleBasedValidator,
}

impl LiveValidator {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self {
            graph,
            rules: RuleBasedValidator::new(),
        }
    }
}

#[async_trait]
impl QueryValidator for LiveValidator {
    async fn validate(&self, query: &str, schema: &GraphSchema) -> ValidationOutcome {
        let mut errors = self.rules.check(query, schema);
        let query = query.trim();

        if !query.is_empty() {
            let tokens = tokenize(query);
            let leading = tokens.iter().find(|t| !t.is_trivia());
            if !leading.is_some_and(|t| LEADING_KEYWORDS.iter().any(|k| t.is_keyword(k))) {
                errors.push(BAD_LEADING_KEYWORD.to_string());
            }
            if let Err(e) = self.graph.explain(query).await {
                errors.push(format!("Syntax error: {e}"));
            }
        }

        let outcome = ValidationOutcome::from_errors(errors);
        log_outcome(self.name(), &outcome);
        outcome
    }

    fn name(&self) -> &'static str {
        "live"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::medical_schema;
    use nl2cypher_core::test_support::MockGraphClient;

    #[tokio::test]
    async fn test_explain_failure_is_reported_not_thrown() {
        let graph = Arc::new(MockGraphClient::new().failing_explain("Invalid input 'RETRUN'"));
        let validator = LiveValidator::new(graph.clone());

        let outcome = validator
            .validate("MATCH (d:Disease) RETRUN d RETURN d", &medical_schema())
            .await;

        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("Syntax error:"));
        assert!(outcome.errors[0].contains("RETRUN"));
        assert_eq!(graph.queries(), vec!["EXPLAIN MATCH (d:Disease) RETRUN d RETURN d"]);
    }

    #[tokio::test]
    async fn test_valid_query_passes() {
        let graph = Arc::new(MockGraphClient::new());
        let outcome = LiveValidator::new(graph)
            .validate("OPTIONAL MATCH (d:Drug) RETURN d.name", &medical_schema())
            .await;
        assert!(outcome.is_valid, "{:?}", outcome.errors);
    }

    #[tokio::test]
    async fn test_rule_errors_are_included() {
        let graph = Arc::new(MockGraphClient::new());
        let outcome = LiveValidator::new(graph)
            .validate("RETURN 1 // (x:Foo)\nMATCH (x:Foo) RETURN x", &medical_schema())
            .await;
        assert_eq!(
            outcome.errors,
            vec![
                "Unknown node label: Foo".to_string(),
                BAD_LEADING_KEYWORD.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_query_skips_database() {
        let graph = Arc::new(MockGraphClient::new());
        let outcome = LiveValidator::new(graph.clone())
            .validate("  ", &medical_schema())
            .await;
        assert!(!outcome.is_valid);
        assert!(graph.queries().is_empty());
    }
}
