//! Rule-based validation.
//!
//! Bounded heuristics with no I/O. The dangerous-operation check is a lint:
//! it is trivially evaded by rewriting the query and must never be used as
//! an authorization control.
//!
//! Only single-type relationship groups are checked against the schema.
//! Compound type lists such as `[:a|b]` are not decomposed and pass through
//! unchecked.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use nl2cypher_core::{GraphSchema, QueryValidator, ValidationOutcome};
use nl2cypher_query::lexer::{tokenize, Token, TokenKind};

use super::log_outcome;

static NODE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*(\w+)?\s*:\s*(\w+)\s*[){]").expect("node label pattern")
});

static RELATIONSHIP_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\s*(\w+)?\s*:\s*(\w+)\s*[\]*{]").expect("relationship type pattern")
});

static CREATE_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)node|relationship|label|index").expect("create target pattern"));

pub const EMPTY_QUERY: &str = "Query must not be empty";
pub const MATCH_WITHOUT_RETURN: &str = "MATCH query must contain a RETURN clause";
pub const VAGUE_CREATE: &str = "CREATE query should clearly create a node or relationship";

/// Write operations flagged by the lint, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DangerousOp {
    Drop,
    Delete,
    DetachDelete,
    Remove,
}

impl DangerousOp {
    fn message(self) -> &'static str {
        match self {
            Self::Drop => "DROP operation may be dangerous",
            Self::Delete => "DELETE operation requires caution",
            Self::DetachDelete => "DETACH DELETE operation is very dangerous",
            Self::Remove => "REMOVE operation requires caution",
        }
    }
}

/// Validator that checks structure and schema membership without a database.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedValidator;

impl RuleBasedValidator {
    pub fn new() -> Self {
        Self
    }

    /// All rule-based errors for `query`, deduplicated, in discovery order.
    pub fn check(&self, query: &str, schema: &GraphSchema) -> Vec<String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return vec![EMPTY_QUERY.to_string()];
        }

        let mut errors = Errors::default();
        let tokens = tokenize(trimmed);
        let significant: Vec<&Token<'_>> = tokens.iter().filter(|t| !t.is_trivia()).collect();

        for op in dangerous_ops(&significant) {
            errors.push(op.message().to_string());
        }

        let first = significant.first();
        if first.is_some_and(|t| t.is_keyword("MATCH"))
            && !significant.iter().any(|t| t.is_keyword("RETURN"))
        {
            errors.push(MATCH_WITHOUT_RETURN.to_string());
        }
        if first.is_some_and(|t| t.is_keyword("CREATE")) && !CREATE_TARGET.is_match(trimmed) {
            errors.push(VAGUE_CREATE.to_string());
        }

        let masked = mask_literals(&tokens);
        for caps in NODE_LABEL.captures_iter(&masked) {
            let label = &caps[2];
            if !schema.has_label(label) {
                errors.push(format!("Unknown node label: {label}"));
            }
        }
        for caps in RELATIONSHIP_TYPE.captures_iter(&masked) {
            let rel_type = &caps[2];
            if !schema.has_relationship(rel_type) {
                errors.push(format!("Unknown relationship type: {rel_type}"));
            }
        }

        errors.into_vec()
    }
}

#[async_trait]
impl QueryValidator for RuleBasedValidator {
    async fn validate(&self, query: &str, schema: &GraphSchema) -> ValidationOutcome {
        let outcome = ValidationOutcome::from_errors(self.check(query, schema));
        log_outcome(self.name(), &outcome);
        outcome
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }
}

/// Each kind is reported once. `DETACH DELETE` is its own kind and does not
/// also count as a bare `DELETE`.
fn dangerous_ops(tokens: &[&Token<'_>]) -> Vec<DangerousOp> {
    let mut found = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let op = if token.is_keyword("DROP") {
            DangerousOp::Drop
        } else if token.is_keyword("REMOVE") {
            DangerousOp::Remove
        } else if token.is_keyword("DETACH") && tokens.get(i + 1).is_some_and(|t| t.is_keyword("DELETE")) {
            DangerousOp::DetachDelete
        } else if token.is_keyword("DELETE") && !(i > 0 && tokens[i - 1].is_keyword("DETACH")) {
            DangerousOp::Delete
        } else {
            continue;
        };
        if !found.contains(&op) {
            found.push(op);
        }
    }
    found.sort_by_key(|op| *op as u8);
    found
}

/// Query text with string literals and comments blanked out, so labels are
/// never extracted from inside them.
fn mask_literals(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|t| match t.kind {
            TokenKind::Str | TokenKind::LineComment | TokenKind::BlockComment => {
                " ".repeat(t.text.len())
            }
            _ => t.text.to_string(),
        })
        .collect()
}

/// Error list that drops repeats.
#[derive(Default)]
struct Errors(Vec<String>);

impl Errors {
    fn push(&mut self, error: String) {
        if !self.0.contains(&error) {
            self.0.push(error);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::medical_schema;
    use test_case::test_case;

    fn check(query: &str) -> Vec<String> {
        RuleBasedValidator::new().check(query, &medical_schema())
    }

    #[test]
    fn test_valid_query_has_no_errors() {
        let errors = check(
            "MATCH (d:Disease)-[:has_symptom]->(s:Symptom) WHERE d.name = 'Flu' RETURN s.name",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test_case("" ; "empty")]
    #[test_case("   \n\t" ; "whitespace only")]
    fn test_empty_query(query: &str) {
        assert_eq!(check(query), vec![EMPTY_QUERY.to_string()]);
    }

    #[test]
    fn test_unknown_label_is_named() {
        let errors = check("MATCH (x:Foo) RETURN x");
        assert_eq!(errors, vec!["Unknown node label: Foo".to_string()]);
    }

    #[test]
    fn test_unknown_relationship_type_is_named() {
        let errors = check("MATCH (d:Disease)-[r:cures]->(x:Drug) RETURN x.name");
        assert_eq!(errors, vec!["Unknown relationship type: cures".to_string()]);
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(check("MATCH (d:disease) RETURN d").len(), 1);
    }

    #[test]
    fn test_label_with_property_map_is_checked() {
        let errors = check("MATCH (d:Illness {name: 'Flu'}) RETURN d");
        assert_eq!(errors, vec!["Unknown node label: Illness".to_string()]);
    }

    #[test]
    fn test_repeated_unknown_label_reported_once() {
        let errors = check("MATCH (a:Foo)-[:has_symptom]->(b:Foo) RETURN a, b");
        assert_eq!(errors, vec!["Unknown node label: Foo".to_string()]);
    }

    #[test]
    fn test_labels_inside_strings_are_ignored() {
        let errors = check("MATCH (d:Disease) WHERE d.desc = '(x:Foo)' RETURN d.name // (y:Bar)");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_compound_relationship_types_are_not_checked() {
        let errors = check("MATCH (d:Disease)-[:has_symptom|bogus]->(s) RETURN s");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_match_without_return() {
        assert_eq!(
            check("match (d:Disease) WHERE d.name = 'x'"),
            vec![MATCH_WITHOUT_RETURN.to_string()]
        );
    }

    #[test]
    fn test_return_inside_string_does_not_count() {
        assert!(check("MATCH (d:Disease) WHERE d.name = 'RETURN'")
            .contains(&MATCH_WITHOUT_RETURN.to_string()));
    }

    #[test]
    fn test_vague_create() {
        assert!(check("CREATE (d:Disease {name: 'x'})").contains(&VAGUE_CREATE.to_string()));
        assert!(!check("CREATE INDEX disease_name FOR (d:Disease) ON (d.name)")
            .contains(&VAGUE_CREATE.to_string()));
    }

    #[test_case("MATCH (d:Disease) DETACH DELETE d", &[DangerousOp::DetachDelete] ; "detach delete only")]
    #[test_case("MATCH (d:Disease) DELETE d", &[DangerousOp::Delete] ; "bare delete")]
    #[test_case("DROP INDEX foo", &[DangerousOp::Drop] ; "drop")]
    #[test_case("MATCH (d:Disease) REMOVE d.desc DELETE d", &[DangerousOp::Delete, DangerousOp::Remove] ; "two kinds in order")]
    #[test_case("MATCH (d:Disease) WHERE d.desc = 'delete me' RETURN d", &[] ; "inside string")]
    fn test_dangerous_operations(query: &str, expected: &[DangerousOp]) {
        let errors = check(query);
        let flagged: Vec<String> = expected.iter().map(|op| op.message().to_string()).collect();
        for message in &flagged {
            assert!(errors.contains(message), "{errors:?} missing {message}");
        }
        let all = [
            DangerousOp::Drop,
            DangerousOp::Delete,
            DangerousOp::DetachDelete,
            DangerousOp::Remove,
        ];
        for op in all.iter().filter(|op| !expected.contains(op)) {
            assert!(!errors.contains(&op.message().to_string()), "{errors:?}");
        }
    }

    #[tokio::test]
    async fn test_validate_marks_invalid_on_errors() {
        let outcome = RuleBasedValidator::new()
            .validate("MATCH (x:Foo) RETURN x", &medical_schema())
            .await;
        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 1);
    }
}
