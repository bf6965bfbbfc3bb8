//! Multi-type relationship repair: `[r:a|:b|:c]` becomes `[r:a|b|c]`.

use super::QueryTransform;
use crate::lexer::{prev_significant, tokenize};

/// Remove the leading colon from every type after the first in a
/// `|`-separated type list.
///
/// Runs one repair per pass until a pass finds nothing left to fix, so the
/// result is a fixed point.
pub fn fix_relationship_types(query: &str) -> String {
    let mut current = query.to_string();
    while let Some(next) = fix_first(&current) {
        current = next;
    }
    current
}

/// Remove the first `:` that follows `type |`.
fn fix_first(query: &str) -> Option<String> {
    let tokens = tokenize(query);
    let colon = tokens.iter().enumerate().find_map(|(i, token)| {
        if !token.is_punct(':') {
            return None;
        }
        let pipe = prev_significant(&tokens, i).filter(|&p| tokens[p].is_punct('|'))?;
        let type_name = prev_significant(&tokens, pipe)?;
        tokens[type_name].is_word_like().then_some(*token)
    })?;

    let mut out = String::with_capacity(query.len());
    out.push_str(&query[..colon.start]);
    out.push_str(&query[colon.end()..]);
    Some(out)
}

/// [`fix_relationship_types`] as a pipeline stage.
pub struct RelationshipTypeFixer;

impl QueryTransform for RelationshipTypeFixer {
    fn name(&self) -> &'static str {
        "relationship_types"
    }

    fn transform(&self, query: &str) -> String {
        fix_relationship_types(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("MATCH (a)-[r:a|:b]->(b) RETURN b", "MATCH (a)-[r:a|b]->(b) RETURN b" ; "two types")]
    #[test_case("MATCH (a)-[:a|:b|:c|:d]-(b) RETURN b", "MATCH (a)-[:a|b|c|d]-(b) RETURN b" ; "chain")]
    #[test_case("MATCH (a)-[:a | :b]-(b) RETURN b", "MATCH (a)-[:a | b]-(b) RETURN b" ; "spaced")]
    #[test_case("MATCH (a)-[:a|b]-(b) RETURN b", "MATCH (a)-[:a|b]-(b) RETURN b" ; "already valid")]
    #[test_case("RETURN ':a|:b'", "RETURN ':a|:b'" ; "inside string")]
    fn test_fix(input: &str, expected: &str) {
        assert_eq!(fix_relationship_types(input), expected);
    }

    #[test]
    fn test_fixed_point() {
        let once = fix_relationship_types("MATCH (d)-[r:common_drug|:recommand_drug|:drugs_of]->(x) RETURN x");
        assert_eq!(fix_relationship_types(&once), once);
        assert!(!once.contains("|:"));
    }
}
