//! Property tests for the repair stages.

use nl2cypher_query::{clean, fix_relationship_types};
use proptest::prelude::*;

/// Query-like text without backticks, which would read as fence markers.
const QUERY_TEXT: &str = "[A-Za-z0-9 _(){}:.,'\"=<>|*/\\[\\]\\-\\n]{0,80}";

fn relationship_list() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-z][a-z_]{0,8}", any::<bool>()), 1..6).prop_map(|types| {
        let list = types
            .iter()
            .enumerate()
            .map(|(i, (name, colon))| {
                if i == 0 || *colon {
                    format!(":{name}")
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("|");
        format!("MATCH (a)-[r{list}]->(b) RETURN b")
    })
}

proptest! {
    #[test]
    fn clean_is_idempotent(q in QUERY_TEXT) {
        let once = clean(&q);
        prop_assert_eq!(clean(&once), once);
    }

    #[test]
    fn clean_ignores_fence_wrapping(q in QUERY_TEXT) {
        prop_assert_eq!(clean(&format!("```cypher\n{q}\n```")), clean(&q));
        prop_assert_eq!(clean(&format!("```\n{q}\n```")), clean(&q));
    }

    #[test]
    fn relationship_fix_reaches_fixed_point(query in relationship_list()) {
        let once = fix_relationship_types(&query);
        prop_assert!(!once.contains("|:"), "{}", once);
        prop_assert_eq!(fix_relationship_types(&once), once);
    }

    #[test]
    fn relationship_fix_is_total(q in QUERY_TEXT) {
        let once = fix_relationship_types(&q);
        prop_assert_eq!(fix_relationship_types(&once), once);
    }
}
