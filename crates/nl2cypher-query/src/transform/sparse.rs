//! Optional-relationship rewrite.
//!
//! Some relationship types are missing for many start nodes. A required
//! `MATCH` across one of them returns no rows even when the start node
//! exists, so the traversal is moved into an `OPTIONAL MATCH`:
//!
//! ```text
//! MATCH (d:Drug)-[:drugs_of]->(p:Producer)      MATCH (d:Drug)
//! WHERE d.name = 'Aspirin'                  =>  WHERE d.name = 'Aspirin'
//! RETURN p.name                                 OPTIONAL MATCH (d:Drug)-[:drugs_of]->(p:Producer)
//!                                               RETURN p.name
//! ```

use tracing::{debug, info};

use super::QueryTransform;
use crate::ir::{
    bound_variables, referenced_variables, split_clauses, split_conjuncts, Clause, ClauseKind,
    PatternIr,
};
use crate::lexer::{prev_significant, tokenize, TokenKind};

/// Split every bare `MATCH` whose first relationship has a sparse type into a
/// node-only `MATCH` plus an `OPTIONAL MATCH` carrying the traversal.
///
/// A following `WHERE` is split on its top-level `AND`: operands that only
/// filter the anchor stay on the `MATCH`, operands that refer to variables
/// bound by the traversal move with it. Patterns
/// without an anchor variable, or with several comma-separated parts, are
/// left alone. Returns the input unchanged when nothing was rewritten.
pub fn rewrite_sparse_relationships(query: &str, sparse: &[String]) -> String {
    if sparse.is_empty() {
        return query.to_string();
    }
    let clauses = split_clauses(query);
    let mut out: Vec<Clause> = Vec::with_capacity(clauses.len() + 2);
    let mut rewritten = 0usize;
    let mut i = 0;

    while i < clauses.len() {
        let clause = &clauses[i];
        let split = (clause.kind == ClauseKind::Match)
            .then(|| split_sparse_match(&clause.body, sparse))
            .flatten();
        let Some((anchor_match, optional, traversal_vars)) = split else {
            out.push(clause.clone());
            i += 1;
            continue;
        };

        rewritten += 1;
        out.push(anchor_match);
        match clauses.get(i + 1).filter(|c| c.kind == ClauseKind::Where) {
            Some(filter) => {
                let (anchor_only, traversal): (Vec<String>, Vec<String>) =
                    split_conjuncts(&filter.body).into_iter().partition(|part| {
                        !referenced_variables(part)
                            .iter()
                            .any(|v| traversal_vars.contains(v))
                    });
                if !anchor_only.is_empty() {
                    out.push(Clause::new(ClauseKind::Where, anchor_only.join(" AND ")));
                }
                out.push(optional);
                if !traversal.is_empty() {
                    out.push(Clause::new(ClauseKind::Where, traversal.join(" AND ")));
                }
                i += 2;
            }
            None => {
                out.push(optional);
                i += 1;
            }
        }
    }

    if rewritten == 0 {
        return query.to_string();
    }
    info!(count = rewritten, "Rewrote sparse relationship traversal into OPTIONAL MATCH");
    out.iter().map(Clause::render).collect::<Vec<_>>().join("\n")
}

/// The `MATCH` and `OPTIONAL MATCH` replacing `pattern`, plus the variables
/// the traversal binds, if its first relationship is sparse.
fn split_sparse_match(pattern: &str, sparse: &[String]) -> Option<(Clause, Clause, Vec<String>)> {
    let ir = match PatternIr::parse(pattern) {
        Ok(ir) => ir,
        Err(e) => {
            debug!(error = %e, "Pattern not rewritable");
            return None;
        }
    };
    let starts_traversal = ir.segments.starts_with('-') || ir.segments.starts_with('<');
    if ir.anchor.var.is_none() || !starts_traversal || ir.is_compound() {
        return None;
    }
    let rel_type = first_relationship_types(&ir.segments)
        .into_iter()
        .find(|t| sparse.iter().any(|s| s.eq_ignore_ascii_case(t)))?;
    debug!(relationship = %rel_type, anchor = %ir.anchor.text, "Sparse relationship in MATCH");

    Some((
        Clause::new(ClauseKind::Match, ir.anchor.text.clone()),
        Clause::new(
            ClauseKind::OptionalMatch,
            format!("{}{}", ir.anchor.bare(), ir.segments),
        ),
        bound_variables(&ir.segments),
    ))
}

/// Relationship types named in the first `[...]` of a pattern.
fn first_relationship_types(segments: &str) -> Vec<String> {
    let tokens = tokenize(segments);
    let Some(open) = tokens.iter().position(|t| t.is_punct('[')) else {
        return Vec::new();
    };
    tokens[open + 1..]
        .iter()
        .enumerate()
        .take_while(|(_, t)| !t.is_punct(']'))
        .filter(|(offset, t)| {
            let i = open + 1 + offset;
            t.kind == TokenKind::Ident
                && prev_significant(&tokens, i)
                    .is_some_and(|p| tokens[p].is_punct(':') || tokens[p].is_punct('|'))
        })
        .map(|(_, t)| t.text.trim_matches('`').to_string())
        .collect()
}

/// [`rewrite_sparse_relationships`] as a pipeline stage.
pub struct SparseRelationshipRewriter {
    sparse: Vec<String>,
}

impl SparseRelationshipRewriter {
    pub fn new(sparse: Vec<String>) -> Self {
        Self { sparse }
    }
}

impl QueryTransform for SparseRelationshipRewriter {
    fn name(&self) -> &'static str {
        "sparse_rewrite"
    }

    fn transform(&self, query: &str) -> String {
        rewrite_sparse_relationships(query, &self.sparse)
    }
}
