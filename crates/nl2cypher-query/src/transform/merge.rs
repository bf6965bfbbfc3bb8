//! Multi-query merge.
//!
//! Generated text sometimes contains several independent `MATCH ... RETURN`
//! statements about the same entity. They are folded into one query: the
//! first block's anchor node becomes the shared `MATCH`, every traversal
//! becomes an `OPTIONAL MATCH` on that anchor, and the `RETURN` lists are
//! concatenated with duplicates removed.
//!
//! Limitations: every block is assumed to describe the same anchor entity.
//! Only the first block's `WHERE` survives and applies to the whole query;
//! other blocks' filters are dropped. A block whose first node has no
//! variable cannot be anchored and is skipped.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::QueryTransform;
use crate::ir::{
    alias_of, format_node, rename_variable, split_blocks, split_clauses,
    substitute_node_patterns, Clause, ClauseKind, PatternIr, QueryBlock,
};
use crate::lexer::tokenize;

/// Merge multiple `MATCH ... RETURN` blocks into one query.
///
/// Runs only when the text has more than one `RETURN` and no `UNION`.
/// Returns the input unchanged when fewer than two complete blocks remain,
/// when the first block has no anchor variable, or when the text contains
/// clauses the merge cannot carry (`WITH`, `UNWIND`, `CREATE`, ...).
pub fn merge_queries(query: &str) -> String {
    let tokens = tokenize(query);
    let returns = tokens.iter().filter(|t| t.is_keyword("RETURN")).count();
    if returns <= 1 || tokens.iter().any(|t| t.is_keyword("UNION")) {
        return query.to_string();
    }
    warn!(returns, "Detected multiple RETURN clauses, merging query blocks");

    let clauses = split_clauses(query);
    if let Some(clause) = clauses.iter().find(|c| !is_mergeable(c.kind)) {
        warn!(
            clause = clause.kind.keyword(),
            "Query has a clause that cannot be merged, leaving it unchanged"
        );
        return query.to_string();
    }

    let blocks: Vec<QueryBlock> = split_blocks(&clauses)
        .into_iter()
        .filter(QueryBlock::is_complete)
        .collect();
    if blocks.len() <= 1 {
        debug!(blocks = blocks.len(), "Not enough complete blocks to merge");
        return query.to_string();
    }
    if blocks.iter().any(|b| !b.other.is_empty()) {
        warn!("Query block has clauses outside MATCH/WHERE/RETURN, leaving it unchanged");
        return query.to_string();
    }

    match merge_blocks(&blocks) {
        Some(merged) => {
            info!(blocks = blocks.len(), merged = %merged, "Merged query blocks");
            merged
        }
        None => query.to_string(),
    }
}

fn is_mergeable(kind: ClauseKind) -> bool {
    matches!(
        kind,
        ClauseKind::Leading
            | ClauseKind::Match
            | ClauseKind::OptionalMatch
            | ClauseKind::Where
            | ClauseKind::Return
            | ClauseKind::OrderBy
            | ClauseKind::Skip
            | ClauseKind::Limit
    )
}

fn merge_blocks(blocks: &[QueryBlock]) -> Option<String> {
    let primary = &blocks[0];
    let primary_ir = match PatternIr::parse(primary.match_pattern.as_deref()?) {
        Ok(ir) => ir,
        Err(e) => {
            warn!(error = %e, "First block has no parsable anchor node, not merging");
            return None;
        }
    };
    let Some(primary_var) = primary_ir.anchor.var.clone() else {
        warn!(anchor = %primary_ir.anchor.text, "First block anchor has no variable, not merging");
        return None;
    };
    let anchor = format_node(&primary_var, primary_ir.anchor.label.as_deref());

    let mut optional_matches = Vec::new();
    let mut fields = ReturnFields::default();
    let mut distinct = false;
    let mut tail: Option<Vec<String>> = None;

    for (index, block) in blocks.iter().enumerate() {
        let ir = if index == 0 {
            primary_ir.clone()
        } else {
            match block.match_pattern.as_deref().map(PatternIr::parse) {
                Some(Ok(ir)) if ir.anchor.var.is_some() => ir,
                _ => {
                    warn!(block = index, "Block has no anchor variable, skipping it");
                    continue;
                }
            }
        };
        let var = ir.anchor.var.as_deref().unwrap_or(primary_var.as_str());
        let adapt_pattern = |text: &str| {
            if var == primary_var {
                text.to_string()
            } else {
                rename_variable(&substitute_node_patterns(text, var, &anchor), var, &primary_var)
            }
        };
        let adapt_expr = |text: &str| rename_variable(text, var, &primary_var);

        if !ir.segments.is_empty() {
            optional_matches.push(format!("OPTIONAL MATCH {anchor}{}", adapt_pattern(&ir.segments)));
        }
        for optional in &block.optional_matches {
            let mut line = format!("OPTIONAL MATCH {}", adapt_pattern(&optional.pattern));
            if let Some(filter) = &optional.where_clause {
                line.push_str(" WHERE ");
                line.push_str(&adapt_expr(filter));
            }
            optional_matches.push(line);
        }
        if index > 0 && block.where_clause.is_some() {
            debug!(block = index, "Dropping WHERE of merged block");
        }
        if let Some(ret) = &block.return_clause {
            distinct |= ret.distinct;
            for field in &ret.fields {
                fields.push(adapt_expr(field));
            }
        }
        if tail.is_none() && !block.tail.is_empty() {
            tail = Some(
                block
                    .tail
                    .iter()
                    .map(|c| Clause::new(c.kind, adapt_expr(&c.body)).render())
                    .collect(),
            );
        }
    }

    let mut lines = vec![format!("MATCH {}", primary_ir.anchor.text)];
    if let Some(filter) = &primary.where_clause {
        lines.push(format!("WHERE {filter}"));
    }
    lines.extend(optional_matches);
    let fields = fields.into_vec();
    if !fields.is_empty() {
        let distinct = if distinct { "DISTINCT " } else { "" };
        lines.push(format!("RETURN {distinct}{}", fields.join(", ")));
    }
    lines.extend(tail.unwrap_or_default());
    Some(lines.join("\n"))
}

/// `RETURN` fields in first-seen order, deduplicated by alias when the field
/// has one and by text otherwise.
#[derive(Default)]
struct ReturnFields {
    fields: Vec<String>,
    aliases: HashSet<String>,
    texts: HashSet<String>,
}

impl ReturnFields {
    fn push(&mut self, field: String) {
        let fresh = match alias_of(&field) {
            Some(alias) => self.aliases.insert(alias),
            None => self.texts.insert(field.clone()),
        };
        if fresh {
            self.fields.push(field);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.fields
    }
}

/// [`merge_queries`] as a pipeline stage.
pub struct QueryMerger;

impl QueryTransform for QueryMerger {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn transform(&self, query: &str) -> String {
        merge_queries(query)
    }
}
