//! Lightweight intermediate representation of query text.
//!
//! Text is split into top-level [`Clause`]s, clauses are grouped into
//! [`QueryBlock`]s (one per bare `MATCH`), and a block's pattern is split into
//! its anchor node and the verbatim remainder ([`PatternIr`]). Clause bodies
//! are kept as whitespace-collapsed text; only the parts the transforms
//! rearrange are modelled.

use serde::Serialize;

use crate::error::{ParseError, ParseResult};
use crate::lexer::{
    collapse, matching_close, next_significant, prev_significant, tokenize, Token, TokenKind,
};
use crate::syntax::parse_node_interior;

/// Top-level clause kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClauseKind {
    /// Text before the first clause keyword
    Leading,
    Match,
    OptionalMatch,
    Where,
    Return,
    With,
    Unwind,
    Create,
    Merge,
    Delete,
    DetachDelete,
    Set,
    Remove,
    Drop,
    OrderBy,
    Skip,
    Limit,
    Union,
    Call,
    Foreach,
}

impl ClauseKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Leading => "",
            Self::Match => "MATCH",
            Self::OptionalMatch => "OPTIONAL MATCH",
            Self::Where => "WHERE",
            Self::Return => "RETURN",
            Self::With => "WITH",
            Self::Unwind => "UNWIND",
            Self::Create => "CREATE",
            Self::Merge => "MERGE",
            Self::Delete => "DELETE",
            Self::DetachDelete => "DETACH DELETE",
            Self::Set => "SET",
            Self::Remove => "REMOVE",
            Self::Drop => "DROP",
            Self::OrderBy => "ORDER BY",
            Self::Skip => "SKIP",
            Self::Limit => "LIMIT",
            Self::Union => "UNION",
            Self::Call => "CALL",
            Self::Foreach => "FOREACH",
        }
    }

    /// Clauses that may trail a `RETURN`.
    pub fn is_tail(&self) -> bool {
        matches!(self, Self::OrderBy | Self::Skip | Self::Limit)
    }
}

/// One top-level clause: keyword plus whitespace-collapsed body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub kind: ClauseKind,
    pub body: String,
}

impl Clause {
    pub fn new(kind: ClauseKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    pub fn render(&self) -> String {
        match (self.kind.keyword(), self.body.is_empty()) {
            ("", _) => self.body.clone(),
            (kw, true) => kw.to_string(),
            (kw, false) => format!("{kw} {}", self.body),
        }
    }
}

/// Split query text into top-level clauses.
///
/// Keywords nested in `()`, `[]` or `{}` never start a clause, nor do
/// `ON CREATE SET` / `ON MATCH SET` or the `WITH` of `STARTS WITH`.
pub fn split_clauses(query: &str) -> Vec<Clause> {
    let tokens = tokenize(query);
    let mut clauses = Vec::new();
    let mut current = ClauseKind::Leading;
    let mut body_start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        if token.is_punct('(') || token.is_punct('[') || token.is_punct('{') {
            depth += 1;
        } else if token.is_punct(')') || token.is_punct(']') || token.is_punct('}') {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.kind == TokenKind::Keyword {
            if let Some((kind, next)) = clause_start(&tokens, i) {
                push_clause(&mut clauses, current, &tokens[body_start..i]);
                current = kind;
                body_start = next;
                i = next;
                continue;
            }
        }
        i += 1;
    }
    push_clause(&mut clauses, current, &tokens[body_start.min(tokens.len())..]);
    clauses
}

fn push_clause(clauses: &mut Vec<Clause>, kind: ClauseKind, body: &[Token<'_>]) {
    let body = collapse(body);
    if kind == ClauseKind::Leading && body.is_empty() {
        return;
    }
    clauses.push(Clause::new(kind, body));
}

/// If `tokens[i]` opens a clause, its kind and the index after its keyword(s).
fn clause_start(tokens: &[Token<'_>], i: usize) -> Option<(ClauseKind, usize)> {
    let prev = prev_significant(tokens, i).map(|p| tokens[p]);
    let after_on = |idx: usize| {
        prev_significant(tokens, idx).is_some_and(|p| tokens[p].is_keyword("ON"))
    };
    if after_on(i) {
        return None;
    }

    let next = next_significant(tokens, i + 1);
    let next_is = |kw: &str| next.is_some_and(|n| tokens[n].is_keyword(kw));
    let single = |kind| Some((kind, i + 1));
    let token = tokens[i];
    let word = token.text.to_ascii_uppercase();

    match word.as_str() {
        "MATCH" => single(ClauseKind::Match),
        "OPTIONAL" if next_is("MATCH") => next.map(|n| (ClauseKind::OptionalMatch, n + 1)),
        "WHERE" => single(ClauseKind::Where),
        "RETURN" => single(ClauseKind::Return),
        "WITH" if !prev.is_some_and(|p| p.is_keyword("STARTS") || p.is_keyword("ENDS")) => {
            single(ClauseKind::With)
        }
        "UNWIND" => single(ClauseKind::Unwind),
        "CREATE" => single(ClauseKind::Create),
        "MERGE" => single(ClauseKind::Merge),
        "DELETE" if !prev.is_some_and(|p| p.is_keyword("DETACH")) => single(ClauseKind::Delete),
        "DETACH" if next_is("DELETE") => next.map(|n| (ClauseKind::DetachDelete, n + 1)),
        "SET" => {
            // `ON CREATE SET` / `ON MATCH SET` belong to the MERGE clause
            let in_merge_action = prev.is_some_and(|p| p.is_keyword("CREATE") || p.is_keyword("MATCH"))
                && prev_significant(tokens, i).is_some_and(after_on);
            (!in_merge_action).then_some((ClauseKind::Set, i + 1))
        }
        "REMOVE" => single(ClauseKind::Remove),
        "DROP" => single(ClauseKind::Drop),
        "ORDER" if next_is("BY") => next.map(|n| (ClauseKind::OrderBy, n + 1)),
        "SKIP" => single(ClauseKind::Skip),
        "LIMIT" => single(ClauseKind::Limit),
        "UNION" => single(ClauseKind::Union),
        "CALL" => single(ClauseKind::Call),
        "FOREACH" => single(ClauseKind::Foreach),
        _ => None,
    }
}

/// `OPTIONAL MATCH` with the `WHERE` that filters it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionalMatch {
    pub pattern: String,
    pub where_clause: Option<String>,
}

/// `RETURN [DISTINCT] fields`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnClause {
    pub distinct: bool,
    pub fields: Vec<String>,
}

/// One independent `MATCH ... RETURN ...` unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryBlock {
    /// Body of the bare `MATCH` that opens the block
    pub match_pattern: Option<String>,
    /// `WHERE` directly following the bare `MATCH`
    pub where_clause: Option<String>,
    pub optional_matches: Vec<OptionalMatch>,
    pub return_clause: Option<ReturnClause>,
    /// `ORDER BY` / `SKIP` / `LIMIT` after the `RETURN`
    pub tail: Vec<Clause>,
    /// Clauses with no place in the block model
    pub other: Vec<Clause>,
}

impl QueryBlock {
    pub fn is_complete(&self) -> bool {
        self.match_pattern.is_some() && self.return_clause.is_some()
    }
}

/// Group clauses into blocks, starting a new block at each bare `MATCH`.
pub fn split_blocks(clauses: &[Clause]) -> Vec<QueryBlock> {
    let mut blocks = Vec::new();
    let mut block = QueryBlock::default();
    let mut prev: Option<ClauseKind> = None;

    for clause in clauses {
        match clause.kind {
            ClauseKind::Match => {
                if prev.is_some() {
                    blocks.push(std::mem::take(&mut block));
                }
                block.match_pattern = Some(clause.body.clone());
            }
            ClauseKind::OptionalMatch => block.optional_matches.push(OptionalMatch {
                pattern: clause.body.clone(),
                where_clause: None,
            }),
            ClauseKind::Where => match prev {
                Some(ClauseKind::Match) if block.where_clause.is_none() => {
                    block.where_clause = Some(clause.body.clone());
                }
                Some(ClauseKind::OptionalMatch) => {
                    if let Some(last) = block.optional_matches.last_mut() {
                        last.where_clause = Some(clause.body.clone());
                    }
                }
                _ => block.other.push(clause.clone()),
            },
            ClauseKind::Return if block.return_clause.is_none() => {
                let (distinct, fields) = strip_distinct(&clause.body);
                block.return_clause = Some(ReturnClause {
                    distinct,
                    fields: split_return_fields(fields),
                });
            }
            kind if kind.is_tail() && block.return_clause.is_some() => {
                block.tail.push(clause.clone());
            }
            _ => block.other.push(clause.clone()),
        }
        prev = Some(clause.kind);
    }
    if prev.is_some() {
        blocks.push(block);
    }
    blocks
}

/// Split a `DISTINCT` prefix off a `RETURN` body.
pub fn strip_distinct(body: &str) -> (bool, &str) {
    let tokens = tokenize(body);
    match next_significant(&tokens, 0) {
        Some(i) if tokens[i].is_keyword("DISTINCT") => (true, body[tokens[i].end()..].trim()),
        _ => (false, body.trim()),
    }
}

/// Split a projection list on top-level commas.
///
/// Commas inside `()`, `[]`, `{}` or string literals do not split.
pub fn split_return_fields(body: &str) -> Vec<String> {
    let tokens = tokenize(body);
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_punct('(') || token.is_punct('[') || token.is_punct('{') {
            depth += 1;
        } else if token.is_punct(')') || token.is_punct(']') || token.is_punct('}') {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_punct(',') {
            fields.push(collapse(&tokens[start..i]));
            start = i + 1;
        }
    }
    fields.push(collapse(&tokens[start..]));
    fields.retain(|f| !f.is_empty());
    fields
}

/// Split a predicate into its top-level `AND` operands.
///
/// `AND` inside brackets, string literals or `CASE ... END` does not split.
/// A predicate with a top-level `OR` or `XOR` comes back whole, since `AND`
/// binds tighter than both.
pub fn split_conjuncts(expr: &str) -> Vec<String> {
    let tokens = tokenize(expr);
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        let opens = token.is_punct('(') || token.is_punct('[') || token.is_punct('{');
        let closes = token.is_punct(')') || token.is_punct(']') || token.is_punct('}');
        if opens || token.is_keyword("CASE") {
            depth += 1;
        } else if closes || token.is_keyword("END") {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && (token.is_keyword("OR") || token.is_keyword("XOR")) {
            let whole = collapse(&tokens);
            return if whole.is_empty() { Vec::new() } else { vec![whole] };
        } else if depth == 0 && token.is_keyword("AND") {
            parts.push(collapse(&tokens[start..i]));
            start = i + 1;
        }
    }
    parts.push(collapse(&tokens[start..]));
    parts.retain(|p| !p.is_empty());
    parts
}

/// The alias of a projection ending in `AS name`.
pub fn alias_of(field: &str) -> Option<String> {
    let tokens = tokenize(field);
    let last = prev_significant(&tokens, tokens.len())?;
    let before = prev_significant(&tokens, last)?;
    (tokens[before].is_keyword("AS") && tokens[last].is_word_like())
        .then(|| tokens[last].text.to_string())
}

/// For each token, whether it is a variable reference: an identifier that is
/// not a property key (`x.key`), label or relationship type (`(:Label)`),
/// map key (`{key: 1}`) or function name (`count(...)`).
fn variable_positions(tokens: &[Token<'_>]) -> Vec<bool> {
    let mut brackets: Vec<&str> = Vec::new();
    let mut out = vec![false; tokens.len()];
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Punct {
            match token.text {
                "(" | "[" | "{" => brackets.push(token.text),
                ")" | "]" | "}" => {
                    brackets.pop();
                }
                _ => {}
            }
            continue;
        }
        if token.kind != TokenKind::Ident {
            continue;
        }
        let innermost = brackets.last().copied();
        let prev = prev_significant(tokens, i).map(|p| tokens[p]);
        let next = next_significant(tokens, i + 1).map(|n| tokens[n]);

        let property = prev.is_some_and(|p| p.is_punct('.'));
        let label = prev.is_some_and(|p| p.is_punct(':')) && matches!(innermost, Some("(" | "["));
        let map_key = innermost == Some("{") && next.is_some_and(|n| n.is_punct(':'));
        let function = next.is_some_and(|n| n.is_punct('('));
        out[i] = !(property || label || map_key || function);
    }
    out
}

/// Replace references to variable `from` with `to`.
pub fn rename_variable(text: &str, from: &str, to: &str) -> String {
    if from == to {
        return text.to_string();
    }
    let tokens = tokenize(text);
    let positions = variable_positions(&tokens);
    tokens
        .iter()
        .zip(positions)
        .map(|(token, is_var)| if is_var && token.text == from { to } else { token.text })
        .collect()
}

/// Replace every node pattern whose variable is `var` with `replacement`.
///
/// Parenthesised groups directly after a name are function calls and are
/// never replaced.
pub fn substitute_node_patterns(pattern: &str, var: &str, replacement: &str) -> String {
    let tokens = tokenize(pattern);
    let mut out = String::with_capacity(pattern.len());
    let mut copied = 0;
    let mut i = 0;
    while i < tokens.len() {
        let is_call = prev_significant(&tokens, i).is_some_and(|p| tokens[p].is_word_like());
        if tokens[i].is_punct('(') && !is_call {
            if let Some(close) = matching_close(&tokens, i) {
                let inner = &pattern[tokens[i].end()..tokens[close].start];
                if parse_node_interior(inner).is_ok_and(|n| n.var.as_deref() == Some(var)) {
                    out.push_str(&pattern[copied..tokens[i].start]);
                    out.push_str(replacement);
                    copied = tokens[close].end();
                    i = close + 1;
                    continue;
                }
            }
        }
        i += 1;
    }
    out.push_str(&pattern[copied..]);
    out
}

/// Variables a pattern binds: names right after `(` or `[`, and path names
/// before `=`.
pub fn bound_variables(pattern: &str) -> Vec<String> {
    let tokens = tokenize(pattern);
    let mut vars: Vec<String> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Ident {
            continue;
        }
        let after_open = prev_significant(&tokens, i)
            .is_some_and(|p| tokens[p].is_punct('(') || tokens[p].is_punct('['));
        let before_assign =
            next_significant(&tokens, i + 1).is_some_and(|n| tokens[n].is_punct('='));
        if (after_open || before_assign) && !vars.iter().any(|v| v == token.text) {
            vars.push(token.text.to_string());
        }
    }
    vars
}

/// Variable names an expression refers to.
pub fn referenced_variables(expr: &str) -> Vec<String> {
    let tokens = tokenize(expr);
    let positions = variable_positions(&tokens);
    tokens
        .iter()
        .zip(positions)
        .filter(|(_, is_var)| *is_var)
        .map(|(t, _)| t.text.to_string())
        .collect()
}

/// A node pattern: variable, first label, property map and source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub var: Option<String>,
    pub label: Option<String>,
    pub properties: Option<String>,
    /// Whitespace-collapsed source text, parentheses included
    pub text: String,
}

impl NodeRef {
    /// `(var:Label)` without properties.
    pub fn bare(&self) -> String {
        format_node(self.var.as_deref().unwrap_or(""), self.label.as_deref())
    }
}

/// Render `(var:Label)` or `(var)`.
pub fn format_node(var: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("({var}:{label})"),
        None => format!("({var})"),
    }
}

/// A pattern split into its first node and the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternIr {
    pub anchor: NodeRef,
    /// Relationship and target segments after the anchor, verbatim
    /// (whitespace-collapsed), e.g. `-[:has_symptom]->(s:Symptom)`
    pub segments: String,
}

impl PatternIr {
    pub fn parse(pattern: &str) -> ParseResult<Self> {
        let tokens = tokenize(pattern);
        let open = next_significant(&tokens, 0)
            .filter(|&i| tokens[i].is_punct('('))
            .ok_or_else(|| ParseError::NoLeadingNode(pattern.trim().to_string()))?;
        let close = matching_close(&tokens, open)
            .ok_or_else(|| ParseError::Unbalanced(pattern.trim().to_string()))?;

        let inner = &pattern[tokens[open].end()..tokens[close].start];
        let parts = parse_node_interior(inner)?;

        Ok(Self {
            anchor: NodeRef {
                var: parts.var,
                label: parts.labels.into_iter().next(),
                properties: parts.properties,
                text: collapse(&tokens[open..=close]),
            },
            segments: collapse(&tokens[close + 1..]),
        })
    }

    /// Whether the pattern has a top-level comma (several patterns).
    pub fn is_compound(&self) -> bool {
        split_return_fields(&self.segments).len() > 1 || self.segments.starts_with(',')
    }
}
