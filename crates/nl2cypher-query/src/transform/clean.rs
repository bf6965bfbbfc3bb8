//! Markdown fence and comment removal.

use once_cell::sync::Lazy;
use regex::Regex;

use super::QueryTransform;
use crate::lexer::{tokenize, TokenKind};

const FENCE: &str = "```";

/// A fence info line such as `cypher` or `sql`.
static FENCE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][\w+-]*$").expect("fence tag regex"));

/// A `cypher` tag on the same line as the query.
static INLINE_CYPHER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^cypher\s+").expect("inline tag regex"));

/// First-line words that are query text, not a fence tag.
const CLAUSE_WORDS: &[&str] = &[
    "MATCH", "OPTIONAL", "RETURN", "CREATE", "MERGE", "WITH", "UNWIND", "CALL",
];

/// Reduce generated text to plain query text.
///
/// Keeps only the interior of the first fenced block when there is one,
/// drops residual fence markers, removes `/* */` and `//` comments (string
/// literals are left intact), trims trailing whitespace from every line and
/// drops blank lines.
pub fn clean(raw: &str) -> String {
    let text = extract_fenced(raw).unwrap_or_else(|| raw.trim());
    strip_comments(strip_fence_markers(text))
}

fn extract_fenced(raw: &str) -> Option<&str> {
    let open = raw.find(FENCE)?;
    let after = &raw[open + FENCE.len()..];
    let body = after.find(FENCE).map_or(after, |close| &after[..close]);
    Some(strip_language_tag(body).trim())
}

fn strip_language_tag(body: &str) -> &str {
    if let Some((first, rest)) = body.split_once('\n') {
        let tag = first.trim();
        let is_clause = CLAUSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(tag));
        if tag.is_empty() || (FENCE_TAG.is_match(tag) && !is_clause) {
            return rest;
        }
    }
    INLINE_CYPHER_TAG
        .find(body)
        .map_or(body, |m| &body[m.end()..])
}

fn strip_fence_markers(mut text: &str) -> &str {
    loop {
        let before = text;
        text = text.trim();
        if let Some(rest) = text.strip_prefix(FENCE) {
            text = strip_language_tag(rest);
        }
        if let Some(rest) = text.strip_suffix(FENCE) {
            text = rest;
        }
        if text == before {
            return text;
        }
    }
}

fn strip_comments(text: &str) -> String {
    let without: String = tokenize(text)
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::LineComment | TokenKind::BlockComment))
        .map(|t| t.text)
        .collect();

    without
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// [`clean`] as a pipeline stage.
pub struct Cleaner;

impl QueryTransform for Cleaner {
    fn name(&self) -> &'static str {
        "clean"
    }

    fn transform(&self, query: &str) -> String {
        clean(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("```cypher\nMATCH (n) RETURN n\n```", "MATCH (n) RETURN n" ; "tagged fence")]
    #[test_case("```\nMATCH (n) RETURN n\n```", "MATCH (n) RETURN n" ; "bare fence")]
    #[test_case("```CYPHER\nMATCH (n) RETURN n```", "MATCH (n) RETURN n" ; "upper-case tag")]
    #[test_case("```cypher MATCH (n) RETURN n```", "MATCH (n) RETURN n" ; "inline tag")]
    #[test_case("```MATCH (n) RETURN n```", "MATCH (n) RETURN n" ; "single line fence")]
    #[test_case("```\nMATCH\n(n)\nRETURN n\n```", "MATCH\n(n)\nRETURN n" ; "keyword on first line is kept")]
    #[test_case("Here is the query:\n```cypher\nMATCH (n) RETURN n\n```\nIt finds nodes.", "MATCH (n) RETURN n" ; "narrative around fence")]
    #[test_case("```cypher\nMATCH (n) RETURN n", "MATCH (n) RETURN n" ; "unterminated fence")]
    fn test_fences(raw: &str, expected: &str) {
        assert_eq!(clean(raw), expected);
    }

    #[test]
    fn test_comments_removed() {
        let raw = "// find it\nMATCH (d:Disease) /* the disease */\nWHERE d.name = 'Flu' // exact\n/* multi\nline */\nRETURN d";
        assert_eq!(clean(raw), "MATCH (d:Disease)\nWHERE d.name = 'Flu'\nRETURN d");
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let raw = "MATCH (u:Url) WHERE u.href = 'http://x.org' RETURN u";
        assert_eq!(clean(raw), raw);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("  \n\t "), "");
        assert_eq!(clean("```\n```"), "");
    }

    #[test]
    fn test_clean_is_idempotent_on_clean_text() {
        let q = "MATCH (d:Disease)\nWHERE d.name = 'Flu'\nRETURN d.name";
        assert_eq!(clean(q), q);
        assert_eq!(clean(&clean(q)), clean(q));
    }
}
