//! `COLLECT(expr AS alias)` repair: the alias moves outside the call.

use super::QueryTransform;
use crate::lexer::{matching_close, next_significant, prev_significant, tokenize, Token};

/// Rewrite `COLLECT(<expr> AS <alias>)` as `COLLECT(<expr>) AS <alias>`.
///
/// Calls without a trailing alias, and text inside string literals, are left
/// untouched. Nested parentheses inside the call are fine.
pub fn fix_collect_aliases(query: &str) -> String {
    let tokens = tokenize(query);
    let mut out = String::with_capacity(query.len());
    let mut copied = 0;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        if token.is_word("COLLECT") {
            let call = next_significant(&tokens, i + 1)
                .filter(|&open| tokens[open].is_punct('('))
                .and_then(|open| Some((open, matching_close(&tokens, open)?)));
            if let Some((open, close)) = call {
                if let Some((as_kw, alias)) = trailing_alias(&tokens, open, close) {
                    let expr = query[tokens[open].end()..tokens[as_kw].start].trim();
                    out.push_str(&query[copied..token.start]);
                    out.push_str(&format!("{}({expr}) AS {alias}", token.text));
                    copied = tokens[close].end();
                    i = close + 1;
                    continue;
                }
            }
        }
        i += 1;
    }
    out.push_str(&query[copied..]);
    out
}

/// Index of the `AS` keyword and the alias text, when the call interior
/// ends with `<expr> AS <alias>`.
fn trailing_alias<'a>(tokens: &[Token<'a>], open: usize, close: usize) -> Option<(usize, &'a str)> {
    let alias = prev_significant(tokens, close).filter(|&a| a > open)?;
    let as_kw = prev_significant(tokens, alias).filter(|&k| k > open)?;
    let has_expr = prev_significant(tokens, as_kw).is_some_and(|e| e > open);
    (tokens[as_kw].is_keyword("AS") && tokens[alias].is_word_like() && has_expr)
        .then_some((as_kw, tokens[alias].text))
}

/// [`fix_collect_aliases`] as a pipeline stage.
pub struct CollectAliasFixer;

impl QueryTransform for CollectAliasFixer {
    fn name(&self) -> &'static str {
        "collect_alias"
    }

    fn transform(&self, query: &str) -> String {
        fix_collect_aliases(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("RETURN COLLECT(DISTINCT a.name AS x)", "RETURN COLLECT(DISTINCT a.name) AS x" ; "distinct")]
    #[test_case("RETURN collect(f.name as foods)", "RETURN collect(f.name) AS foods" ; "lower case")]
    #[test_case(
        "RETURN COLLECT(coalesce(f.name, 'n/a') AS foods), d.name",
        "RETURN COLLECT(coalesce(f.name, 'n/a')) AS foods, d.name" ;
        "nested call"
    )]
    #[test_case(
        "RETURN COLLECT(DISTINCT s.name AS symptoms), COLLECT(DISTINCT f.name AS foods)",
        "RETURN COLLECT(DISTINCT s.name) AS symptoms, COLLECT(DISTINCT f.name) AS foods" ;
        "two calls"
    )]
    #[test_case("RETURN COLLECT(a.name) AS x", "RETURN COLLECT(a.name) AS x" ; "already valid")]
    #[test_case("RETURN COLLECT(AS)", "RETURN COLLECT(AS)" ; "no expression")]
    #[test_case("RETURN 'COLLECT(a AS b)'", "RETURN 'COLLECT(a AS b)'" ; "inside string")]
    fn test_fix_collect(input: &str, expected: &str) {
        assert_eq!(fix_collect_aliases(input), expected);
    }
}
