//! Cypher tokenizer.
//!
//! A lossless, never-failing lexer: concatenating every token's text gives
//! back the input exactly. String literals and backtick-quoted names are
//! single tokens, so keyword and comment detection never fires inside them.
//! Unterminated strings and comments run to the end of input.

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Clause or operator keyword (`MATCH`, `RETURN`, `AS`, ...)
    Keyword,
    /// Variable, label, function or property name, including `` `quoted` `` names
    Ident,
    /// `'single'` or `"double"` quoted literal
    Str,
    Number,
    /// Any other single character
    Punct,
    /// Horizontal whitespace run
    Whitespace,
    Newline,
    /// `// ...` up to, not including, the newline
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// Markdown code-fence marker
    Fence,
}

/// A slice of the input with its classification and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Keyword match, case-insensitive.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Keyword or identifier spelled `word`, case-insensitive.
    pub fn is_word(&self, word: &str) -> bool {
        self.is_word_like() && self.text.eq_ignore_ascii_case(word)
    }

    pub fn is_word_like(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Ident)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.chars().eq(std::iter::once(c))
    }

    /// Whitespace, newlines and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }
}

/// Words lexed as [`TokenKind::Keyword`] unless they follow `.`, or a `:`
/// inside brackets or directly before them.
const KEYWORDS: &[&str] = &[
    "MATCH", "OPTIONAL", "WHERE", "RETURN", "WITH", "UNWIND", "CREATE", "MERGE", "DELETE",
    "DETACH", "REMOVE", "DROP", "SET", "ORDER", "BY", "SKIP", "LIMIT", "UNION", "ALL", "AS",
    "DISTINCT", "CALL", "YIELD", "ON", "AND", "OR", "XOR", "NOT", "IN", "IS", "NULL", "ASC",
    "DESC", "ASCENDING", "DESCENDING", "CASE", "WHEN", "THEN", "ELSE", "END", "FOREACH",
    "CONTAINS", "STARTS", "ENDS", "EXPLAIN", "PROFILE", "LOAD", "USING", "INDEX", "CONSTRAINT",
];

/// Tokenize the whole input.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Streaming tokenizer over a borrowed input.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    last_significant: Option<Token<'a>>,
    /// Open `(`, `[` and `{` count.
    depth: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            last_significant: None,
            depth: 0,
        }
    }

    fn classify_word(&self, word: &str) -> TokenKind {
        // A top-level `Query: MATCH` prefix keeps its keyword.
        let after_accessor = self.last_significant.is_some_and(|t| {
            t.is_punct('.') || (t.is_punct(':') && (self.depth > 0 || t.end() == self.pos))
        });
        if !after_accessor && KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word)) {
            TokenKind::Keyword
        } else {
            TokenKind::Ident
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.src[self.pos..];
        let c = rest.chars().next()?;

        let (kind, len) = if rest.starts_with("```") {
            (TokenKind::Fence, 3)
        } else if c == '\n' {
            (TokenKind::Newline, 1)
        } else if c.is_whitespace() {
            (
                TokenKind::Whitespace,
                take_while(rest, |c| c.is_whitespace() && c != '\n'),
            )
        } else if rest.starts_with("//") {
            (TokenKind::LineComment, rest.find('\n').unwrap_or(rest.len()))
        } else if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            (TokenKind::BlockComment, len)
        } else if c == '\'' || c == '"' {
            (TokenKind::Str, quoted_len(rest, c))
        } else if c == '`' {
            (TokenKind::Ident, rest[1..].find('`').map_or(rest.len(), |i| i + 2))
        } else if c.is_ascii_digit() {
            (TokenKind::Number, number_len(rest))
        } else if c.is_alphabetic() || c == '_' {
            let len = take_while(rest, |c| c.is_alphanumeric() || c == '_');
            (self.classify_word(&rest[..len]), len)
        } else {
            (TokenKind::Punct, c.len_utf8())
        };

        let token = Token {
            kind,
            text: &rest[..len],
            start: self.pos,
        };
        self.pos += len;
        if kind == TokenKind::Punct {
            match c {
                '(' | '[' | '{' => self.depth += 1,
                ')' | ']' | '}' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
        }
        if !token.is_trivia() {
            self.last_significant = Some(token);
        }
        Some(token)
    }
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !pred(*c))
        .map_or(s.len(), |(i, _)| i)
}

/// Length of a quoted literal starting at `s[0] == quote`, honoring backslash escapes.
fn quoted_len(s: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return i + c.len_utf8();
        }
    }
    s.len()
}

fn number_len(s: &str) -> usize {
    let int = take_while(s, |c| c.is_ascii_digit());
    let rest = &s[int..];
    let mut chars = rest.chars();
    if chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
        int + 1 + take_while(&rest[1..], |c| c.is_ascii_digit())
    } else {
        int
    }
}

/// Concatenate token texts.
pub fn render(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect()
}

/// Concatenate token texts with every whitespace, newline or comment run
/// replaced by one space, trimmed at both ends.
pub fn collapse(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut pending_space = false;
    for token in tokens {
        if token.is_trivia() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push_str(token.text);
    }
    out
}

/// Index of the next non-trivia token at or after `from`.
pub fn next_significant(tokens: &[Token<'_>], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].is_trivia())
}

/// Index of the closest non-trivia token before `before`.
pub fn prev_significant(tokens: &[Token<'_>], before: usize) -> Option<usize> {
    (0..before).rev().find(|&i| !tokens[i].is_trivia())
}

/// Index of the bracket closing the one opened at `open`, counting nesting
/// of the same bracket pair only.
pub fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let (open_c, close_c) = match tokens.get(open)?.text {
        "(" => ('(', ')'),
        "[" => ('[', ']'),
        "{" => ('{', '}'),
        _ => return None,
    };
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct(open_c) {
            depth += 1;
        } else if token.is_punct(close_c) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
