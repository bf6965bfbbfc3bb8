//! Shared parser primitives.

use chumsky::extra;
use chumsky::prelude::*;

/// Extra type for parsers - uses Rich errors for better messages
pub type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Parser for identifiers: alphanumeric + underscore
pub fn ident<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.to_string())
        .labelled("identifier")
}

/// Format chumsky errors as `Line L, column C: reason (found X)` lines.
pub fn format_errors(errs: &[Rich<'_, char>], input: &str) -> String {
    errs.iter()
        .map(|e| {
            let start = e.span().start;
            let line = input[..start].lines().count().max(1);
            let col = start - input[..start].rfind('\n').map_or(0, |i| i + 1);
            let found = e
                .found()
                .map_or("end of input".to_string(), |c| format!("'{}'", c));
            format!("Line {}, column {}: {} (found {})", line, col + 1, e.reason(), found)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
