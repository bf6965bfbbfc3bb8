//! Node pattern parser: the inside of `(var:Label:Other {props})`.

use chumsky::prelude::*;

use super::common::{format_errors, ident, Extra};
use crate::error::{ParseError, ParseResult};

/// Parsed interior of a node pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeParts {
    pub var: Option<String>,
    pub labels: Vec<String>,
    /// Property map text, braces included, kept verbatim
    pub properties: Option<String>,
}

/// Parser for the text between a node's parentheses.
///
/// The property map is not parsed; everything from `{` to the end is kept.
pub fn node_interior<'src>() -> impl Parser<'src, &'src str, NodeParts, Extra<'src>> {
    let labels = just(':')
        .padded()
        .ignore_then(ident())
        .repeated()
        .collect::<Vec<_>>()
        .labelled("node label like :Disease");

    let properties = just('{')
        .then(any().repeated())
        .to_slice()
        .map(|s: &str| s.to_string())
        .labelled("property map like {name: 'x'}");

    ident()
        .or_not()
        .padded()
        .then(labels)
        .then(properties.padded().or_not())
        .then_ignore(end())
        .map(|((var, labels), properties)| NodeParts {
            var,
            labels,
            properties,
        })
        .labelled("node pattern like (d:Disease {name: 'x'})")
}

/// Parse a node interior, reporting chumsky errors as [`ParseError`].
pub fn parse_node_interior(inner: &str) -> ParseResult<NodeParts> {
    let inner = inner.trim();
    node_interior()
        .parse(inner)
        .into_result()
        .map_err(|errs| ParseError::NodePattern {
            input: inner.to_string(),
            errors: format_errors(&errs, inner),
        })
}
