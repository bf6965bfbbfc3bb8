//! Chumsky parsers for the small pieces of Cypher the pipeline needs to
//! understand structurally.

mod common;
mod node;

pub use common::{format_errors, ident, Extra};
pub use node::{node_interior, parse_node_interior, NodeParts};
