//! # nl2cypher query
//!
//! Repairs machine-generated Cypher before it reaches a database.
//!
//! ## Architecture
//!
//! ```text
//! raw text → Cleaner → RelationshipTypeFixer → CollectAliasFixer
//!          → SparseRelationshipRewriter → QueryMerger → normalized query
//! ```
//!
//! - **Lexer** ([`lexer`]): lossless tokenizer; strings and comments are single
//!   tokens, so no stage edits text inside a string literal
//! - **IR** ([`ir`]): top-level clauses, `MATCH ... RETURN` blocks, and the
//!   anchor node of a pattern (parsed with chumsky, see [`syntax`])
//! - **Transforms** ([`transform`]): the individual repair stages
//! - **Pipeline** ([`pipeline`]): the fixed stage order
//!
//! This is not a Cypher parser. It handles the bounded set of malformations a
//! fixed prompting strategy produces and leaves everything else untouched.
//!
//! ## Example
//!
//! ```
//! use nl2cypher_query::{normalize, NormalizeOptions};
//!
//! let out = normalize(
//!     "```cypher\nMATCH (d:Disease)-[r:has_symptom|:acompany_with]->(x) RETURN x\n```",
//!     &NormalizeOptions::default(),
//! );
//! assert_eq!(out.query, "MATCH (d:Disease)-[r:has_symptom|acompany_with]->(x) RETURN x");
//! ```

pub mod error;
pub mod ir;
pub mod lexer;
pub mod pipeline;
pub mod syntax;
pub mod transform;

pub use error::{ParseError, ParseResult};
pub use ir::{split_conjuncts, split_return_fields, Clause, ClauseKind, NodeRef, PatternIr, QueryBlock};
pub use lexer::{tokenize, Token, TokenKind};
pub use pipeline::{normalize, NormalizeOptions, Normalized, Normalizer};
pub use transform::{
    clean, fix_collect_aliases, fix_relationship_types, merge_queries,
    rewrite_sparse_relationships, QueryTransform,
};
