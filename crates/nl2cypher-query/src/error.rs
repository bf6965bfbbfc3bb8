//! Error types for pattern parsing.
//!
//! The normalization stages themselves are total; these errors only surface
//! from [`crate::ir::PatternIr::parse`] and make a stage skip the pattern.

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid node pattern `({input})`:\n{errors}")]
    NodePattern { input: String, errors: String },

    #[error("Pattern does not start with a node: {0}")]
    NoLeadingNode(String),

    #[error("Unbalanced brackets in pattern: {0}")]
    Unbalanced(String),
}
