//! The normalization pipeline: clean, repair, rewrite, merge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use nl2cypher_config::QueryConfig;

use crate::transform::{
    Cleaner, CollectAliasFixer, QueryMerger, QueryTransform, RelationshipTypeFixer,
    SparseRelationshipRewriter,
};

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Relationship types that are often absent for a start node
    pub sparse_relationships: Vec<String>,
    /// Fold multiple `MATCH ... RETURN` blocks into one query
    pub merge: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&QueryConfig::default())
    }
}

impl From<&QueryConfig> for NormalizeOptions {
    fn from(config: &QueryConfig) -> Self {
        Self {
            sparse_relationships: config.sparse_relationships.clone(),
            merge: config.merge,
        }
    }
}

/// Pipeline output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalized {
    pub query: String,
    /// Multiple blocks were folded into one
    pub merged: bool,
    /// A sparse relationship was moved into `OPTIONAL MATCH`
    pub rewritten: bool,
    /// Names of the stages that changed the text, in order
    pub applied: Vec<&'static str>,
}

/// Ordered chain of [`QueryTransform`] stages.
pub struct Normalizer {
    stages: Vec<Box<dyn QueryTransform>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizeOptions::default())
    }
}

impl Normalizer {
    pub fn new(options: &NormalizeOptions) -> Self {
        let mut stages: Vec<Box<dyn QueryTransform>> = vec![
            Box::new(Cleaner),
            Box::new(RelationshipTypeFixer),
            Box::new(CollectAliasFixer),
            Box::new(SparseRelationshipRewriter::new(
                options.sparse_relationships.clone(),
            )),
        ];
        if options.merge {
            stages.push(Box::new(QueryMerger));
        }
        Self { stages }
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage, then drop blank lines.
    pub fn run(&self, raw: &str) -> Normalized {
        let mut query = raw.to_string();
        let mut applied = Vec::new();
        for stage in &self.stages {
            let next = stage.transform(&query);
            if next != query {
                debug!(stage = stage.name(), "Stage changed query text");
                applied.push(stage.name());
            }
            query = next;
        }

        Normalized {
            query: collapse_blank_lines(&query),
            merged: applied.contains(&"merge"),
            rewritten: applied.contains(&"sparse_rewrite"),
            applied,
        }
    }
}

/// Normalize raw generated text with the given options.
pub fn normalize(raw: &str, options: &NormalizeOptions) -> Normalized {
    Normalizer::new(options).run(raw)
}

fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
