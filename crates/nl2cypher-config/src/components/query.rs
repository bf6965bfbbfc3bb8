//! Query normalization settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Relationship types rewritten from `MATCH` to `OPTIONAL MATCH`.
    pub sparse_relationships: Vec<String>,
    /// Fold multiple `MATCH ... RETURN` blocks into one query.
    pub merge: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            sparse_relationships: vec!["drugs_of".to_string()],
            merge: true,
        }
    }
}
