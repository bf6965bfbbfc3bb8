//! Text-to-text repair stages.
//!
//! Each stage is total: it never fails, and returns its input unchanged when
//! there is nothing to repair. [`crate::pipeline::Normalizer`] chains them in
//! a fixed order.

mod clean;
mod collect;
mod merge;
mod relationship;
mod sparse;

pub use clean::{clean, Cleaner};
pub use collect::{fix_collect_aliases, CollectAliasFixer};
pub use merge::{merge_queries, QueryMerger};
pub use relationship::{fix_relationship_types, RelationshipTypeFixer};
pub use sparse::{rewrite_sparse_relationships, SparseRelationshipRewriter};

/// One normalization stage.
pub trait QueryTransform: Send + Sync {
    /// Stable stage name, used in logs and [`crate::Normalized::applied`].
    fn name(&self) -> &'static str;

    /// Transform query text.
    fn transform(&self, query: &str) -> String;
}
