//! Query validation capability
//!
//! Two strategies share this contract: a rule-based validator with no I/O, and
//! a live validator that additionally dry-runs the query against the
//! database. The service picks one at startup.

use async_trait::async_trait;

use crate::schema::GraphSchema;
use crate::types::ValidationOutcome;

#[async_trait]
pub trait QueryValidator: Send + Sync {
    /// Validate `query` against `schema`.
    ///
    /// Never fails: malformed input produces an invalid outcome with errors.
    async fn validate(&self, query: &str, schema: &GraphSchema) -> ValidationOutcome;

    /// Short strategy name for logs and service info.
    fn name(&self) -> &'static str;
}
