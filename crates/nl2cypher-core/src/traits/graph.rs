//! Graph-database collaborator

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::record::RawRecord;

/// Common result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Graph database errors
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum GraphError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("No database connection configured")]
    Unavailable,
}

/// Runs Cypher text against a graph database.
///
/// Each call acquires its own session from the driver's pool and releases it
/// before returning, on success and on error alike. Implementations must
/// support concurrent calls from many requests.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Execute `cypher` and collect every record, in order.
    async fn run(&self, cypher: &str) -> GraphResult<Vec<RawRecord>>;

    /// Dry-run `cypher` with `EXPLAIN`. The database plans the query without
    /// executing it, so this only reports syntax and planning errors.
    async fn explain(&self, cypher: &str) -> GraphResult<()> {
        self.run(&format!("EXPLAIN {cypher}")).await.map(|_| ())
    }

    /// Release driver resources at shutdown.
    async fn close(&self) {}
}
