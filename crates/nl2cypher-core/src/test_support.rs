//! In-memory collaborators for tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::record::RawRecord;
use crate::traits::{GraphClient, GraphError, GraphResult};

/// Graph client that records every query and replays canned results.
#[derive(Debug, Default)]
pub struct MockGraphClient {
    records: Vec<RawRecord>,
    explain_error: Option<String>,
    run_error: Option<String>,
    seen: Mutex<Vec<String>>,
}

impl MockGraphClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records returned by every non-EXPLAIN run.
    pub fn with_records(mut self, records: Vec<RawRecord>) -> Self {
        self.records = records;
        self
    }

    /// Reject every `EXPLAIN` with this message.
    pub fn failing_explain(mut self, message: impl Into<String>) -> Self {
        self.explain_error = Some(message.into());
        self
    }

    /// Fail every non-EXPLAIN run with this message.
    pub fn failing_run(mut self, message: impl Into<String>) -> Self {
        self.run_error = Some(message.into());
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.seen.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GraphClient for MockGraphClient {
    async fn run(&self, cypher: &str) -> GraphResult<Vec<RawRecord>> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(cypher.to_string());
        }
        if cypher.starts_with("EXPLAIN ") {
            return match &self.explain_error {
                Some(message) => Err(GraphError::Query(message.clone())),
                None => Ok(Vec::new()),
            };
        }
        match &self.run_error {
            Some(message) => Err(GraphError::Query(message.clone())),
            None => Ok(self.records.clone()),
        }
    }
}
