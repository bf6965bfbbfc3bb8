//! Gate results and record summaries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use nl2cypher_core::{ExecutionResult, QueryResponse, RecordMap};

/// Terminal gate decision. Generation, explanation and validation happen
/// inside the service's `/generate` call, so the client only sees the end
/// of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStage {
    /// Passed every check and ran.
    Executable,
    /// Stopped before `/execute`; `reason` says why.
    Rejected,
}

/// Which base URL served a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Primary,
    Backup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub stage: GateStage,
    pub response: QueryResponse,
    /// Present only when the query ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionResult>,
    /// Endpoint that served the last call.
    pub endpoint: Endpoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl GateOutcome {
    pub fn executed(&self) -> bool {
        self.execution.is_some()
    }

    /// Entity names found in the executed records.
    pub fn entities(&self) -> Vec<String> {
        self.execution
            .as_ref()
            .map(|result| summarize_records(&result.records))
            .unwrap_or_default()
    }
}

/// Collect the `name` property of every node and relationship plus every
/// non-empty string scalar, in first-seen order without duplicates.
pub fn summarize_records(records: &[RecordMap]) -> Vec<String> {
    let mut names = Vec::new();
    for record in records {
        for value in record.values() {
            collect_json(value, &mut names);
        }
    }
    names
}

// Nodes and relationships are tagged objects, at the top level or nested
// inside lists and maps.
fn collect_json(value: &Value, names: &mut Vec<String>) {
    match value {
        Value::String(s) => push_name(names, s),
        Value::Array(items) => items.iter().for_each(|item| collect_json(item, names)),
        Value::Object(map) => match map.get("properties") {
            Some(Value::Object(properties)) if map.contains_key("type") => {
                if let Some(Value::String(name)) = properties.get("name") {
                    push_name(names, name);
                }
            }
            _ => map.values().for_each(|item| collect_json(item, names)),
        },
        _ => {}
    }
}

fn push_name(names: &mut Vec<String>, name: &str) {
    let name = name.trim();
    if !name.is_empty() && !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}
