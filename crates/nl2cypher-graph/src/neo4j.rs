//! Neo4j client over the Bolt protocol.

use std::collections::BTreeMap;

use async_trait::async_trait;
use neo4rs::{query, BoltMap, BoltType, Graph, Row};
use tracing::{debug, info};

use nl2cypher_core::{GraphClient, GraphError, GraphResult, RawRecord, RawValue};

/// [`GraphClient`] backed by a pooled `neo4rs` connection.
///
/// Every [`GraphClient::run`] call checks a connection out of the pool and
/// returns it when the stream is dropped, so concurrent requests never share
/// a session.
pub struct Neo4jClient {
    graph: Graph,
    uri: String,
}

impl Neo4jClient {
    /// Connect and verify the connection with a trivial query.
    pub async fn connect(uri: &str, user: &str, password: &str) -> GraphResult<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;
        let client = Self {
            graph,
            uri: uri.to_string(),
        };
        client
            .run("RETURN 1")
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;
        info!(uri, "Connected to Neo4j");
        Ok(client)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[async_trait]
impl GraphClient for Neo4jClient {
    async fn run(&self, cypher: &str) -> GraphResult<Vec<RawRecord>> {
        debug!(cypher, "Running Cypher");
        let mut stream = self
            .graph
            .execute(query(cypher))
            .await
            .map_err(|e| GraphError::Query(e.to_string()))?;

        let mut records = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| GraphError::Query(e.to_string()))?
        {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    async fn close(&self) {
        // The pool closes its connections when the graph handle drops.
        info!(uri = %self.uri, "Closing Neo4j client");
    }
}

fn row_to_record(row: &Row) -> GraphResult<RawRecord> {
    let map: BoltMap = row
        .to()
        .map_err(|e| GraphError::Conversion(e.to_string()))?;
    Ok(record_from_map(map))
}

// Rows come back keyed by a hash map, so field order is by name.
fn record_from_map(map: BoltMap) -> RawRecord {
    let mut record: RawRecord = map
        .value
        .into_iter()
        .map(|(key, value)| (key.value, from_bolt(value)))
        .collect();
    record.sort_by(|a, b| a.0.cmp(&b.0));
    record
}

fn from_bolt(value: BoltType) -> RawValue {
    match value {
        BoltType::Null(_) => RawValue::Null,
        BoltType::Boolean(b) => RawValue::Bool(b.value),
        BoltType::Integer(i) => RawValue::Int(i.value),
        BoltType::Float(f) => RawValue::Float(f.value),
        BoltType::String(s) => RawValue::String(s.value),
        BoltType::List(list) => RawValue::List(list.value.into_iter().map(from_bolt).collect()),
        BoltType::Map(map) => RawValue::Map(from_bolt_map(map)),
        BoltType::Node(node) => RawValue::Node {
            id: node.id.value,
            labels: node
                .labels
                .value
                .into_iter()
                .filter_map(|label| match label {
                    BoltType::String(s) => Some(s.value),
                    _ => None,
                })
                .collect(),
            properties: from_bolt_map(node.properties),
        },
        BoltType::Relation(rel) => RawValue::Relationship {
            id: rel.id.value,
            rel_type: rel.typ.value,
            properties: from_bolt_map(rel.properties),
        },
        BoltType::UnboundedRelation(rel) => RawValue::Relationship {
            id: rel.id.value,
            rel_type: rel.typ.value,
            properties: from_bolt_map(rel.properties),
        },
        other => RawValue::Other(format!("{other:?}")),
    }
}

fn from_bolt_map(map: BoltMap) -> BTreeMap<String, RawValue> {
    map.value
        .into_iter()
        .map(|(key, value)| (key.value, from_bolt(value)))
        .collect()
}
