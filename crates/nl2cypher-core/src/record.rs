//! Graph result records.
//!
//! [`RawValue`] is what a graph driver hands back, before normalization.
//! [`RecordValue`] is the generic tagged representation returned to callers:
//! a node, a relationship, or a plain JSON scalar/container.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value as produced by the graph driver.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
    /// Entity with identity and labels
    Node {
        id: i64,
        labels: Vec<String>,
        properties: BTreeMap<String, RawValue>,
    },
    /// Entity with identity and a relationship type
    Relationship {
        id: i64,
        rel_type: String,
        properties: BTreeMap<String, RawValue>,
    },
    /// Anything else the driver produced (paths, temporal, spatial values)
    /// in its display form.
    Other(String),
}

/// One driver record: ordered `(field, value)` pairs.
pub type RawRecord = Vec<(String, RawValue)>;

/// A normalized record keyed by field name, in the order the query
/// returned its fields.
pub type RecordMap = serde_json::Map<String, serde_json::Value>;

/// Normalized result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Node {
        #[serde(rename = "type")]
        kind: NodeTag,
        labels: Vec<String>,
        properties: serde_json::Map<String, serde_json::Value>,
    },
    Relationship {
        #[serde(rename = "type")]
        kind: RelationshipTag,
        relationship_type: String,
        properties: serde_json::Map<String, serde_json::Value>,
    },
    Scalar(serde_json::Value),
}

/// Serialized as the literal `"Node"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeTag {
    Node,
}

/// Serialized as the literal `"Relationship"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipTag {
    Relationship,
}

impl RecordValue {
    pub fn node(labels: Vec<String>, properties: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::Node {
            kind: NodeTag::Node,
            labels,
            properties,
        }
    }

    pub fn relationship(
        relationship_type: impl Into<String>,
        properties: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self::Relationship {
            kind: RelationshipTag::Relationship,
            relationship_type: relationship_type.into(),
            properties,
        }
    }

    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Node {
                labels, properties, ..
            } => serde_json::json!({
                "type": "Node",
                "labels": labels,
                "properties": properties,
            }),
            Self::Relationship {
                relationship_type,
                properties,
                ..
            } => serde_json::json!({
                "type": "Relationship",
                "relationship_type": relationship_type,
                "properties": properties,
            }),
            Self::Scalar(value) => value,
        }
    }

    /// Properties of a node or relationship, `None` for scalars.
    pub fn properties(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Self::Node { properties, .. } | Self::Relationship { properties, .. } => {
                Some(properties)
            }
            Self::Scalar(_) => None,
        }
    }
}
