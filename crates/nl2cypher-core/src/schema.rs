//! Graph schema definition.
//!
//! The schema is the permitted set of node labels and relationship types (with
//! their endpoint labels). It is loaded once at startup and shared read-only by
//! every validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node label and its property types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub label: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl NodeSchema {
    /// Node with a single `name: string` property, the common case.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            properties: BTreeMap::from([("name".to_string(), "string".to_string())]),
        }
    }

    /// Builder: add a property.
    pub fn with_property(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.properties.insert(name.into(), kind.into());
        self
    }
}

/// A relationship type with its endpoint labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSchema {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub from_node: String,
    pub to_node: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl RelationshipSchema {
    pub fn new(
        rel_type: impl Into<String>,
        from_node: impl Into<String>,
        to_node: impl Into<String>,
    ) -> Self {
        Self {
            rel_type: rel_type.into(),
            from_node: from_node.into(),
            to_node: to_node.into(),
            properties: BTreeMap::new(),
        }
    }
}

/// Immutable set of node labels and relationship types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSchema {
    pub nodes: Vec<NodeSchema>,
    pub relationships: Vec<RelationshipSchema>,
}

impl GraphSchema {
    pub fn new(nodes: Vec<NodeSchema>, relationships: Vec<RelationshipSchema>) -> Self {
        Self {
            nodes,
            relationships,
        }
    }

    /// Labels are case-sensitive, matching the database.
    pub fn has_label(&self, label: &str) -> bool {
        self.nodes.iter().any(|n| n.label == label)
    }

    pub fn has_relationship(&self, rel_type: &str) -> bool {
        self.relationships.iter().any(|r| r.rel_type == rel_type)
    }

    pub fn node_labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    pub fn relationship_types(&self) -> Vec<&str> {
        self.relationships.iter().map(|r| r.rel_type.as_str()).collect()
    }

    /// Compact, prompt-ready description of the schema.
    pub fn describe(&self) -> String {
        let mut out = String::from("Node labels:\n");
        for node in &self.nodes {
            let props = node
                .properties
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("- {} {{{}}}\n", node.label, props));
        }
        out.push_str("Relationship types:\n");
        for rel in &self.relationships {
            out.push_str(&format!(
                "- (:{})-[:{}]->(:{})\n",
                rel.from_node, rel.rel_type, rel.to_node
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> GraphSchema {
        GraphSchema::new(
            vec![NodeSchema::named("Disease"), NodeSchema::named("Symptom")],
            vec![RelationshipSchema::new("has_symptom", "Disease", "Symptom")],
        )
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let schema = tiny();
        assert!(schema.has_label("Disease"));
        assert!(!schema.has_label("disease"));
        assert!(schema.has_relationship("has_symptom"));
        assert!(!schema.has_relationship("HAS_SYMPTOM"));
    }

    #[test]
    fn test_relationship_serializes_type_field() {
        let json = serde_json::to_value(&tiny()).unwrap();
        assert_eq!(json["relationships"][0]["type"], "has_symptom");
        assert_eq!(json["relationships"][0]["from_node"], "Disease");
    }

    #[test]
    fn test_describe_lists_relationship_endpoints() {
        let text = tiny().describe();
        assert!(text.contains("(:Disease)-[:has_symptom]->(:Symptom)"));
        assert!(text.contains("- Symptom {name: string}"));
    }
}
