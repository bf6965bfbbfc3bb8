//! Schema catalogue.
//!
//! The built-in catalogue describes the medical knowledge graph the service
//! was first deployed against. A JSON file with the same shape replaces it.

use std::path::Path;

use nl2cypher_core::{GraphSchema, NodeSchema, RelationshipSchema};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schema file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

const DISEASE_PROPERTIES: &[&str] = &[
    "name",
    "desc",
    "prevent",
    "cause",
    "easy_get",
    "cure_way",
    "cure_department",
    "cure_lasttime",
    "cured_prob",
    "get_prob",
    "yibao_status",
    "get_way",
    "cost_money",
    "category",
];

const NAMED_LABELS: &[&str] = &[
    "Drug",
    "Food",
    "Symptom",
    "Check",
    "Department",
    "Producer",
    "Category",
    "Treatment",
];

/// (type, from, to)
const RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("has_symptom", "Disease", "Symptom"),
    ("recommand_drug", "Disease", "Drug"),
    ("recommand_eat", "Disease", "Food"),
    ("not_eat", "Disease", "Food"),
    ("do_eat", "Disease", "Food"),
    ("command_drug", "Disease", "Drug"),
    ("drugs_of", "Drug", "Producer"),
    ("need_check", "Disease", "Check"),
    ("acompany_with", "Disease", "Disease"),
    ("belongs_to", "Disease", "Department"),
    ("sub_department", "Department", "Department"),
    ("has_category", "Disease", "Category"),
    ("treated_by", "Disease", "Treatment"),
];

/// The built-in medical knowledge-graph schema.
pub fn medical_schema() -> GraphSchema {
    let disease = DISEASE_PROPERTIES
        .iter()
        .fold(NodeSchema::named("Disease"), |node, prop| {
            node.with_property(*prop, "string")
        });
    let nodes = std::iter::once(disease)
        .chain(NAMED_LABELS.iter().map(|label| NodeSchema::named(*label)))
        .collect();
    let relationships = RELATIONSHIPS
        .iter()
        .map(|(rel_type, from, to)| RelationshipSchema::new(*rel_type, *from, *to))
        .collect();
    GraphSchema::new(nodes, relationships)
}

/// Load a schema from a JSON file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<GraphSchema, SchemaError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: shown.clone(),
        source,
    })?;
    let schema: GraphSchema =
        serde_json::from_str(&text).map_err(|source| SchemaError::Parse {
            path: shown.clone(),
            source,
        })?;
    info!(
        path = %shown,
        labels = schema.nodes.len(),
        relationships = schema.relationships.len(),
        "Loaded graph schema"
    );
    Ok(schema)
}

/// Schema from `path` when given, the built-in catalogue otherwise.
pub fn resolve_schema(path: Option<&Path>) -> Result<GraphSchema, SchemaError> {
    match path {
        Some(path) => load_schema(path),
        None => Ok(medical_schema()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_medical_schema_catalogue() {
        let schema = medical_schema();
        assert_eq!(schema.nodes.len(), 9);
        assert_eq!(schema.relationships.len(), 13);
        assert!(schema.has_label("Producer"));
        assert!(schema.has_relationship("drugs_of"));
        assert_eq!(schema.nodes[0].properties.len(), DISEASE_PROPERTIES.len());
    }

    #[test]
    fn test_load_schema_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nodes": [{{"label": "Gene"}}],
                "relationships": [{{"type": "encodes", "from_node": "Gene", "to_node": "Gene"}}]}}"#
        )
        .unwrap();

        let schema = load_schema(file.path()).unwrap();
        assert_eq!(schema.node_labels(), vec!["Gene"]);
        assert_eq!(schema.relationship_types(), vec!["encodes"]);
    }

    #[test]
    fn test_load_schema_reports_path() {
        let err = load_schema("/definitely/missing/schema.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/missing/schema.json"));
    }

    #[test]
    fn test_resolve_defaults_to_builtin() {
        assert_eq!(resolve_schema(None).unwrap(), medical_schema());
    }
}
