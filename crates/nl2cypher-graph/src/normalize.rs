//! Result normalization.
//!
//! Driver values become [`RecordValue`]s: nodes and relationships are tagged
//! with their labels or type, scalars pass through as JSON, and anything
//! else is coerced to its string form. Lists and maps are walked so that
//! collected nodes stay tagged.

use nl2cypher_core::{RawRecord, RawValue, RecordMap, RecordValue};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Normalize every field of a record, keeping the field order.
pub fn normalize_record(record: RawRecord) -> RecordMap {
    record
        .into_iter()
        .map(|(field, value)| (field, normalize_value(value).into_json()))
        .collect()
}

/// Normalize a batch of records, preserving order.
pub fn normalize_records(records: Vec<RawRecord>) -> Vec<RecordMap> {
    records.into_iter().map(normalize_record).collect()
}

pub fn normalize_value(value: RawValue) -> RecordValue {
    match value {
        RawValue::Node {
            labels, properties, ..
        } => RecordValue::node(labels, properties_json(properties)),
        RawValue::Relationship {
            rel_type,
            properties,
            ..
        } => RecordValue::relationship(rel_type, properties_json(properties)),
        other => RecordValue::Scalar(to_json(other)),
    }
}

fn properties_json(properties: BTreeMap<String, RawValue>) -> Map<String, Value> {
    properties
        .into_iter()
        .map(|(key, value)| (key, to_json(value)))
        .collect()
}

fn to_json(value: RawValue) -> Value {
    match value {
        RawValue::Null => Value::Null,
        RawValue::Bool(b) => Value::Bool(b),
        RawValue::Int(i) => Value::from(i),
        // NaN and infinities have no JSON number form.
        RawValue::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        RawValue::String(s) | RawValue::Other(s) => Value::String(s),
        RawValue::List(items) => Value::Array(items.into_iter().map(to_json).collect()),
        RawValue::Map(map) => Value::Object(properties_json(map)),
        RawValue::Node {
            labels, properties, ..
        } => json!({
            "type": "Node",
            "labels": labels,
            "properties": properties_json(properties),
        }),
        RawValue::Relationship {
            rel_type,
            properties,
            ..
        } => json!({
            "type": "Relationship",
            "relationship_type": rel_type,
            "properties": properties_json(properties),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drug(name: &str) -> RawValue {
        RawValue::Node {
            id: 7,
            labels: vec!["Drug".into()],
            properties: BTreeMap::from([("name".to_string(), RawValue::String(name.into()))]),
        }
    }

    #[test]
    fn test_node_is_tagged() {
        let record = normalize_record(vec![("d".into(), drug("Aspirin"))]);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"d": {"type": "Node", "labels": ["Drug"], "properties": {"name": "Aspirin"}}})
        );
    }

    #[test]
    fn test_relationship_is_tagged() {
        let value = normalize_value(RawValue::Relationship {
            id: 1,
            rel_type: "has_symptom".into(),
            properties: BTreeMap::new(),
        });
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"type": "Relationship", "relationship_type": "has_symptom", "properties": {}})
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        let record = normalize_record(vec![
            ("name".into(), RawValue::String("Flu".into())),
            ("count".into(), RawValue::Int(3)),
            ("prob".into(), RawValue::Float(0.25)),
            ("missing".into(), RawValue::Null),
        ]);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"name": "Flu", "count": 3, "prob": 0.25, "missing": null})
        );
    }

    #[test]
    fn test_fields_keep_return_order() {
        let record = normalize_record(vec![
            ("s.name".into(), RawValue::String("cough".into())),
            ("d.name".into(), RawValue::String("Flu".into())),
            ("c".into(), RawValue::Int(1)),
        ]);
        let fields: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["s.name", "d.name", "c"]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"s.name":"cough","d.name":"Flu","c":1}"#
        );
    }

    #[test]
    fn test_collected_nodes_stay_tagged() {
        let value = normalize_value(RawValue::List(vec![drug("A"), drug("B")]));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json[1]["type"], "Node");
        assert_eq!(json[1]["properties"]["name"], "B");
    }

    #[test]
    fn test_unrepresentable_values_become_strings() {
        assert_eq!(
            normalize_value(RawValue::Float(f64::NAN)),
            RecordValue::Scalar(json!("NaN"))
        );
        assert_eq!(
            normalize_value(RawValue::Other("Date(2024-01-01)".into())),
            RecordValue::Scalar(json!("Date(2024-01-01)"))
        );
    }
}
