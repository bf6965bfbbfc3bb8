use anyhow::{Context, Result};
use std::path::PathBuf;

use nl2cypher_config::Config;
use nl2cypher_core::{confidence_for, GraphSchema, ValidationOutcome};
use nl2cypher_graph::{resolve_schema, RuleBasedValidator};
use nl2cypher_query::{normalize, NormalizeOptions};

use super::read_input;

pub async fn execute(config: Config, file: Option<PathBuf>, normalize_first: bool) -> Result<()> {
    let schema = resolve_schema(config.schema_path.as_deref()).context("Failed to load schema")?;
    let mut query = read_input(file.as_deref()).await?;
    if normalize_first {
        query = normalize(&query, &NormalizeOptions::from(&config.query)).query;
    }

    let report = report(&query, &schema);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn report(query: &str, schema: &GraphSchema) -> serde_json::Value {
    let outcome = ValidationOutcome::from_errors(RuleBasedValidator::new().check(query, schema));
    serde_json::json!({
        "cypher_query": query.trim(),
        "is_valid": outcome.is_valid,
        "errors": outcome.errors,
        "confidence": confidence_for(outcome.errors.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl2cypher_graph::medical_schema;

    #[test]
    fn test_report_for_unknown_label() {
        let report = report("MATCH (x:Foo) RETURN x", &medical_schema());
        assert_eq!(report["is_valid"], false);
        assert_eq!(report["errors"][0], "Unknown node label: Foo");
        assert_eq!(report["confidence"], 0.8);
    }

    #[test]
    fn test_report_for_valid_query() {
        let report = report("MATCH (d:Drug) RETURN d.name\n", &medical_schema());
        assert_eq!(report["is_valid"], true);
        assert_eq!(report["cypher_query"], "MATCH (d:Drug) RETURN d.name");
    }
}
