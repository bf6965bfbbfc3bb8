use anyhow::{Context, Result};

use nl2cypher_config::Config;
use nl2cypher_graph::resolve_schema;

pub async fn execute(config: Config) -> Result<()> {
    let schema = resolve_schema(config.schema_path.as_deref()).context("Failed to load schema")?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
