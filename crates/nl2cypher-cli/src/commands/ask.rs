use anyhow::{Context, Result};
use tracing::info;

use nl2cypher_config::Config;
use nl2cypher_core::{QueryRequest, QueryType};
use nl2cypher_gate::GateClient;

pub async fn execute(
    config: Config,
    question: String,
    query_type: Option<QueryType>,
    limit: Option<u32>,
) -> Result<()> {
    let request = QueryRequest {
        natural_language_query: question,
        query_type,
        limit,
    };
    info!(primary = %config.gate.primary_url, backup = %config.gate.backup_url, "Asking through gate");

    let outcome = GateClient::new(&config.gate)
        .ask(&request)
        .await
        .context("Gate request failed")?;

    let output = serde_json::json!({
        "outcome": outcome,
        "entities": outcome.entities(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
