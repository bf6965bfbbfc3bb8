use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use nl2cypher_config::Config;
use nl2cypher_query::{normalize, NormalizeOptions};

use super::read_input;

pub async fn execute(config: Config, file: Option<PathBuf>, json: bool) -> Result<()> {
    let raw = read_input(file.as_deref()).await?;
    let normalized = normalize(&raw, &NormalizeOptions::from(&config.query));
    debug!(applied = ?normalized.applied, "Normalized input");

    if json {
        println!("{}", serde_json::to_string_pretty(&normalized)?);
    } else {
        println!("{}", normalized.query);
    }
    Ok(())
}
