use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nl2cypher_cli::cli::{Cli, Commands};
use nl2cypher_cli::commands;
use nl2cypher_config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    // Command line first, then RUST_LOG, then the config file.
    let env_filter = match cli.level_filter() {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { host, port } => commands::serve::execute(config, host, port).await?,
        Commands::Normalize { file, json } => commands::normalize::execute(config, file, json).await?,
        Commands::Validate { file, normalize } => {
            commands::validate::execute(config, file, normalize).await?
        }
        Commands::Schema => commands::schema::execute(config).await?,
        Commands::Ask {
            question,
            query_type,
            limit,
        } => commands::ask::execute(config, question, query_type, limit).await?,
    }

    Ok(())
}
