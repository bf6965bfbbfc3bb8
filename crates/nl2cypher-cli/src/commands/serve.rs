use anyhow::{Context, Result};
use tracing::info;

use nl2cypher_config::Config;
use nl2cypher_web::{start_server, AppContext};

pub async fn execute(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let ctx = AppContext::from_config(&config)
        .await
        .context("Failed to initialise service")?;
    start_server(ctx, &config.server.host, config.server.port, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
