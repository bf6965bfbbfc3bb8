use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{graph_routes, health_routes};
use crate::{AppContext, Result, WebError};

const MAX_BODY_SIZE_1MB: usize = 1024 * 1024;

/// All routes over `ctx`.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(graph_routes())
        .with_state(ctx)
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_1MB))
        .layer(cors)
}

/// Serve until `shutdown` resolves, then release the context's resources.
pub async fn start_server(
    ctx: AppContext,
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| WebError::Config(format!("Invalid address: {e}")))?;

    tracing::info!(
        validator = ctx.validator_name(),
        neo4j = ctx.is_connected(),
        "Starting graph service on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebError::Io)?;

    let app = build_router(ctx.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(WebError::Io)?;

    ctx.shutdown().await;
    tracing::info!("Graph service stopped");
    Ok(())
}
