//! Generate, validate, execute and schema endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use nl2cypher_core::{
    ExecuteRequest, ExecutionResult, GraphSchema, QueryRequest, QueryResponse, ValidationRequest,
    ValidationResponse,
};

use crate::{AppContext, WebError};

pub fn graph_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(service_info))
        .route("/schema", get(schema))
        .route("/generate", post(generate))
        .route("/validate", post(validate))
        .route("/execute", post(execute))
}

async fn service_info(State(ctx): State<AppContext>) -> Json<Value> {
    Json(json!({
        "service": "NL2Cypher API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /generate": "Generate a Cypher query",
            "POST /validate": "Validate a Cypher query",
            "POST /execute": "Execute a Cypher query",
            "GET /schema": "Graph schema",
        },
        "port": ctx.port(),
        "validator": ctx.validator_name(),
        "neo4jConnected": ctx.is_connected(),
    }))
}

async fn schema(State(ctx): State<AppContext>) -> Json<GraphSchema> {
    Json(ctx.schema().clone())
}

async fn generate(
    State(ctx): State<AppContext>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, WebError> {
    info!(question = %req.natural_language_query, "Generate request");
    Ok(Json(ctx.generate(&req).await?))
}

async fn validate(
    State(ctx): State<AppContext>,
    Json(req): Json<ValidationRequest>,
) -> Json<ValidationResponse> {
    info!(cypher = %req.cypher_query, "Validate request");
    Json(ctx.validate(&req).await)
}

async fn execute(
    State(ctx): State<AppContext>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<ExecutionResult>, WebError> {
    info!(cypher = %req.cypher_query, "Execute request");
    Ok(Json(ctx.execute(&req).await?))
}
