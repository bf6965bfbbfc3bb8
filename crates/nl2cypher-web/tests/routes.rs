//! Route tests driven through the router with in-memory collaborators

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use nl2cypher_core::test_support::MockGraphClient;
use nl2cypher_core::{GraphClient, LlmError, RawValue};
use nl2cypher_graph::medical_schema;
use nl2cypher_llm::{MockTextGenerator, EXPLAIN_SYSTEM, SUGGEST_SYSTEM};
use nl2cypher_web::{build_router, AppContext};

const GENERATOR: &str = "Cypher generator";

fn app(generator: MockTextGenerator, graph: Option<Arc<MockGraphClient>>) -> Router {
    let graph = graph.map(|g| g as Arc<dyn GraphClient>);
    build_router(AppContext::new(medical_schema(), Arc::new(generator), graph))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_generate_normalizes_and_scores() {
    let generator = MockTextGenerator::new()
        .respond_when(
            GENERATOR,
            "```cypher\nMATCH (d:Disease) WHERE d.name='Flu' RETURN d.name\n\
             MATCH (d:Disease)-[:has_symptom]-(s:Symptom) WHERE d.name='Flu' RETURN s.name\n```",
        )
        .respond_when(EXPLAIN_SYSTEM, "Finds the symptoms of Flu.");

    let (status, body) = send(
        app(generator, None),
        "POST",
        "/generate",
        Some(json!({"naturalLanguageQuery": "What are the symptoms of Flu?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["cypher_query"],
        "MATCH (d:Disease)\nWHERE d.name='Flu'\nOPTIONAL MATCH (d:Disease)-[:has_symptom]-(s:Symptom)\nRETURN d.name, s.name"
    );
    assert_eq!(body["explanation"], "Finds the symptoms of Flu.");
    assert_eq!(body["confidence"], 0.9);
    assert_eq!(body["validated"], true);
    assert_eq!(body["validation_errors"], json!([]));
}

#[tokio::test]
async fn test_generate_with_unknown_label_lowers_confidence() {
    let generator =
        MockTextGenerator::new().respond_when(GENERATOR, "MATCH (x:Foo)-[:cures]->(y:Drug) RETURN y.name");

    let (status, body) = send(
        app(generator, None),
        "POST",
        "/generate",
        Some(json!({"natural_language_query": "q", "query_type": "MATCH"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confidence"], 0.7);
    assert_eq!(body["validated"], false);
    assert_eq!(body["validation_errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_explanation_failure_is_not_fatal() {
    let generator = MockTextGenerator::new()
        .respond_when(GENERATOR, "MATCH (d:Drug) RETURN d.name")
        .fail_when(EXPLAIN_SYSTEM, LlmError::Timeout(60));

    let (status, body) = send(
        app(generator, None),
        "POST",
        "/generate",
        Some(json!({"natural_language_query": "All drugs"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["explanation"]
        .as_str()
        .unwrap()
        .starts_with("Unable to generate explanation"));
}

#[tokio::test]
async fn test_generation_failure_is_500_with_detail() {
    let generator = MockTextGenerator::new().fail_when(
        GENERATOR,
        LlmError::Api {
            status: 502,
            message: "upstream down".into(),
        },
    );

    let (status, body) = send(
        app(generator, None),
        "POST",
        "/generate",
        Some(json!({"natural_language_query": "q"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("upstream down"));
}

#[tokio::test]
async fn test_generate_rejects_out_of_range_limit() {
    let (status, body) = send(
        app(MockTextGenerator::new(), None),
        "POST",
        "/generate",
        Some(json!({"natural_language_query": "q", "limit": 5000})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_validate_returns_suggestions_on_errors() {
    let generator = MockTextGenerator::new().respond_when(SUGGEST_SYSTEM, "Use the Disease label.");

    let (status, body) = send(
        app(generator, None),
        "POST",
        "/validate",
        Some(json!({"cypherQuery": "MATCH (x:Foo) RETURN x"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["errors"], json!(["Unknown node label: Foo"]));
    assert_eq!(body["suggestions"], json!(["Use the Disease label."]));
}

#[tokio::test]
async fn test_validate_suggestion_failure_uses_placeholder() {
    let generator =
        MockTextGenerator::new().fail_when(SUGGEST_SYSTEM, LlmError::Http("refused".into()));

    let (_, body) = send(
        app(generator, None),
        "POST",
        "/validate",
        Some(json!({"cypher_query": "MATCH (x:Foo) RETURN x"})),
    )
    .await;

    assert_eq!(body["suggestions"], json!(["unable to generate suggestions"]));
}

#[tokio::test]
async fn test_valid_query_has_no_suggestions() {
    let generator = MockTextGenerator::new();
    let (_, body) = send(
        app(generator, None),
        "POST",
        "/validate",
        Some(json!({"cypher_query": "MATCH (d:Drug) RETURN d.name"})),
    )
    .await;

    assert_eq!(body["is_valid"], true);
    assert_eq!(body["suggestions"], json!([]));
}

#[tokio::test]
async fn test_execute_without_database_is_503() {
    let (status, body) = send(
        app(MockTextGenerator::new(), None),
        "POST",
        "/execute",
        Some(json!({"cypher_query": "MATCH (d:Drug) RETURN d.name"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_execute_normalizes_query_and_records() {
    let graph = Arc::new(MockGraphClient::new().with_records(vec![vec![(
        "d".to_string(),
        RawValue::Node {
            id: 1,
            labels: vec!["Drug".into()],
            properties: BTreeMap::from([("name".to_string(), RawValue::String("Aspirin".into()))]),
        },
    )]]));

    let (status, body) = send(
        app(MockTextGenerator::new(), Some(graph.clone())),
        "POST",
        "/execute",
        Some(json!({"cypher_query": "```\nMATCH (d:Drug) RETURN d\n```"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["records"][0]["d"]["type"], "Node");
    assert_eq!(body["records"][0]["d"]["properties"]["name"], "Aspirin");
    assert_eq!(graph.queries(), vec!["MATCH (d:Drug) RETURN d"]);
}

#[tokio::test]
async fn test_execute_failure_is_500() {
    let graph = Arc::new(MockGraphClient::new().failing_run("Neo.ClientError.Statement.SyntaxError"));

    let (status, body) = send(
        app(MockTextGenerator::new(), Some(graph)),
        "POST",
        "/execute",
        Some(json!({"cypher_query": "MATCH (d:Drug) RETURN d"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("SyntaxError"));
}

#[tokio::test]
async fn test_schema_and_info_endpoints() {
    let (status, schema) = send(app(MockTextGenerator::new(), None), "GET", "/schema", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schema["nodes"][0]["label"], "Disease");
    assert_eq!(schema["relationships"].as_array().unwrap().len(), 13);

    let graph = Arc::new(MockGraphClient::new());
    let (_, info) = send(app(MockTextGenerator::new(), Some(graph)), "GET", "/", None).await;
    assert_eq!(info["neo4jConnected"], true);
    assert_eq!(info["validator"], "live");
    assert_eq!(info["port"], 8101);

    let (status, health) = send(app(MockTextGenerator::new(), None), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health, json!({"status": "healthy"}));
}
