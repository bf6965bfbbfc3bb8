//! Application context: process-wide collaborators built once at startup and
//! shared by every request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use nl2cypher_config::Config;
use nl2cypher_core::{
    confidence_for, ExecuteRequest, ExecutionResult, GenerationParams, GraphClient, GraphSchema,
    QueryRequest, QueryResponse, QueryValidator, TextGenerator, ValidationRequest,
    ValidationResponse,
};
use nl2cypher_graph::{normalize_records, resolve_schema, select_validator, Neo4jClient};
use nl2cypher_llm::{
    cypher_system_prompt, explain_prompt, explanation_unavailable, suggestion_prompt, user_prompt,
    OpenAiCompatibleGenerator, EXPLAIN_PARAMS, EXPLAIN_SYSTEM, GENERATE_PARAMS, NO_SUGGESTIONS,
    SUGGEST_SYSTEM,
};
use nl2cypher_query::{normalize, NormalizeOptions};

use crate::{Result, WebError};

/// Accepted range for `limit`.
pub const LIMIT_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

#[derive(Clone)]
pub struct AppContext {
    schema: Arc<GraphSchema>,
    system_prompt: Arc<str>,
    generator: Arc<dyn TextGenerator>,
    validator: Arc<dyn QueryValidator>,
    graph: Option<Arc<dyn GraphClient>>,
    options: Arc<NormalizeOptions>,
    generate_params: GenerationParams,
    explain_params: GenerationParams,
    port: u16,
}

impl AppContext {
    /// Context over the given collaborators. The validator is live when a
    /// graph client is supplied and rule-based otherwise.
    pub fn new(
        schema: GraphSchema,
        generator: Arc<dyn TextGenerator>,
        graph: Option<Arc<dyn GraphClient>>,
    ) -> Self {
        let validator = select_validator(graph.clone());
        Self {
            system_prompt: cypher_system_prompt(&schema).into(),
            schema: Arc::new(schema),
            generator,
            validator,
            graph,
            options: Arc::new(NormalizeOptions::default()),
            generate_params: GENERATE_PARAMS,
            explain_params: EXPLAIN_PARAMS,
            port: nl2cypher_config::DEFAULT_PORT,
        }
    }

    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_generation_params(mut self, generate: GenerationParams, explain: GenerationParams) -> Self {
        self.generate_params = generate;
        self.explain_params = explain;
        self
    }

    /// Build every collaborator from configuration.
    ///
    /// A missing or unreachable database is not fatal: the service starts
    /// with rule-based validation and `/execute` answers 503.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let schema = resolve_schema(config.schema_path.as_deref())
            .map_err(|e| WebError::Config(e.to_string()))?;

        let api_key = match config.llm.api_key() {
            Some(key) => key.to_string(),
            None => {
                warn!("No LLM API key configured, generation requests will fail");
                String::new()
            }
        };
        let generator = OpenAiCompatibleGenerator::new(
            api_key,
            config.llm.endpoint.clone(),
            config.llm.model.clone(),
            config.llm.timeout_secs,
        );
        info!(model = %config.llm.model, endpoint = %generator.base_url(), "Text generator ready");

        let graph: Option<Arc<dyn GraphClient>> = match config.neo4j.credentials() {
            Some(creds) => match Neo4jClient::connect(creds.uri, creds.user, creds.password).await {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!(uri = creds.uri, error = %e, "Neo4j connection failed");
                    None
                }
            },
            None => {
                warn!("Neo4j credentials not configured");
                None
            }
        };

        Ok(Self::new(schema, Arc::new(generator), graph)
            .with_normalize_options(NormalizeOptions::from(&config.query))
            .with_port(config.server.port)
            .with_generation_params(
                GenerationParams::new(config.llm.temperature, config.llm.max_tokens),
                GenerationParams::new(config.llm.temperature, config.llm.explain_max_tokens),
            ))
    }

    pub fn schema(&self) -> &GraphSchema {
        &self.schema
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_connected(&self) -> bool {
        self.graph.is_some()
    }

    pub fn validator_name(&self) -> &'static str {
        self.validator.name()
    }

    /// Natural language to a normalized, explained and scored query.
    pub async fn generate(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let question = request.natural_language_query.trim();
        if question.is_empty() {
            return Err(WebError::BadRequest("natural_language_query must not be empty".into()));
        }
        if let Some(limit) = request.limit.filter(|l| !LIMIT_RANGE.contains(l)) {
            return Err(WebError::BadRequest(format!("limit must be between 1 and 1000, got {limit}")));
        }
        info!(question, "Generating Cypher");

        let raw = self
            .generator
            .generate(
                &self.system_prompt,
                &user_prompt(question, request.query_type, request.limit),
                self.generate_params,
            )
            .await
            .map_err(|e| WebError::Generation(format!("LLM API error: {e}")))?;
        debug!(raw = %raw, "Raw generated text");

        let normalized = normalize(&raw, &self.options);
        info!(
            cypher = %normalized.query,
            merged = normalized.merged,
            rewritten = normalized.rewritten,
            "Normalized generated query"
        );

        let explanation = match self
            .generator
            .generate(EXPLAIN_SYSTEM, &explain_prompt(&normalized.query), self.explain_params)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Explanation failed");
                explanation_unavailable(&e)
            }
        };

        let outcome = self.validator.validate(&normalized.query, &self.schema).await;
        let confidence = confidence_for(outcome.errors.len());

        Ok(QueryResponse {
            cypher_query: normalized.query,
            explanation,
            confidence,
            validated: outcome.is_valid,
            validation_errors: outcome.errors,
        })
    }

    /// Validate a query, with improvement suggestions when it fails.
    pub async fn validate(&self, request: &ValidationRequest) -> ValidationResponse {
        let outcome = self.validator.validate(&request.cypher_query, &self.schema).await;

        let mut suggestions = Vec::new();
        if !outcome.errors.is_empty() {
            let prompt = suggestion_prompt(&request.cypher_query, &outcome.errors);
            match self
                .generator
                .generate(SUGGEST_SYSTEM, &prompt, self.explain_params)
                .await
            {
                Ok(text) => suggestions.push(text),
                Err(e) => {
                    warn!(error = %e, "Suggestion generation failed");
                    suggestions.push(NO_SUGGESTIONS.to_string());
                }
            }
        }

        ValidationResponse {
            is_valid: outcome.is_valid,
            errors: outcome.errors,
            suggestions,
        }
    }

    /// Normalize and run a query against the database.
    pub async fn execute(&self, request: &ExecuteRequest) -> Result<ExecutionResult> {
        let graph = self
            .graph
            .as_ref()
            .ok_or_else(|| WebError::Unavailable("Neo4j connection unavailable".into()))?;

        let cypher = normalize(&request.cypher_query, &self.options).query;
        info!(cypher = %cypher, "Executing Cypher");

        let start = Instant::now();
        let result = graph.run(&cypher).await;
        let execution_time = start.elapsed().as_secs_f64();

        match result {
            Ok(records) => {
                let records = normalize_records(records);
                let count = records.len();
                info!(execution_time, count, "Query executed");
                Ok(ExecutionResult {
                    success: true,
                    records,
                    count,
                    execution_time,
                })
            }
            Err(e) => {
                warn!(execution_time, error = %e, "Query execution failed");
                Err(WebError::Execution(format!("Query execution failed: {e}")))
            }
        }
    }

    /// Release the database connection.
    pub async fn shutdown(&self) {
        if let Some(graph) = &self.graph {
            graph.close().await;
        }
    }
}
