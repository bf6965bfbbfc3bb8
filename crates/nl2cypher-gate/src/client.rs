//! HTTP gate over the query service.
//!
//! A question is generated, checked against the confidence gate, validated
//! and only then executed. Each call goes to the primary base URL first and
//! to the backup exactly once when the primary cannot be reached or times
//! out. The whole sequence runs under one deadline.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use nl2cypher_config::GateConfig;
use nl2cypher_core::{
    is_executable, ExecuteRequest, ExecutionResult, QueryRequest, QueryResponse,
    ValidationRequest, ValidationResponse,
};

use crate::error::{GateError, GateResult};
use crate::outcome::{Endpoint, GateOutcome, GateStage};

pub struct GateClient {
    http: reqwest::Client,
    primary: String,
    backup: String,
    generate_timeout: Duration,
    validate_timeout: Duration,
    execute_timeout: Duration,
    overall_timeout: Duration,
    min_confidence: f64,
}

impl GateClient {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            primary: config.primary_url.trim_end_matches('/').to_string(),
            backup: config.backup_url.trim_end_matches('/').to_string(),
            generate_timeout: config.generate_timeout(),
            validate_timeout: config.validate_timeout(),
            execute_timeout: config.execute_timeout(),
            overall_timeout: config.overall_timeout(),
            min_confidence: config.min_confidence,
        }
    }

    /// Run a question through the gate under the overall deadline.
    pub async fn ask(&self, request: &QueryRequest) -> GateResult<GateOutcome> {
        tokio::time::timeout(self.overall_timeout, self.run(request))
            .await
            .map_err(|_| GateError::Deadline(self.overall_timeout.as_secs()))?
    }

    async fn run(&self, request: &QueryRequest) -> GateResult<GateOutcome> {
        let (response, endpoint): (QueryResponse, _) = self
            .post("/generate", request, self.generate_timeout)
            .await?;
        info!(
            cypher = %response.cypher_query,
            confidence = response.confidence,
            validated = response.validated,
            "Query generated"
        );

        if let Some(reason) = self.rejection(&response) {
            info!(%reason, "Query rejected by gate");
            return Ok(GateOutcome {
                stage: GateStage::Rejected,
                response,
                execution: None,
                endpoint,
                reason: Some(reason),
            });
        }

        let check = ValidationRequest {
            cypher_query: response.cypher_query.clone(),
        };
        let (validation, endpoint): (ValidationResponse, _) = self
            .post("/validate", &check, self.validate_timeout)
            .await?;
        if !validation.is_valid {
            let reason = format!("validation failed: {}", validation.errors.join("; "));
            info!(%reason, "Query rejected by gate");
            return Ok(GateOutcome {
                stage: GateStage::Rejected,
                response,
                execution: None,
                endpoint,
                reason: Some(reason),
            });
        }

        let run = ExecuteRequest {
            cypher_query: response.cypher_query.clone(),
        };
        let (execution, endpoint): (ExecutionResult, _) = self
            .post("/execute", &run, self.execute_timeout)
            .await?;
        info!(count = execution.count, ?endpoint, "Query executed through gate");

        Ok(GateOutcome {
            stage: GateStage::Executable,
            response,
            execution: Some(execution),
            endpoint,
            reason: None,
        })
    }

    /// `min_confidence` can tighten the execution threshold, never loosen it.
    fn rejection(&self, response: &QueryResponse) -> Option<String> {
        if !response.validated {
            return Some(format!(
                "query failed validation: {}",
                response.validation_errors.join("; ")
            ));
        }
        if !is_executable(response.confidence, response.validated)
            || response.confidence < self.min_confidence
        {
            return Some(format!("confidence {:.2} below threshold", response.confidence));
        }
        None
    }

    async fn post<B, R>(
        &self,
        path: &'static str,
        body: &B,
        timeout: Duration,
    ) -> GateResult<(R, Endpoint)>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (response, endpoint) = match self.send(&self.primary, path, body, timeout).await {
            Ok(response) => (response, Endpoint::Primary),
            Err(primary) if primary.is_connect() || primary.is_timeout() => {
                warn!(path, error = %primary, backup = %self.backup, "Primary endpoint failed, trying backup");
                match self.send(&self.backup, path, body, timeout).await {
                    Ok(response) => (response, Endpoint::Backup),
                    Err(backup) => {
                        return Err(GateError::Unreachable {
                            path,
                            primary: primary.to_string(),
                            backup: backup.to_string(),
                        })
                    }
                }
            }
            Err(primary) => {
                return Err(GateError::Unreachable {
                    path,
                    primary: primary.to_string(),
                    backup: "not attempted".to_string(),
                })
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GateError::Status {
                path,
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }

        let parsed = response.json::<R>().await.map_err(|e| GateError::Decode {
            path,
            message: e.to_string(),
        })?;
        debug!(path, ?endpoint, "Gate call succeeded");
        Ok((parsed, endpoint))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        base: &str,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .post(format!("{base}{path}"))
            .json(body)
            .timeout(timeout)
            .send()
            .await
    }
}

/// The service reports failures as `{"detail": "..."}`.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn response(confidence: f64, validated: bool) -> QueryResponse {
        QueryResponse {
            cypher_query: "MATCH (d:Drug) RETURN d.name".into(),
            explanation: String::new(),
            confidence,
            validated,
            validation_errors: Vec::new(),
        }
    }

    #[test_case(0.9, true, 0.7, false ; "confident and valid")]
    #[test_case(0.7, true, 0.7, false ; "threshold is inclusive")]
    #[test_case(0.6, true, 0.7, true ; "low confidence")]
    #[test_case(0.9, false, 0.7, true ; "invalid")]
    #[test_case(0.8, true, 0.85, true ; "configured threshold tightens")]
    #[test_case(0.6, true, 0.5, true ; "configured threshold cannot loosen")]
    fn test_rejection(confidence: f64, validated: bool, min: f64, rejected: bool) {
        let client = GateClient::new(&GateConfig {
            min_confidence: min,
            ..Default::default()
        });
        assert_eq!(client.rejection(&response(confidence, validated)).is_some(), rejected);
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail":"Neo4j connection unavailable"}"#), "Neo4j connection unavailable");
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
    }
}
