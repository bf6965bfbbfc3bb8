//! Top-level configuration and environment overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::components::{
    GateConfig, LlmConfig, LoggingConfig, Neo4jConfig, QueryConfig, ServerConfig,
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// API key variables, highest priority first.
pub const API_KEY_VARS: &[&str] = &["LLM_API_KEY", "OPENROUTER_API_KEY", "DEEPSEEK_API_KEY"];

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub neo4j: Neo4jConfig,
    pub query: QueryConfig,
    pub gate: GateConfig,
    pub logging: LoggingConfig,
    /// JSON schema catalogue replacing the built-in one.
    pub schema_path: Option<PathBuf>,
}

impl Config {
    /// Parse TOML. Missing sections and fields take their defaults.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply environment overrides read through `env`.
    ///
    /// Takes a lookup function rather than reading the process environment so
    /// callers and tests control the source. Empty values are ignored.
    pub fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(uri) = get("NEO4J_URI") {
            self.neo4j.uri = Some(uri);
        }
        if let Some(user) = get("NEO4J_USER") {
            self.neo4j.user = Some(user);
        }
        if let Some(password) = get("NEO4J_PASSWORD") {
            self.neo4j.password = Some(password);
        }
        if let Some((var, key)) = API_KEY_VARS.iter().find_map(|var| get(var).map(|k| (*var, k))) {
            debug!(var, "API key taken from environment");
            self.llm.api_key = Some(key);
        }
        if let Some(url) = get("LLM_BASE_URL") {
            self.llm.endpoint = Some(url);
        }
        if let Some(model) = get("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(host) = get("GRAPH_SERVICE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("GRAPH_SERVICE_PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "GRAPH_SERVICE_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8101);
        assert_eq!(config.gate.generate_timeout_secs, 60);
        assert_eq!(config.gate.validate_timeout_secs, 15);
        assert_eq!(config.gate.execute_timeout_secs, 20);
        assert_eq!(config.gate.min_confidence, 0.7);
        assert_eq!(config.query.sparse_relationships, vec!["drugs_of".to_string()]);
        assert!(config.neo4j.credentials().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            schema_path = "schema.json"

            [server]
            port = 9000

            [neo4j]
            uri = "bolt://db:7687"
            user = "neo4j"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.schema_path, Some(PathBuf::from("schema.json")));
        let creds = config.neo4j.credentials().unwrap();
        assert_eq!(creds.uri, "bolt://db:7687");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[server\nport = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("NEO4J_URI", "bolt://localhost:7687"),
                ("NEO4J_USER", "neo4j"),
                ("NEO4J_PASSWORD", "pw"),
                ("LLM_MODEL", "gpt-4o-mini"),
                ("GRAPH_SERVICE_PORT", "8200"),
            ]))
            .unwrap();

        assert!(config.neo4j.credentials().is_some());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.server.port, 8200);
    }

    #[test_case(&[("DEEPSEEK_API_KEY", "ds")], "ds" ; "last fallback")]
    #[test_case(&[("OPENROUTER_API_KEY", "or"), ("DEEPSEEK_API_KEY", "ds")], "or" ; "openrouter before deepseek")]
    #[test_case(&[("LLM_API_KEY", "main"), ("OPENROUTER_API_KEY", "or")], "main" ; "primary wins")]
    #[test_case(&[("LLM_API_KEY", ""), ("DEEPSEEK_API_KEY", "ds")], "ds" ; "empty is skipped")]
    fn test_api_key_priority(vars: &[(&str, &str)], expected: &str) {
        let mut config = Config::default();
        config.apply_env_overrides(env(vars)).unwrap();
        assert_eq!(config.llm.api_key(), Some(expected));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(env(&[("GRAPH_SERVICE_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("GRAPH_SERVICE_PORT"));
    }

    #[test]
    fn test_partial_neo4j_credentials_disable_live_mode() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[("NEO4J_URI", "bolt://x"), ("NEO4J_USER", "u")]))
            .unwrap();
        assert!(config.neo4j.credentials().is_none());
    }
}
