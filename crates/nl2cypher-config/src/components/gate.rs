//! Generate/validate/execute gate client

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub primary_url: String,
    /// Tried once when the primary cannot be reached or times out.
    pub backup_url: String,
    pub generate_timeout_secs: u64,
    pub validate_timeout_secs: u64,
    pub execute_timeout_secs: u64,
    /// Deadline for the whole generate/validate/execute sequence.
    pub overall_timeout_secs: u64,
    pub min_confidence: f64,
}

impl GateConfig {
    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout_secs)
    }

    pub fn validate_timeout(&self) -> Duration {
        Duration::from_secs(self.validate_timeout_secs)
    }

    pub fn execute_timeout(&self) -> Duration {
        Duration::from_secs(self.execute_timeout_secs)
    }

    pub fn overall_timeout(&self) -> Duration {
        Duration::from_secs(self.overall_timeout_secs)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            primary_url: "http://localhost:8101".to_string(),
            backup_url: "http://0.0.0.0:8101".to_string(),
            generate_timeout_secs: 60,
            validate_timeout_secs: 15,
            execute_timeout_secs: 20,
            overall_timeout_secs: 90,
            min_confidence: 0.7,
        }
    }
}
