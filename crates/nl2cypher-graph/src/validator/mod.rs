//! Query validators.
//!
//! Two strategies behind [`QueryValidator`]: [`RuleBasedValidator`] always
//! works, [`LiveValidator`] needs a database. [`select_validator`] picks one
//! once at startup.

mod live;
mod rules;

use std::sync::Arc;

use nl2cypher_core::{GraphClient, QueryValidator, ValidationOutcome};
use tracing::{info, warn};

pub use live::{LiveValidator, BAD_LEADING_KEYWORD};
pub use rules::{RuleBasedValidator, EMPTY_QUERY, MATCH_WITHOUT_RETURN, VAGUE_CREATE};

/// Live validation when a database client is available, rule-based otherwise.
pub fn select_validator(graph: Option<Arc<dyn GraphClient>>) -> Arc<dyn QueryValidator> {
    match graph {
        Some(graph) => {
            info!("Using live query validator");
            Arc::new(LiveValidator::new(graph))
        }
        None => {
            warn!("No database connection, falling back to rule-based validator");
            Arc::new(RuleBasedValidator::new())
        }
    }
}

fn log_outcome(validator: &str, outcome: &ValidationOutcome) {
    if outcome.is_valid {
        info!(validator, "Query validation passed");
    } else {
        warn!(validator, errors = ?outcome.errors, "Query validation failed");
    }
}
