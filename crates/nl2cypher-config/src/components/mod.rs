//! Configuration components, one per concern.

pub mod gate;
pub mod llm;
pub mod logging;
pub mod neo4j;
pub mod query;
pub mod server;

pub use gate::*;
pub use llm::*;
pub use logging::*;
pub use neo4j::*;
pub use query::*;
pub use server::*;
