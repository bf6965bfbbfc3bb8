//! Client-side execution gate for the query service.
//!
//! Only a query that the service generated with enough confidence and that
//! passes validation is ever sent to `/execute`.

pub mod client;
mod error;
pub mod outcome;

pub use client::GateClient;
pub use error::{GateError, GateResult};
pub use outcome::{summarize_records, Endpoint, GateOutcome, GateStage};
