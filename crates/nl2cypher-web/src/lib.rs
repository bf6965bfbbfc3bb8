//! HTTP service for the nl2cypher gateway.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /generate` | [`AppContext::generate`] |
//! | `POST /validate` | [`AppContext::validate`] |
//! | `POST /execute` | [`AppContext::execute`] |
//! | `GET /schema` | serialized schema |
//! | `GET /` | service info |
//! | `GET /health` | liveness |

pub mod context;
pub mod routes;
pub mod server;

mod error;

pub use context::AppContext;
pub use error::{Result, WebError};
pub use server::{build_router, start_server};
