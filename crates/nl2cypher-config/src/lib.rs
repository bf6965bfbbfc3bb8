//! # nl2cypher configuration
//!
//! Typed configuration for the gateway, loaded from TOML and overridden by
//! environment variables.
//!
//! ```rust,no_run
//! use nl2cypher_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::load(None).await?;
//!     println!("listening on {}", config.server.bind_address());
//!     Ok(())
//! }
//! ```

pub mod components;
mod config;
mod loader;

pub use components::*;
pub use config::*;
pub use loader::*;
