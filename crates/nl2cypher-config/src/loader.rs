//! Loading configuration from disk and the process environment.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{Config, ConfigError, ConfigResult};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// `$XDG_CONFIG_HOME/nl2cypher/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nl2cypher").join("config.toml"))
    }

    /// Read and parse a TOML file. No environment overrides are applied.
    pub async fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Config> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let config = Config::from_toml_str(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Full load: explicit file (must exist), else the default file when
    /// present, else defaults; then process environment overrides.
    pub async fn load(path: Option<&Path>) -> ConfigResult<Config> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path).await?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(default) => Self::load_from_file(default).await?,
                None => {
                    debug!("No configuration file, using defaults");
                    Config::default()
                }
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }
}
