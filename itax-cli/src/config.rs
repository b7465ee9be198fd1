//! Startup configuration.
//!
//! Layers, later wins:
//!
//! 1. Built-in defaults (`sqlite` on `:memory:`, best-effort parsing).
//! 2. An optional TOML file.
//! 3. Environment variables, after `.env` has been loaded:
//!
//! | Variable          | Field                        |
//! |-------------------|------------------------------|
//! | `ITAX_DB_BACKEND` | `database.backend`           |
//! | `DB_URL`          | `database.connection_string` |
//! | `ITAX_PARSE_MODE` | `parse_mode`                 |
//!
//! 4. Command-line flags, applied by the binary.
//!
//! ```toml
//! parse_mode = "strict"
//!
//! [database]
//! backend = "sqlite"
//! connection_string = "itax.db"
//! ```

use std::path::{Path, PathBuf};

use itax_core::db::DbConfig;
use itax_core::ParseMode;
use itax_core::intake::UnknownParseMode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_DB_BACKEND: &str = "ITAX_DB_BACKEND";
pub const ENV_DB_URL: &str = "DB_URL";
pub const ENV_PARSE_MODE: &str = "ITAX_PARSE_MODE";

/// Read when no `--config` flag is given, if present.
pub const DEFAULT_CONFIG_FILE: &str = "itax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{var}: {source}")]
    InvalidParseMode {
        var: &'static str,
        #[source]
        source: UnknownParseMode,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub parse_mode: ParseMode,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads `path`. A missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File layer plus process environment.
    ///
    /// With `path == None`, [`DEFAULT_CONFIG_FILE`] is used when it exists in
    /// the working directory and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|var| std::env::var(var).ok())?;
        debug!(
            backend = %config.database.backend,
            parse_mode = %config.parse_mode,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Applies overrides from `lookup`. Empty values are ignored.
    pub fn apply_env<F>(
        &mut self,
        lookup: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(backend) = read(ENV_DB_BACKEND) {
            self.database.backend = backend.trim().to_ascii_lowercase();
        }
        if let Some(url) = read(ENV_DB_URL) {
            self.database.connection_string = url;
        }
        if let Some(mode) = read(ENV_PARSE_MODE) {
            self.parse_mode = mode
                .parse()
                .map_err(|source| ConfigError::InvalidParseMode {
                    var: ENV_PARSE_MODE,
                    source,
                })?;
        }
        Ok(())
    }
}
