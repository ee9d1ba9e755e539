//! Runtime configuration for the issue tracker.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`issueflow.toml` in the working directory, or an explicit
//!    path)
//! 3. `ISSUEFLOW_*` environment variables, e.g. `ISSUEFLOW_DATABASE_URL`
//! 4. the `DB_PATH` environment variable, kept for existing deployments

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Base name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "issueflow";

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "ISSUEFLOW";

/// Environment variable that overrides `database_url` last.
pub const DATABASE_PATH_ENV: &str = "DB_PATH";

/// Issue tracker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// `SQLite` database path, or `:memory:` for a throwaway database.
    pub database_url: String,
    /// Upper bound on pooled database connections.
    pub max_connections: u32,
    /// `tracing` filter directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_url: "issues.db".to_owned(),
            max_connections: 4,
            log_filter: "info".to_owned(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum TrackerConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The connection pool would have no connections.
    #[error("max_connections must be at least 1")]
    NoConnections,

    /// The database URL is empty.
    #[error("database_url must not be empty")]
    EmptyDatabaseUrl,
}

impl TrackerConfig {
    /// Loads configuration from the file, environment and defaults.
    ///
    /// When `path` is `None` the default file is optional; an explicit path
    /// must exist.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerConfigError`] when a source is malformed or the
    /// resulting settings are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, TrackerConfigError> {
        let file = match path {
            Some(explicit) => File::from(explicit).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let builder = defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("database_url", std::env::var(DATABASE_PATH_ENV).ok())?;
        Self::from_builder(builder)
    }

    /// Loads configuration from TOML text layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerConfigError`] when the text is malformed or the
    /// resulting settings are invalid.
    pub fn from_toml(contents: &str) -> Result<Self, TrackerConfigError> {
        let builder = defaults()?.add_source(File::from_str(contents, FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, TrackerConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), TrackerConfigError> {
        if self.max_connections == 0 {
            return Err(TrackerConfigError::NoConnections);
        }
        if self.database_url.trim().is_empty() {
            return Err(TrackerConfigError::EmptyDatabaseUrl);
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, TrackerConfigError> {
    let fallback = TrackerConfig::default();
    Ok(Config::builder()
        .set_default("database_url", fallback.database_url)?
        .set_default("max_connections", i64::from(fallback.max_connections))?
        .set_default("log_filter", fallback.log_filter)?)
}
