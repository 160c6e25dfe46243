//! Application configuration.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use elemental_grid::{GameMode, ScoringRule};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::engine::EngineConfig;

/// Environment variable overriding [`AppConfig::database_path`].
pub const DATABASE_PATH_ENV: &str = "ELEMENTAL_PATH_DB";

/// Where daily scores live.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreStoreConfig {
    /// Process memory; scores vanish on exit.
    Memory,
    /// The local SQLite database.
    #[default]
    Sqlite,
    /// A remote JSON service.
    Http {
        /// Service root; scores live under `{base_url}/scores`.
        base_url: String,
        /// Request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl ScoreStoreConfig {
    /// Request timeout of the HTTP store, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Http { timeout_secs, .. } => Some(Duration::from_secs(*timeout_secs)),
            _ => None,
        }
    }
}

/// Top-level configuration, read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite file holding the catalog, local scores and game logs.
    #[serde(default = "default_database_path")]
    database_path: String,

    /// Score store backend.
    #[serde(default)]
    score_store: ScoreStoreConfig,

    /// How guesses count toward the score.
    #[serde(default)]
    scoring: ScoringRule,

    /// Mode for the first puzzle.
    #[serde(default)]
    default_mode: GameMode,
}

fn default_database_path() -> String {
    "elemental_path.db".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            score_store: ScoreStoreConfig::default(),
            scoring: ScoringRule::default(),
            default_mode: GameMode::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(database = %config.database_path, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` if given, else defaults, then applies the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Applies [`DATABASE_PATH_ENV`] when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(DATABASE_PATH_ENV)
            && !path.trim().is_empty()
        {
            debug!(path = %path, "Database path overridden by environment");
            self.database_path = path;
        }
        self
    }

    /// Replaces the database path.
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_scoring(self.scoring)
            .with_default_mode(self.default_mode)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
