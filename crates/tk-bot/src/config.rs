//! Bot configuration.
//!
//! Settings come from an optional TOML file, then environment variables
//! (after loading `.env`), then command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tk_session::TrackerConfig;

use crate::error::{BotError, BotResult};

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "TABLEKEEPER_DB";
/// Environment variable overriding the command prefix.
pub const PREFIX_ENV: &str = "TABLEKEEPER_PREFIX";
/// Environment variable holding the chat platform token.
pub const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";

/// Configuration for the bot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix that marks a chat line as a command.
    pub prefix: String,
    /// SQLite database file.
    pub database: PathBuf,
    /// Chat platform token. Only a gateway needs it.
    pub token: Option<String>,
    /// RNG seed for reproducible rolls; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Session tracker settings.
    pub session: TrackerConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "/".to_string(),
            database: PathBuf::from("data/tablekeeper.db"),
            token: None,
            seed: None,
            session: TrackerConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load the config file if given, then apply `.env` and environment overrides.
    pub fn load(path: Option<&Path>) -> BotResult<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "could not load .env");
        }

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> BotResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| BotError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| BotError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Override settings from environment variables, read through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(db) = get(DB_ENV) {
            self.database = PathBuf::from(db);
        }
        if let Some(prefix) = get(PREFIX_ENV) {
            self.prefix = prefix.trim().to_string();
        }
        if let Some(token) = get(TOKEN_ENV) {
            self.token = Some(token);
        }
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the command prefix. A blank prefix is ignored.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim();
        if !prefix.is_empty() {
            self.prefix = prefix.to_string();
        }
        self
    }

    /// Set the database path.
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = path.into();
        self
    }

    /// Set the session tracker settings.
    pub fn with_session(mut self, session: TrackerConfig) -> Self {
        self.session = session;
        self
    }
}
