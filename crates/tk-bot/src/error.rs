//! Error types for the bot host.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for bot operations.
pub type BotResult<T> = Result<T, BotError>;

/// Errors that can stop the bot from starting or running a command.
#[derive(Debug, Error)]
pub enum BotError {
    /// The config file could not be read.
    #[error("could not read config {path}: {source}")]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file was not valid TOML for [`crate::BotConfig`].
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A file given on the command line could not be read.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database failure.
    #[error("{0}")]
    Store(#[from] tk_store::StoreError),

    /// Dice, loot or character sheet failure.
    #[error("{0}")]
    Mech(#[from] tk_mechanics::MechError),
}
