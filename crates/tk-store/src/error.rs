//! Error types for the store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite rejected a statement or could not open the file.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database directory could not be created.
    #[error("could not prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    /// A stored JSON column could not be encoded or decoded.
    #[error("bad stored data: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored timestamp could not be parsed.
    #[error("bad stored timestamp '{0}'")]
    Timestamp(String),

    /// Imported content was invalid.
    #[error("{0}")]
    Mech(#[from] tk_mechanics::MechError),

    /// No row matched.
    #[error("not found: {0}")]
    NotFound(String),
}
