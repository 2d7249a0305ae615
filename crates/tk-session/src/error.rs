//! Error types for session tracking.

use thiserror::Error;

use crate::session::GuildId;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while tracking a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The guild already has a session running.
    #[error("session {number} is already active for guild {guild}")]
    AlreadyActive {
        /// Guild that owns the running session.
        guild: GuildId,
        /// Number of the running session.
        number: u32,
    },

    /// The guild has no session running.
    #[error("no active session for guild {0}")]
    NoActiveSession(GuildId),

    /// Session numbers start at 1.
    #[error("session number must be at least 1")]
    InvalidNumber,

    /// The archive failed to store or read sessions.
    #[error("session archive failed: {0}")]
    Archive(#[source] Box<dyn std::error::Error + Send + Sync>),
}
