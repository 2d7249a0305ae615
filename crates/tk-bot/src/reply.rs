//! What a command sends back.

use std::fmt;

use serde::Serialize;

use crate::embed::Embed;

/// A reply to a chat command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "body", rename_all = "lowercase")]
pub enum Reply {
    /// A plain message.
    Text(String),
    /// A card.
    Embed(Embed),
}

impl Reply {
    /// A plain message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The message text, if this is a plain reply.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Embed(_) => None,
        }
    }

    /// The card, if this is an embed reply.
    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Self::Embed(e) => Some(e),
            Self::Text(_) => None,
        }
    }
}

impl From<Embed> for Reply {
    fn from(e: Embed) -> Self {
        Self::Embed(e)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => f.write_str(t),
            Self::Embed(e) => e.fmt(f),
        }
    }
}
