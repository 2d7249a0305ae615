//! Tablekeeper: a tabletop game assistant for chat servers.
//!
//! The [`Bot`] routes prefixed chat commands to the dice roller, loot
//! generator, monster manual, character sheets and session tracker. The
//! `console` module hosts it on a terminal; a chat gateway feeds it the
//! same way, one message at a time.

pub mod config;
pub mod console;
pub mod embed;
pub mod error;
pub mod reply;
pub mod router;

pub use config::BotConfig;
pub use embed::{Colour, Embed, EmbedField};
pub use error::{BotError, BotResult};
pub use reply::Reply;
pub use router::{Attachment, Bot, Context, character_embed};
