//! Game session tracking for Tablekeeper.
//!
//! A [`SessionTracker`] holds at most one active [`Session`] per guild.
//! While a session runs, handlers record players, consumables, loot,
//! encounters, rolls and XP into it. Ending the session archives a
//! [`SessionRecord`] through a [`SessionArchive`] and hands back a
//! [`Recap`] for the table.

pub mod archive;
pub mod config;
pub mod error;
pub mod event;
pub mod recap;
pub mod session;
pub mod tracker;

pub use archive::{MemoryArchive, SessionArchive, SessionRecord};
pub use config::{RollLogPolicy, TrackerConfig};
pub use error::{SessionError, SessionResult};
pub use event::SessionEvent;
pub use recap::Recap;
pub use session::{ConsumableUse, GuildId, LoggedAction, Session, format_clock};
pub use tracker::SessionTracker;
