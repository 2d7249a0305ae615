//! The per-guild session state machine.
//!
//! Each guild is either idle or has exactly one active session. `start`
//! moves a guild from idle to active, `end` archives the session and moves
//! it back. Recording calls on an idle guild are ignored and report
//! `false`, so handlers can record unconditionally.

use std::collections::HashMap;

use chrono::Utc;
use tk_mechanics::DiceRoll;

use crate::archive::{MemoryArchive, SessionArchive, SessionRecord};
use crate::config::{RollLogPolicy, TrackerConfig};
use crate::error::{SessionError, SessionResult};
use crate::event::SessionEvent;
use crate::recap::Recap;
use crate::session::{GuildId, Session};

/// Tracks active sessions for every guild.
pub struct SessionTracker {
    sessions: HashMap<GuildId, Session>,
    archive: Box<dyn SessionArchive>,
    config: TrackerConfig,
}

impl SessionTracker {
    /// Create a tracker that archives finished sessions into `archive`.
    pub fn new(archive: Box<dyn SessionArchive>, config: TrackerConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            archive,
            config,
        }
    }

    /// A tracker whose archive lives only in memory.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryArchive::new()), TrackerConfig::default())
    }

    /// Get the tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The active session for a guild, if any.
    pub fn active(&self, guild: &GuildId) -> Option<&Session> {
        self.sessions.get(guild)
    }

    /// Whether the guild has a session running.
    pub fn is_active(&self, guild: &GuildId) -> bool {
        self.sessions.contains_key(guild)
    }

    /// Number of guilds with a session running.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Start a session. Fails if the guild already has one running.
    pub fn start(
        &mut self,
        guild: &GuildId,
        number: u32,
        location: &str,
        level: u32,
    ) -> SessionResult<&Session> {
        if number == 0 {
            return Err(SessionError::InvalidNumber);
        }
        if let Some(existing) = self.sessions.get(guild) {
            return Err(SessionError::AlreadyActive {
                guild: guild.clone(),
                number: existing.number,
            });
        }

        let session = Session::new(guild.clone(), number, location.trim(), level, Utc::now());
        tracing::info!(%guild, number, location = %session.location, level, "session started");
        Ok(self.sessions.entry(guild.clone()).or_insert(session))
    }

    /// Start a session numbered one past the guild's last archived session.
    pub fn start_next(
        &mut self,
        guild: &GuildId,
        location: &str,
        level: u32,
    ) -> SessionResult<&Session> {
        let number = self.next_session_number(guild)?;
        self.start(guild, number, location, level)
    }

    /// End the guild's session, archive it and return the recap.
    ///
    /// If the archive fails the session stays active so ending can be retried.
    pub fn end(&mut self, guild: &GuildId) -> SessionResult<Recap> {
        let session = self
            .sessions
            .get(guild)
            .ok_or_else(|| SessionError::NoActiveSession(guild.clone()))?;

        let ended_at = Utc::now();
        let record = SessionRecord::from_session(session, ended_at, &self.config);
        let archive_id = match self.archive.archive(&record) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(%guild, error = %e, "failed to archive session, keeping it active");
                return Err(e);
            }
        };

        let mut session = self
            .sessions
            .remove(guild)
            .ok_or_else(|| SessionError::NoActiveSession(guild.clone()))?;
        session.ended_at = Some(ended_at);

        let mut recap = Recap::from_session(&session, ended_at, &self.config);
        recap.archive_id = Some(archive_id);
        tracing::info!(
            %guild,
            number = session.number,
            archive_id,
            duration = %recap.duration_text(),
            "session ended"
        );
        Ok(recap)
    }

    /// Record an event into the guild's active session.
    ///
    /// Returns false when no session is running or the event had nothing
    /// to record.
    pub fn record(&mut self, guild: &GuildId, event: SessionEvent) -> bool {
        let roll_policy = self.config.roll_policy;
        let Some(session) = self.sessions.get_mut(guild) else {
            return false;
        };
        let now = Utc::now();

        let recorded = match &event {
            SessionEvent::PlayerJoined(name) => session.add_player(name.trim()),
            SessionEvent::Consumable { player, item } => {
                session.use_consumable(player, item, now);
                true
            }
            SessionEvent::Xp(amount) => session.award_xp(*amount, now),
            SessionEvent::Roll { roll, .. }
                if roll_policy == RollLogPolicy::D20Only && !roll.expr.is_d20() =>
            {
                false
            }
            _ => match event.log_text() {
                Some(text) => {
                    session.log(text, now);
                    true
                }
                None => false,
            },
        };

        if recorded {
            tracing::debug!(%guild, ?event, "recorded session event");
        }
        recorded
    }

    /// Append a free-form line to the session log.
    pub fn log_action(&mut self, guild: &GuildId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.record(guild, SessionEvent::Action(text.to_string()))
    }

    /// Add a player to the session. Returns false if they already joined.
    pub fn add_player(&mut self, guild: &GuildId, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        self.record(guild, SessionEvent::PlayerJoined(name.to_string()))
    }

    /// Record a consumable used by a player.
    pub fn use_consumable(&mut self, guild: &GuildId, item: &str, player: &str) -> bool {
        if item.trim().is_empty() {
            return false;
        }
        self.record(
            guild,
            SessionEvent::Consumable {
                player: player.to_string(),
                item: item.trim().to_string(),
            },
        )
    }

    /// Record loot found by a player.
    pub fn record_loot<S: AsRef<str>>(&mut self, guild: &GuildId, player: &str, items: &[S]) -> bool {
        self.record(
            guild,
            SessionEvent::Loot {
                player: player.to_string(),
                items: items.iter().map(|i| i.as_ref().to_string()).collect(),
            },
        )
    }

    /// Record monsters a player encountered.
    pub fn record_encounter<S: AsRef<str>>(
        &mut self,
        guild: &GuildId,
        player: &str,
        monsters: &[S],
    ) -> bool {
        self.record(
            guild,
            SessionEvent::Encounter {
                player: player.to_string(),
                monsters: monsters.iter().map(|m| m.as_ref().to_string()).collect(),
            },
        )
    }

    /// Record a dice roll, subject to the roll logging policy.
    pub fn record_roll(&mut self, guild: &GuildId, player: &str, roll: &DiceRoll) -> bool {
        self.record(
            guild,
            SessionEvent::Roll {
                player: player.to_string(),
                roll: roll.clone(),
            },
        )
    }

    /// Award XP to the table.
    pub fn award_xp(&mut self, guild: &GuildId, amount: u32) -> bool {
        self.record(guild, SessionEvent::Xp(amount))
    }

    /// Archived sessions for a guild, newest first.
    pub fn history(&self, guild: &GuildId, limit: usize) -> SessionResult<Vec<SessionRecord>> {
        self.archive.history(guild, limit)
    }

    /// The number the guild's next session should get.
    pub fn next_session_number(&self, guild: &GuildId) -> SessionResult<u32> {
        Ok(self
            .archive
            .latest_number(guild)?
            .map_or(1, |n| n.saturating_add(1)))
    }
}
