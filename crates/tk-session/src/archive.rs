//! Where finished sessions go.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::error::SessionResult;
use crate::session::{GuildId, Session};

/// A finished session, flattened for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Storage id, once stored.
    pub id: Option<i64>,
    /// Guild that played the session.
    pub guild_id: GuildId,
    /// Campaign session number.
    pub number: u32,
    /// Where the party was.
    pub location: String,
    /// Party level.
    pub level: u32,
    /// When play started.
    pub started_at: DateTime<Utc>,
    /// When play ended.
    pub ended_at: DateTime<Utc>,
    /// Player names joined with `, `.
    pub players: String,
    /// Rendered log lines joined with newlines.
    pub actions_log: String,
    /// `player: item` entries joined with `, `.
    pub consumables_used: String,
    /// Total XP awarded.
    pub xp_given: u32,
}

impl SessionRecord {
    /// Flatten a session that ended at `ended_at`.
    pub fn from_session(session: &Session, ended_at: DateTime<Utc>, config: &TrackerConfig) -> Self {
        let consumables: Vec<String> = session
            .consumables()
            .iter()
            .map(|c| c.to_string())
            .collect();
        Self {
            id: None,
            guild_id: session.guild_id.clone(),
            number: session.number,
            location: session.location.clone(),
            level: session.level,
            started_at: session.started_at,
            ended_at,
            players: session.players().join(", "),
            actions_log: session.rendered_actions(&config.time_format).join("\n"),
            consumables_used: consumables.join(", "),
            xp_given: session.xp_given(),
        }
    }
}

/// Persistent home for finished sessions.
pub trait SessionArchive: Send {
    /// Store a finished session and return its storage id.
    fn archive(&mut self, record: &SessionRecord) -> SessionResult<i64>;

    /// Most recent sessions for a guild, newest first.
    fn history(&self, guild: &GuildId, limit: usize) -> SessionResult<Vec<SessionRecord>>;

    /// Highest session number archived for a guild.
    fn latest_number(&self, guild: &GuildId) -> SessionResult<Option<u32>>;
}

/// An archive that only keeps records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    records: Vec<SessionRecord>,
}

impl MemoryArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// All archived records in insertion order.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }
}

impl SessionArchive for MemoryArchive {
    fn archive(&mut self, record: &SessionRecord) -> SessionResult<i64> {
        let id = self.records.len() as i64 + 1;
        let mut stored = record.clone();
        stored.id = Some(id);
        self.records.push(stored);
        Ok(id)
    }

    fn history(&self, guild: &GuildId, limit: usize) -> SessionResult<Vec<SessionRecord>> {
        Ok(self
            .records
            .iter()
            .rev()
            .filter(|r| &r.guild_id == guild)
            .take(limit)
            .cloned()
            .collect())
    }

    fn latest_number(&self, guild: &GuildId) -> SessionResult<Option<u32>> {
        Ok(self
            .records
            .iter()
            .filter(|r| &r.guild_id == guild)
            .map(|r| r.number)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn finished(guild: &str, number: u32) -> SessionRecord {
        let start = Utc::now();
        let mut s = Session::new(GuildId::from(guild), number, "Keep", 1, start);
        s.add_player("Ana");
        s.add_player("Bo");
        s.use_consumable("Ana", "Healing Potion", start);
        SessionRecord::from_session(&s, start + TimeDelta::hours(2), &TrackerConfig::default())
    }

    #[test]
    fn record_flattens_lists() {
        let r = finished("g", 1);
        assert_eq!(r.players, "Ana, Bo");
        assert_eq!(r.consumables_used, "Ana: Healing Potion");
        assert!(r.actions_log.ends_with("Ana used **Healing Potion**"));
        assert!(r.id.is_none());
    }

    #[test]
    fn memory_archive_assigns_ids() {
        let mut a = MemoryArchive::new();
        assert_eq!(a.archive(&finished("g", 1)).unwrap(), 1);
        assert_eq!(a.archive(&finished("g", 2)).unwrap(), 2);
        assert_eq!(a.records()[1].id, Some(2));
    }

    #[test]
    fn memory_archive_history_is_newest_first() {
        let mut a = MemoryArchive::new();
        a.archive(&finished("g", 1)).unwrap();
        a.archive(&finished("other", 7)).unwrap();
        a.archive(&finished("g", 2)).unwrap();

        let h = a.history(&GuildId::from("g"), 10).unwrap();
        let numbers: Vec<u32> = h.iter().map(|r| r.number).collect();
        assert_eq!(numbers, [2, 1]);
        assert_eq!(a.history(&GuildId::from("g"), 1).unwrap().len(), 1);
    }

    #[test]
    fn memory_archive_latest_number() {
        let mut a = MemoryArchive::new();
        assert_eq!(a.latest_number(&GuildId::from("g")).unwrap(), None);
        a.archive(&finished("g", 4)).unwrap();
        a.archive(&finished("g", 2)).unwrap();
        assert_eq!(a.latest_number(&GuildId::from("g")).unwrap(), Some(4));
    }
}
