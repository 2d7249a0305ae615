//! Archived sessions.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use tk_session::{GuildId, SessionArchive, SessionError, SessionRecord, SessionResult};

use crate::Database;
use crate::error::{StoreError, StoreResult};

/// Session archive backed by the `sessions` table.
#[derive(Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Wrap a database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a finished session and return its row id.
    pub fn insert(&self, record: &SessionRecord) -> StoreResult<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (session_number, guild_id, location, level, start_time,
                    end_time, players, actions_log, xp_given, consumables_used)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.number,
                    record.guild_id.as_str(),
                    record.location,
                    record.level,
                    record.started_at.to_rfc3339(),
                    record.ended_at.to_rfc3339(),
                    record.players,
                    record.actions_log,
                    record.xp_given,
                    record.consumables_used,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Fetch one archived session by row id.
    pub fn get(&self, id: i64) -> StoreResult<Option<SessionRecord>> {
        self.db.with_conn(|conn| {
            let raw = conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM sessions WHERE id = ?1"),
                    params![id],
                    RawRecord::from_row,
                )
                .optional()?;
            raw.map(RawRecord::into_record).transpose()
        })
    }

    /// Most recent sessions for a guild, newest first.
    pub fn recent(&self, guild: &GuildId, limit: usize) -> StoreResult<Vec<SessionRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM sessions WHERE guild_id = ?1
                 ORDER BY end_time DESC, id DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![guild.as_str(), limit], RawRecord::from_row)?;
            rows.map(|raw| raw?.into_record()).collect()
        })
    }

    /// Most recent sessions across all guilds, newest first.
    pub fn recent_all(&self, limit: usize) -> StoreResult<Vec<SessionRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM sessions ORDER BY end_time DESC, id DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], RawRecord::from_row)?;
            rows.map(|raw| raw?.into_record()).collect()
        })
    }

    /// Highest session number archived for a guild.
    pub fn max_number(&self, guild: &GuildId) -> StoreResult<Option<u32>> {
        self.db.with_conn(|conn| {
            let n = conn.query_row(
                "SELECT MAX(session_number) FROM sessions WHERE guild_id = ?1",
                params![guild.as_str()],
                |row| row.get::<_, Option<u32>>(0),
            )?;
            Ok(n)
        })
    }
}

fn archive_err(e: StoreError) -> SessionError {
    SessionError::Archive(Box::new(e))
}

impl SessionArchive for SessionStore {
    fn archive(&mut self, record: &SessionRecord) -> SessionResult<i64> {
        let id = self.insert(record).map_err(archive_err)?;
        tracing::debug!(id, guild = %record.guild_id, number = record.number, "archived session");
        Ok(id)
    }

    fn history(&self, guild: &GuildId, limit: usize) -> SessionResult<Vec<SessionRecord>> {
        self.recent(guild, limit).map_err(archive_err)
    }

    fn latest_number(&self, guild: &GuildId) -> SessionResult<Option<u32>> {
        self.max_number(guild).map_err(archive_err)
    }
}

const COLUMNS: &str = "id, guild_id, session_number, location, level, start_time, end_time, \
                       players, actions_log, consumables_used, xp_given";

struct RawRecord {
    id: i64,
    guild_id: String,
    number: u32,
    location: String,
    level: u32,
    started_at: String,
    ended_at: String,
    players: String,
    actions_log: String,
    consumables_used: String,
    xp_given: u32,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            guild_id: row.get(1)?,
            number: row.get(2)?,
            location: row.get(3)?,
            level: row.get(4)?,
            started_at: row.get(5)?,
            ended_at: row.get(6)?,
            players: row.get(7)?,
            actions_log: row.get(8)?,
            consumables_used: row.get(9)?,
            xp_given: row.get(10)?,
        })
    }

    fn into_record(self) -> StoreResult<SessionRecord> {
        Ok(SessionRecord {
            id: Some(self.id),
            guild_id: GuildId::new(self.guild_id),
            number: self.number,
            location: self.location,
            level: self.level,
            started_at: parse_time(&self.started_at)?,
            ended_at: parse_time(&self.ended_at)?,
            players: self.players,
            actions_log: self.actions_log,
            consumables_used: self.consumables_used,
            xp_given: self.xp_given,
        })
    }
}

fn parse_time(text: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp(text.to_string()))
}
