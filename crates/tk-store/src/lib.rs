//! SQLite persistence for Tablekeeper.
//!
//! One [`Database`] handle is shared by the session archive, the character
//! store and the monster manual. Schema is created on open.

pub mod characters;
pub mod error;
pub mod monsters;
pub mod sessions;

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;

pub use characters::{CharacterStore, Upsert};
pub use error::{StoreError, StoreResult};
pub use monsters::MonsterStore;
pub use sessions::SessionStore;

/// A shared SQLite connection with the Tablekeeper schema.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path`, creating its directory.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init_schema(&conn)?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(Self::wrap(conn))
    }

    /// Open a database that lives only as long as this handle.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self::wrap(conn))
    }

    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn init_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_number INTEGER NOT NULL,
                guild_id TEXT NOT NULL,
                location TEXT NOT NULL,
                level INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                players TEXT NOT NULL DEFAULT '',
                actions_log TEXT NOT NULL DEFAULT '',
                xp_given INTEGER NOT NULL DEFAULT 0,
                consumables_used TEXT NOT NULL DEFAULT ''
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_guild ON sessions(guild_id);

            CREATE TABLE IF NOT EXISTS characters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                discord_id TEXT,
                class_level TEXT NOT NULL DEFAULT '',
                race TEXT NOT NULL DEFAULT '',
                background TEXT NOT NULL DEFAULT '',
                data TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_characters_owner ON characters(discord_id);

            CREATE TABLE IF NOT EXISTS monsters (
                \"index\" INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL DEFAULT '',
                size TEXT NOT NULL DEFAULT '',
                ac INTEGER NOT NULL DEFAULT 0,
                hp INTEGER NOT NULL DEFAULT 0,
                speed TEXT NOT NULL DEFAULT '',
                align TEXT NOT NULL DEFAULT '',
                legendary INTEGER NOT NULL DEFAULT 0,
                source TEXT NOT NULL DEFAULT '',
                str INTEGER NOT NULL DEFAULT 10,
                dex INTEGER NOT NULL DEFAULT 10,
                con INTEGER NOT NULL DEFAULT 10,
                int INTEGER NOT NULL DEFAULT 10,
                wis INTEGER NOT NULL DEFAULT 10,
                cha INTEGER NOT NULL DEFAULT 10
            );
            CREATE INDEX IF NOT EXISTS idx_monsters_name ON monsters(name COLLATE NOCASE);",
        )?;
        Ok(())
    }

    /// Archive for finished sessions.
    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(self.clone())
    }

    /// Imported character sheets.
    pub fn characters(&self) -> CharacterStore {
        CharacterStore::new(self.clone())
    }

    /// The monster manual.
    pub fn monsters(&self) -> MonsterStore {
        MonsterStore::new(self.clone())
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.conn.lock();
        f(&mut conn)
    }
}
