//! Imported character sheets.

use std::collections::BTreeMap;

use rusqlite::{OptionalExtension, Row, params};
use tk_mechanics::CharacterSheet;

use crate::Database;
use crate::error::{StoreError, StoreResult};

/// Whether an upsert created a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new character was stored.
    Inserted,
    /// An existing character with the same name was replaced.
    Updated,
}

/// Character sheets keyed by unique character name.
#[derive(Clone)]
pub struct CharacterStore {
    db: Database,
}

impl CharacterStore {
    /// Wrap a database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a sheet, or replace the stored one with the same name.
    ///
    /// The owner is kept when an existing sheet is replaced by one without
    /// an owner.
    pub fn upsert(&self, sheet: &CharacterSheet) -> StoreResult<Upsert> {
        let data = serde_json::to_string(&sheet.fields)?;
        let outcome = self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            let exists = tx
                .query_row(
                    "SELECT 1 FROM characters WHERE name = ?1",
                    params![sheet.name],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();

            if exists {
                tx.execute(
                    "UPDATE characters
                     SET class_level = ?2, race = ?3, background = ?4, data = ?5,
                         discord_id = COALESCE(?6, discord_id)
                     WHERE name = ?1",
                    params![
                        sheet.name,
                        sheet.class_level,
                        sheet.race,
                        sheet.background,
                        data,
                        sheet.owner
                    ],
                )?;
            } else {
                tx.execute(
                    "INSERT INTO characters (name, discord_id, class_level, race, background, data)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        sheet.name,
                        sheet.owner,
                        sheet.class_level,
                        sheet.race,
                        sheet.background,
                        data
                    ],
                )?;
            }
            tx.commit()?;
            Ok(if exists { Upsert::Updated } else { Upsert::Inserted })
        })?;

        tracing::info!(name = %sheet.name, ?outcome, "stored character");
        Ok(outcome)
    }

    /// Look up a character by exact name.
    pub fn get(&self, name: &str) -> StoreResult<Option<CharacterSheet>> {
        self.query_one("SELECT name, discord_id, class_level, race, background, data
                        FROM characters WHERE name = ?1", name)
    }

    /// The first character owned by a chat user.
    pub fn get_by_owner(&self, owner: &str) -> StoreResult<Option<CharacterSheet>> {
        self.query_one("SELECT name, discord_id, class_level, race, background, data
                        FROM characters WHERE discord_id = ?1 ORDER BY id LIMIT 1", owner)
    }

    /// Assign a character to a chat user.
    pub fn set_owner(&self, name: &str, owner: &str) -> StoreResult<()> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE characters SET discord_id = ?2 WHERE name = ?1",
                params![name, owner],
            )?)
        })?;
        if changed == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        tracing::info!(name, owner, "claimed character");
        Ok(())
    }

    /// Remove a character. Returns false if none had that name.
    pub fn delete(&self, name: &str) -> StoreResult<bool> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute("DELETE FROM characters WHERE name = ?1", params![name])?)
        })?;
        if changed > 0 {
            tracing::info!(name, "deleted character");
        }
        Ok(changed > 0)
    }

    /// All character names, alphabetically.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM characters ORDER BY name COLLATE NOCASE")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    fn query_one(&self, sql: &str, key: &str) -> StoreResult<Option<CharacterSheet>> {
        self.db.with_conn(|conn| {
            let raw = conn.query_row(sql, params![key], RawSheet::from_row).optional()?;
            raw.map(RawSheet::into_sheet).transpose()
        })
    }
}

struct RawSheet {
    name: String,
    owner: Option<String>,
    class_level: String,
    race: String,
    background: String,
    data: String,
}

impl RawSheet {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            owner: row.get(1)?,
            class_level: row.get(2)?,
            race: row.get(3)?,
            background: row.get(4)?,
            data: row.get(5)?,
        })
    }

    fn into_sheet(self) -> StoreResult<CharacterSheet> {
        let fields: BTreeMap<String, String> = serde_json::from_str(&self.data)?;
        Ok(CharacterSheet {
            name: self.name,
            class_level: self.class_level,
            race: self.race,
            background: self.background,
            owner: self.owner,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, class_level: &str) -> CharacterSheet {
        let fields: BTreeMap<String, String> = [
            ("CharacterName", name),
            ("ClassLevel", class_level),
            ("Race ", "Half-Elf"),
            ("Background", "Sage"),
            ("STR", "12"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        CharacterSheet::from_fields(fields).unwrap()
    }

    #[test]
    fn upsert_inserts_then_updates() {
        let db = Database::open_in_memory().unwrap();
        let store = db.characters();
        assert_eq!(store.upsert(&sheet("Vex", "Ranger 3")).unwrap(), Upsert::Inserted);
        assert_eq!(store.upsert(&sheet("Vex", "Ranger 4")).unwrap(), Upsert::Updated);

        let stored = store.get("Vex").unwrap().unwrap();
        assert_eq!(stored.class_level, "Ranger 4");
        assert_eq!(stored.race, "Half-Elf");
        assert_eq!(stored.field("STR"), "12");
        assert_eq!(store.list().unwrap(), ["Vex"]);
    }

    #[test]
    fn get_missing_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.characters().get("Nobody").unwrap().is_none());
    }

    #[test]
    fn owner_survives_reimport() {
        let db = Database::open_in_memory().unwrap();
        let store = db.characters();
        store.upsert(&sheet("Vex", "Ranger 3")).unwrap();
        store.set_owner("Vex", "42").unwrap();
        store.upsert(&sheet("Vex", "Ranger 5")).unwrap();

        let mine = store.get_by_owner("42").unwrap().unwrap();
        assert_eq!(mine.name, "Vex");
        assert_eq!(mine.owner.as_deref(), Some("42"));
        assert_eq!(mine.class_level, "Ranger 5");
    }

    #[test]
    fn set_owner_on_missing_character() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.characters().set_owner("Ghost", "1"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn delete_reports_whether_removed() {
        let db = Database::open_in_memory().unwrap();
        let store = db.characters();
        store.upsert(&sheet("Grog", "Barbarian 6")).unwrap();
        assert!(store.delete("Grog").unwrap());
        assert!(!store.delete("Grog").unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_alphabetical() {
        let db = Database::open_in_memory().unwrap();
        let store = db.characters();
        for name in ["scanlan", "Keyleth", "Percy"] {
            store.upsert(&sheet(name, "Bard 1")).unwrap();
        }
        assert_eq!(store.list().unwrap(), ["Keyleth", "Percy", "scanlan"]);
    }
}
