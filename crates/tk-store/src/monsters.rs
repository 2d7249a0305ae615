//! The monster manual.

use rand::Rng;
use rand::rngs::StdRng;
use rusqlite::{OptionalExtension, Row, params};
use tk_mechanics::{AbilityScores, Monster};

use crate::Database;
use crate::error::StoreResult;

const COLUMNS: &str = "\"index\", name, type, size, ac, hp, speed, align, legendary, source, \
                       str, dex, con, int, wis, cha";

/// Monster stat blocks in the `monsters` table.
#[derive(Clone)]
pub struct MonsterStore {
    db: Database,
}

impl MonsterStore {
    /// Wrap a database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Number of monsters in the manual.
    pub fn count(&self) -> StoreResult<usize> {
        self.db.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM monsters", [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or(0))
        })
    }

    /// Find a monster by name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> StoreResult<Option<Monster>> {
        self.db.with_conn(|conn| {
            let monster = conn
                .query_row(
                    &format!(
                        "SELECT {COLUMNS} FROM monsters WHERE name = ?1 COLLATE NOCASE
                         ORDER BY \"index\" LIMIT 1"
                    ),
                    params![name.trim()],
                    monster_from_row,
                )
                .optional()?;
            Ok(monster)
        })
    }

    /// Pick a monster uniformly among the stored ones.
    pub fn random(&self, rng: &mut StdRng) -> StoreResult<Option<Monster>> {
        let total = self.count()?;
        if total == 0 {
            return Ok(None);
        }
        let offset = i64::try_from(rng.random_range(0..total)).unwrap_or(0);
        self.db.with_conn(|conn| {
            let monster = conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM monsters ORDER BY \"index\" LIMIT 1 OFFSET ?1"),
                    params![offset],
                    monster_from_row,
                )
                .optional()?;
            Ok(monster)
        })
    }

    /// Monsters of a creature type, optionally only legendary ones.
    pub fn search(&self, kind: &str, legendary_only: bool, limit: usize) -> StoreResult<Vec<Monster>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM monsters
                 WHERE type = ?1 COLLATE NOCASE AND (?2 = 0 OR legendary = 1)
                 ORDER BY name COLLATE NOCASE LIMIT ?3"
            ))?;
            let monsters = stmt
                .query_map(params![kind.trim(), legendary_only, limit], monster_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(monsters)
        })
    }

    /// Insert or replace monsters by index. Returns how many were written.
    pub fn insert_many(&self, monsters: &[Monster]) -> StoreResult<usize> {
        let written = self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(&format!(
                    "INSERT OR REPLACE INTO monsters ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ))?;
                for m in monsters {
                    let a = &m.abilities;
                    stmt.execute(params![
                        m.index,
                        m.name,
                        m.kind,
                        m.size,
                        m.ac,
                        m.hp,
                        m.speed,
                        m.alignment,
                        m.legendary,
                        m.source,
                        a.strength,
                        a.dexterity,
                        a.constitution,
                        a.intelligence,
                        a.wisdom,
                        a.charisma,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(monsters.len())
        })?;
        tracing::info!(count = written, "imported monsters");
        Ok(written)
    }

    /// Import a JSON array of monsters.
    pub fn import_json(&self, json: &str) -> StoreResult<usize> {
        let monsters = Monster::from_json_array(json)?;
        self.insert_many(&monsters)
    }
}

fn monster_from_row(row: &Row<'_>) -> rusqlite::Result<Monster> {
    Ok(Monster {
        index: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        size: row.get(3)?,
        ac: row.get(4)?,
        hp: row.get(5)?,
        speed: row.get(6)?,
        alignment: row.get(7)?,
        legendary: row.get(8)?,
        source: row.get(9)?,
        abilities: AbilityScores {
            strength: row.get(10)?,
            dexterity: row.get(11)?,
            constitution: row.get(12)?,
            intelligence: row.get(13)?,
            wisdom: row.get(14)?,
            charisma: row.get(15)?,
        },
    })
}
