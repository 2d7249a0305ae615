//! Monster stat blocks.
//!
//! Monsters live in the store; this module only describes their shape and
//! how a stat block is rendered for chat.

use serde::{Deserialize, Serialize};

use crate::error::MechResult;

/// The six ability scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    /// Strength.
    #[serde(rename = "str")]
    pub strength: i32,
    /// Dexterity.
    #[serde(rename = "dex")]
    pub dexterity: i32,
    /// Constitution.
    #[serde(rename = "con")]
    pub constitution: i32,
    /// Intelligence.
    #[serde(rename = "int")]
    pub intelligence: i32,
    /// Wisdom.
    #[serde(rename = "wis")]
    pub wisdom: i32,
    /// Charisma.
    #[serde(rename = "cha")]
    pub charisma: i32,
}

/// A monster manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    /// Catalogue index.
    pub index: i64,
    /// Monster name, e.g. "Goblin".
    pub name: String,
    /// Creature type, e.g. "humanoid".
    #[serde(rename = "type")]
    pub kind: String,
    /// Size category.
    pub size: String,
    /// Armor class.
    pub ac: i32,
    /// Average hit points.
    pub hp: i32,
    /// Movement speeds as written in the manual.
    pub speed: String,
    /// Alignment.
    pub alignment: String,
    /// Whether the monster has legendary actions.
    #[serde(default)]
    pub legendary: bool,
    /// Source book.
    #[serde(default)]
    pub source: String,
    /// Ability scores.
    #[serde(flatten)]
    pub abilities: AbilityScores,
}

impl Monster {
    /// Decode a JSON array of monsters.
    pub fn from_json_array(json: &str) -> MechResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl std::fmt::Display for Monster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let a = &self.abilities;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Type: {}", self.kind)?;
        writeln!(f, "Size: {}", self.size)?;
        writeln!(f, "AC: {}", self.ac)?;
        writeln!(f, "HP: {}", self.hp)?;
        writeln!(f, "Speed: {}", self.speed)?;
        writeln!(f, "Alignment: {}", self.alignment)?;
        writeln!(f, "Legendary: {}", if self.legendary { "Yes" } else { "No" })?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f, "STR: {}", a.strength)?;
        writeln!(f, "DEX: {}", a.dexterity)?;
        writeln!(f, "CON: {}", a.constitution)?;
        writeln!(f, "INT: {}", a.intelligence)?;
        writeln!(f, "WIS: {}", a.wisdom)?;
        write!(f, "CHA: {}", a.charisma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOBLIN: &str = r#"[{
        "index": 300,
        "name": "Goblin",
        "type": "humanoid",
        "size": "Small",
        "ac": 15,
        "hp": 7,
        "speed": "30 ft.",
        "alignment": "neutral evil",
        "legendary": false,
        "source": "MM",
        "str": 8, "dex": 14, "con": 10, "int": 10, "wis": 8, "cha": 8
    }]"#;

    #[test]
    fn decode_json() {
        let monsters = Monster::from_json_array(GOBLIN).unwrap();
        assert_eq!(monsters.len(), 1);
        let goblin = &monsters[0];
        assert_eq!(goblin.kind, "humanoid");
        assert_eq!(goblin.abilities.dexterity, 14);
    }

    #[test]
    fn decode_rejects_bad_json() {
        assert!(Monster::from_json_array("{not json").is_err());
    }

    #[test]
    fn stat_block() {
        let goblin = &Monster::from_json_array(GOBLIN).unwrap()[0];
        let block = goblin.to_string();
        assert!(block.starts_with("Name: Goblin\nType: humanoid\n"));
        assert!(block.contains("AC: 15\nHP: 7\n"));
        assert!(block.contains("Legendary: No"));
        assert!(block.ends_with("CHA: 8"));
    }
}
