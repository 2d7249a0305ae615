//! Things that can happen during a session.

use serde::{Deserialize, Serialize};
use tk_mechanics::DiceRoll;

/// An event recorded into the active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A free-form log line.
    Action(String),
    /// A player joined the table.
    PlayerJoined(String),
    /// A player spent a consumable.
    Consumable {
        /// Who used it.
        player: String,
        /// What was used.
        item: String,
    },
    /// A player opened loot.
    Loot {
        /// Who found it.
        player: String,
        /// Item names found.
        items: Vec<String>,
    },
    /// A player ran into monsters.
    Encounter {
        /// Who looked them up.
        player: String,
        /// Monster names.
        monsters: Vec<String>,
    },
    /// A player rolled dice.
    Roll {
        /// Who rolled.
        player: String,
        /// The roll.
        roll: DiceRoll,
    },
    /// XP was handed out.
    Xp(u32),
}

impl SessionEvent {
    /// The log line for events that are written as plain text, or `None`
    /// for events that have nothing worth logging.
    pub fn log_text(&self) -> Option<String> {
        match self {
            Self::Action(text) => Some(text.clone()),
            Self::Loot { player, items } => {
                let names = join_names(items)?;
                Some(format!("{player} found loot: **{names}**"))
            }
            Self::Encounter { player, monsters } => {
                let names = join_names(monsters)?;
                Some(format!("{player} encountered: **{names}**"))
            }
            Self::Roll { player, roll } => Some(format!(
                "{player} rolled {}: **{}**",
                roll.expr, roll.total
            )),
            Self::PlayerJoined(_) | Self::Consumable { .. } | Self::Xp(_) => None,
        }
    }
}

fn join_names(names: &[String]) -> Option<String> {
    let names: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}
