//! The in-memory state of one running session.

use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the guild (chat server or table) a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuildId(String);

impl GuildId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GuildId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for GuildId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for GuildId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedAction {
    /// When the action was logged.
    pub at: DateTime<Utc>,
    /// What happened.
    pub text: String,
}

impl LoggedAction {
    /// Render as `[07:45 PM] text` in local time.
    pub fn render(&self, time_format: &str) -> String {
        format!("[{}] {}", format_clock(self.at, time_format), self.text)
    }
}

/// A consumable spent by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableUse {
    /// Who used it.
    pub player: String,
    /// What was used.
    pub item: String,
}

impl std::fmt::Display for ConsumableUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.player, self.item)
    }
}

/// A session in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Guild that owns the session.
    pub guild_id: GuildId,
    /// Campaign session number.
    pub number: u32,
    /// Where the party is.
    pub location: String,
    /// Party level.
    pub level: u32,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended, once it has.
    pub ended_at: Option<DateTime<Utc>>,
    players: Vec<String>,
    actions: Vec<LoggedAction>,
    consumables: Vec<ConsumableUse>,
    xp_given: u32,
}

impl Session {
    /// Open a session at the given time.
    pub fn new(
        guild_id: GuildId,
        number: u32,
        location: impl Into<String>,
        level: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            guild_id,
            number,
            location: location.into(),
            level,
            started_at,
            ended_at: None,
            players: Vec::new(),
            actions: Vec::new(),
            consumables: Vec::new(),
            xp_given: 0,
        }
    }

    /// Players in join order.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// The action log in order.
    pub fn actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    /// Consumables used, in order.
    pub fn consumables(&self) -> &[ConsumableUse] {
        &self.consumables
    }

    /// Total XP awarded so far.
    pub fn xp_given(&self) -> u32 {
        self.xp_given
    }

    /// Add a player. Returns false if they already joined.
    pub fn add_player(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.players.contains(&name) {
            return false;
        }
        self.players.push(name);
        true
    }

    /// Append a line to the action log.
    pub fn log(&mut self, text: impl Into<String>, at: DateTime<Utc>) {
        self.actions.push(LoggedAction {
            at,
            text: text.into(),
        });
    }

    /// Record a consumable and log it.
    pub fn use_consumable(&mut self, player: &str, item: &str, at: DateTime<Utc>) {
        self.consumables.push(ConsumableUse {
            player: player.to_string(),
            item: item.to_string(),
        });
        self.log(format!("{player} used **{item}**"), at);
    }

    /// Add XP to the session total and log it. Zero awards are ignored.
    pub fn award_xp(&mut self, amount: u32, at: DateTime<Utc>) -> bool {
        if amount == 0 {
            return false;
        }
        self.xp_given = self.xp_given.saturating_add(amount);
        self.log(format!("Awarded {amount} XP"), at);
        true
    }

    /// Time elapsed between the start and `until`, never negative.
    pub fn duration(&self, until: DateTime<Utc>) -> TimeDelta {
        (until - self.started_at).max(TimeDelta::zero())
    }

    /// Rendered log lines.
    pub fn rendered_actions(&self, time_format: &str) -> Vec<String> {
        self.actions.iter().map(|a| a.render(time_format)).collect()
    }
}

/// Format a timestamp as a local clock time.
pub fn format_clock(at: DateTime<Utc>, time_format: &str) -> String {
    at.with_timezone(&Local).format(time_format).to_string()
}
