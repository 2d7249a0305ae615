//! End-of-session recaps.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::config::TrackerConfig;
use crate::session::{Session, format_clock};

/// Summary of a finished session, ready to post.
#[derive(Debug, Clone, Serialize)]
pub struct Recap {
    /// Campaign session number.
    pub number: u32,
    /// Where the party was.
    pub location: String,
    /// Party level.
    pub level: u32,
    /// Players in join order.
    pub players: Vec<String>,
    /// When play started.
    pub started_at: DateTime<Utc>,
    /// When play ended.
    pub ended_at: DateTime<Utc>,
    /// `player: item` entries.
    pub consumables: Vec<String>,
    /// Rendered log lines.
    pub events: Vec<String>,
    /// Total XP awarded.
    pub xp_given: u32,
    /// Storage id of the archived record.
    pub archive_id: Option<i64>,
    field_limit: usize,
    time_format: String,
}

impl Recap {
    /// Summarise a session that ended at `ended_at`.
    pub fn from_session(session: &Session, ended_at: DateTime<Utc>, config: &TrackerConfig) -> Self {
        Self {
            number: session.number,
            location: session.location.clone(),
            level: session.level,
            players: session.players().to_vec(),
            started_at: session.started_at,
            ended_at,
            consumables: session
                .consumables()
                .iter()
                .map(|c| c.to_string())
                .collect(),
            events: session.rendered_actions(&config.time_format),
            xp_given: session.xp_given(),
            archive_id: None,
            field_limit: config.field_limit,
            time_format: config.time_format.clone(),
        }
    }

    /// `Session N Complete`.
    pub fn title(&self) -> String {
        format!("Session {} Complete", self.number)
    }

    /// Location and level lines.
    pub fn description(&self) -> String {
        format!("**Location:** {}\n**Level:** {}", self.location, self.level)
    }

    /// Comma-separated players, or `None recorded`.
    pub fn players_text(&self) -> String {
        if self.players.is_empty() {
            "None recorded".to_string()
        } else {
            self.players.join(", ")
        }
    }

    /// Elapsed play time.
    pub fn duration(&self) -> TimeDelta {
        (self.ended_at - self.started_at).max(TimeDelta::zero())
    }

    /// Play time as `Xh Ym`.
    pub fn duration_text(&self) -> String {
        let secs = self.duration().num_seconds();
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }

    /// Consumables line, if any were used.
    pub fn consumables_text(&self) -> Option<String> {
        if self.consumables.is_empty() {
            None
        } else {
            Some(truncate(&self.consumables.join(", "), self.field_limit))
        }
    }

    /// Bulleted event list cut to the field limit, if anything was logged.
    pub fn events_text(&self) -> Option<String> {
        if self.events.is_empty() {
            return None;
        }
        let text = self
            .events
            .iter()
            .map(|e| format!("• {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        Some(truncate(&text, self.field_limit))
    }

    /// `Started: 07:00 PM | Ended: 10:15 PM`.
    pub fn footer(&self) -> String {
        format!(
            "Started: {} | Ended: {}",
            format_clock(self.started_at, &self.time_format),
            format_clock(self.ended_at, &self.time_format)
        )
    }

    /// Export the recap as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = format!("# {}\n\n{}\n\n", self.title(), self.description());
        out.push_str(&format!("**Players**: {}\n", self.players_text()));
        out.push_str(&format!("**Duration**: {}\n", self.duration_text()));
        if self.xp_given > 0 {
            out.push_str(&format!("**XP Awarded**: {}\n", self.xp_given));
        }
        if let Some(consumables) = self.consumables_text() {
            out.push_str(&format!("**Consumables Used**: {consumables}\n"));
        }
        if let Some(events) = self.events_text() {
            out.push_str(&format!("\n## Session Events\n\n{events}\n"));
        }
        out.push_str(&format!("\n*{}*\n", self.footer()));
        out
    }

    /// Export the recap as plain text.
    pub fn export_text(&self) -> String {
        let strip = |s: String| s.replace("**", "");
        let mut out = format!("{}\n", self.title());
        out.push_str(&"=".repeat(self.title().chars().count()));
        out.push_str("\n\n");
        out.push_str(&strip(self.description()));
        out.push_str("\n\n");
        out.push_str(&format!("Players: {}\n", self.players_text()));
        out.push_str(&format!("Duration: {}\n", self.duration_text()));
        if self.xp_given > 0 {
            out.push_str(&format!("XP Awarded: {}\n", self.xp_given));
        }
        if let Some(consumables) = self.consumables_text() {
            out.push_str(&format!("Consumables Used: {consumables}\n"));
        }
        if let Some(events) = self.events_text() {
            out.push_str(&format!("\nSession Events:\n{}\n", strip(events)));
        }
        out.push_str(&format!("\n{}\n", self.footer()));
        out
    }
}

/// Cut `text` to at most `limit` characters, marking the cut with `...`.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(4)).collect();
    format!("{kept}...")
}
