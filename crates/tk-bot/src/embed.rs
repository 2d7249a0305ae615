//! Rich replies.
//!
//! An [`Embed`] mirrors the card layout chat platforms offer: a title,
//! description, coloured edge, named fields and a footer. It serializes to
//! JSON for a gateway and renders to plain text for the console.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tk_session::Recap;

/// Edge colour of an embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub enum Colour {
    /// Session started.
    Green,
    /// Recaps and character cards.
    Blue,
    /// Session status and history.
    Gold,
    /// Anything else, as a raw RGB value.
    Rgb(u32),
}

impl Colour {
    /// The `0xRRGGBB` value.
    pub fn value(self) -> u32 {
        match self {
            Self::Green => 0x2ecc71,
            Self::Blue => 0x3498db,
            Self::Gold => 0xf1c40f,
            Self::Rgb(v) => v & 0xff_ffff,
        }
    }
}

impl From<Colour> for u32 {
    fn from(c: Colour) -> Self {
        c.value()
    }
}

/// A named value on an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field label.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    pub inline: bool,
}

/// A card-style reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    /// Heading.
    pub title: String,
    /// Text under the heading.
    pub description: Option<String>,
    /// Edge colour.
    pub colour: Colour,
    /// Fields in display order.
    pub fields: Vec<EmbedField>,
    /// Small print at the bottom.
    pub footer: Option<String>,
    /// Time the card refers to.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Embed {
    /// Start an embed with a title.
    pub fn new(title: impl Into<String>, colour: Colour) -> Self {
        Self {
            title: title.into(),
            description: None,
            colour,
            fields: Vec::new(),
            footer: None,
            timestamp: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Add a field that takes a full row.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    /// Add a field that may share a row.
    pub fn inline_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }

    /// Set the footer.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    /// Set the timestamp.
    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    /// The value of the first field with this name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

impl fmt::Display for Embed {
    /// Plain-text layout: title, description, fields, footer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(description) = &self.description {
            writeln!(f, "{description}")?;
        }
        for field in &self.fields {
            if field.value.contains('\n') {
                writeln!(f, "{}:", field.name)?;
                for line in field.value.lines() {
                    writeln!(f, "  {line}")?;
                }
            } else {
                writeln!(f, "{}: {}", field.name, field.value)?;
            }
        }
        if let Some(footer) = &self.footer {
            write!(f, "-- {footer}")?;
        }
        Ok(())
    }
}

impl From<&Recap> for Embed {
    fn from(recap: &Recap) -> Self {
        let mut embed = Embed::new(recap.title(), Colour::Blue)
            .description(recap.description())
            .field("Players", recap.players_text())
            .inline_field("Duration", recap.duration_text());
        if recap.xp_given > 0 {
            embed = embed.inline_field("XP Awarded", recap.xp_given.to_string());
        }
        if let Some(consumables) = recap.consumables_text() {
            embed = embed.field("Consumables Used", consumables);
        }
        if let Some(events) = recap.events_text() {
            embed = embed.field("Session Events", events);
        }
        embed.footer(recap.footer()).timestamp(recap.ended_at)
    }
}
