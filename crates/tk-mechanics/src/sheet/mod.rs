//! Character sheets imported from fillable PDF forms.
//!
//! The official fifth-edition sheet names its form fields `CharacterName`,
//! `ClassLevel`, `Race ` (with a trailing space), `STR`, `HPMax` and so
//! on. A [`CharacterSheet`] keeps every field so nothing on the sheet is
//! lost, and lifts the handful the bot needs for lookups into columns.

pub mod pdf;

pub use pdf::{read_form_fields, read_form_fields_from_bytes};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Form field holding the character's name.
pub const NAME_FIELD: &str = "CharacterName";
/// Form field holding class and level, e.g. "Wizard 5".
pub const CLASS_LEVEL_FIELD: &str = "ClassLevel";
/// Form field holding the race. The official sheet has a trailing space.
pub const RACE_FIELD: &str = "Race ";
/// Form field holding the background.
pub const BACKGROUND_FIELD: &str = "Background";

/// Label and form field of every value shown in a sheet summary.
pub const SUMMARY_FIELDS: &[(&str, &str)] = &[
    ("Race", RACE_FIELD),
    ("Background", BACKGROUND_FIELD),
    ("STR", "STR"),
    ("DEX", "DEX"),
    ("CON", "CON"),
    ("INT", "INT"),
    ("WIS", "WIS"),
    ("CHA", "CHA"),
    ("HP Max", "HPMax"),
    ("HP Current", "HPCurrent"),
    ("AC", "AC"),
    ("Speed", "Speed"),
    ("Passive Perception", "Passive"),
];

/// Placeholder shown for a blank field.
pub const BLANK: &str = "—";

/// A player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Character name, unique per store.
    pub name: String,
    /// Class and level as written on the sheet.
    pub class_level: String,
    /// Race as written on the sheet.
    pub race: String,
    /// Background as written on the sheet.
    pub background: String,
    /// Chat user id of the player who owns this character.
    pub owner: Option<String>,
    /// Every form field on the sheet.
    pub fields: BTreeMap<String, String>,
}

impl CharacterSheet {
    /// Build a sheet from raw form fields. The name field must be non-blank.
    pub fn from_fields(fields: BTreeMap<String, String>) -> MechResult<Self> {
        let name = fields
            .get(NAME_FIELD)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(MechError::MissingCharacterName)?;

        let column = |key: &str| fields.get(key).cloned().unwrap_or_default();

        Ok(Self {
            name,
            class_level: column(CLASS_LEVEL_FIELD),
            race: column(RACE_FIELD),
            background: column(BACKGROUND_FIELD),
            owner: None,
            fields,
        })
    }

    /// Read and parse a PDF sheet from disk.
    pub fn from_pdf(path: &std::path::Path) -> MechResult<Self> {
        Self::from_fields(read_form_fields(path)?)
    }

    /// Parse a PDF sheet already in memory, such as an uploaded attachment.
    pub fn from_pdf_bytes(bytes: &[u8]) -> MechResult<Self> {
        Self::from_fields(read_form_fields_from_bytes(bytes)?)
    }

    /// A single field, or [`BLANK`] when absent or empty.
    pub fn field(&self, key: &str) -> &str {
        match self.fields.get(key).map(|v| v.trim()) {
            Some(v) if !v.is_empty() => v,
            _ => BLANK,
        }
    }

    /// Label/value pairs for the summary card.
    pub fn summary(&self) -> Vec<(&'static str, &str)> {
        SUMMARY_FIELDS
            .iter()
            .map(|(label, key)| (*label, self.field(key)))
            .collect()
    }

    /// Class and level, or a placeholder.
    pub fn class_level_or_default(&self) -> &str {
        if self.class_level.trim().is_empty() {
            "No class level."
        } else {
            &self.class_level
        }
    }
}
