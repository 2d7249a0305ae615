//! Error types for the mechanics crate.

/// Errors that can occur while parsing dice, generating content or reading sheets.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice expression did not match `[N]dS[+/-M]`.
    #[error("use a format like '3d6+4' or 'd20' (got '{0}')")]
    InvalidDice(String),

    /// A dice expression asked for zero dice or zero-sided dice.
    #[error("dice need at least one die with at least one side")]
    EmptyDice,

    /// A dice expression exceeded the configured count or side limits.
    #[error("too many dice or sides (at most {max_count} dice of up to {max_sides} sides)")]
    TooManyDice {
        /// Largest accepted dice count.
        max_count: u32,
        /// Largest accepted number of sides.
        max_sides: u32,
    },

    /// A rarity name was not recognised.
    #[error("unknown rarity: {0}")]
    UnknownRarity(String),

    /// A character sheet was missing its `CharacterName` field.
    #[error("character sheet has no CharacterName field set")]
    MissingCharacterName,

    /// The PDF could not be read or has no form.
    #[error("could not read character sheet: {0}")]
    Pdf(String),

    /// Monster data could not be decoded.
    #[error("invalid monster data: {0}")]
    InvalidMonster(#[from] serde_json::Error),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
