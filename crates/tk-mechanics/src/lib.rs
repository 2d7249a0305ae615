//! Tabletop mechanics for Tablekeeper.
//!
//! Provides dice expression parsing and rolling, the loot and item
//! generator, the monster stat-block model, and character sheets read
//! from fillable PDF forms.

pub mod dice;
pub mod error;
pub mod loot;
pub mod monster;
pub mod sheet;

pub use dice::{DiceExpr, DiceRoll, Die};
pub use error::{MechError, MechResult};
pub use loot::{ChestSize, Item, ItemFilter, Rarity};
pub use monster::{AbilityScores, Monster};
pub use sheet::CharacterSheet;
