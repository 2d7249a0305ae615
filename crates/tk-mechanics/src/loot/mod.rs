//! Random items and loot piles.
//!
//! Items come from a fixed catalogue. A single item draw first picks a
//! rarity (weighted towards common unless the caller asks for one), then
//! narrows the pool by type and magic flag before choosing uniformly.

pub mod message;

pub use message::{render_item, render_loot};

use std::ops::RangeInclusive;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::error::{MechError, MechResult};

/// How rare an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rarity {
    /// Everyday gear.
    Common,
    /// Minor magic.
    Uncommon,
    /// Notable treasure.
    Rare,
    /// Hoard-tier treasure.
    VeryRare,
    /// One of a kind.
    Legendary,
}

impl Rarity {
    /// All rarities, most common first.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::VeryRare,
        Rarity::Legendary,
    ];

    /// Relative weight when a rarity is chosen at random.
    pub fn weight(self) -> u32 {
        match self {
            Self::Common => 60,
            Self::Uncommon => 25,
            Self::Rare => 10,
            Self::VeryRare => 4,
            Self::Legendary => 1,
        }
    }

    /// Parse a rarity name such as `rare` or `very-rare`.
    pub fn parse(s: &str) -> MechResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "common" => Ok(Self::Common),
            "uncommon" => Ok(Self::Uncommon),
            "rare" => Ok(Self::Rare),
            "very-rare" | "veryrare" => Ok(Self::VeryRare),
            "legendary" => Ok(Self::Legendary),
            _ => Err(MechError::UnknownRarity(s.trim().to_string())),
        }
    }

    /// Pick a rarity using the weights above.
    pub fn choose(rng: &mut StdRng) -> Self {
        let total: u32 = Self::ALL.iter().map(|r| r.weight()).sum();
        let mut roll = rng.random_range(0..total);
        for rarity in Self::ALL {
            if roll < rarity.weight() {
                return rarity;
            }
            roll -= rarity.weight();
        }
        Self::Common
    }

    /// Title-cased label, e.g. `Very-Rare`.
    pub fn title(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::VeryRare => "Very-Rare",
            Self::Legendary => "Legendary",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::VeryRare => "very-rare",
            Self::Legendary => "legendary",
        };
        write!(f, "{name}")
    }
}

/// A catalogue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Display name.
    pub name: &'static str,
    /// How rare the item is.
    pub rarity: Rarity,
    /// Broad category: weapon, armor, potion, ring, wondrous.
    pub kind: &'static str,
    /// Whether the item is magical.
    pub magic: bool,
}

impl Item {
    const fn new(name: &'static str, rarity: Rarity, kind: &'static str, magic: bool) -> Self {
        Self {
            name,
            rarity,
            kind,
            magic,
        }
    }

    /// The kind with its first letter capitalised.
    pub fn kind_title(&self) -> String {
        let mut chars = self.kind.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Every item the generator can produce.
pub const CATALOGUE: &[Item] = &[
    Item::new("Healing Potion", Rarity::Common, "potion", true),
    Item::new("Dagger", Rarity::Common, "weapon", false),
    Item::new("Leather Armor", Rarity::Common, "armor", false),
    Item::new("+1 Longsword", Rarity::Uncommon, "weapon", true),
    Item::new("Cloak of Protection", Rarity::Uncommon, "wondrous", true),
    Item::new("Bag of Holding", Rarity::Rare, "wondrous", true),
    Item::new("Ring of Protection", Rarity::Rare, "ring", true),
    Item::new("Flame Tongue", Rarity::VeryRare, "weapon", true),
    Item::new("Vorpal Sword", Rarity::Legendary, "weapon", true),
];

/// Constraints for a single item draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Fixed rarity; `None` picks one by weight.
    pub rarity: Option<Rarity>,
    /// Required kind (lowercase); `None` allows any.
    pub kind: Option<String>,
    /// Only magical items.
    pub magic_only: bool,
}

impl ItemFilter {
    /// Build a filter from loose command arguments.
    ///
    /// `random`, `any` and `none` leave the rarity open; `any` and `none`
    /// leave the kind open. The magic flag accepts `magic`, `magic-only`,
    /// `yes`, `y`, `true` and `t`.
    pub fn from_args(rarity: &str, kind: &str, magic: &str) -> MechResult<Self> {
        let rarity = match rarity.trim().to_lowercase().as_str() {
            "random" | "any" | "none" | "" => None,
            other => Some(Rarity::parse(other)?),
        };
        let kind = match kind.trim().to_lowercase().as_str() {
            "any" | "none" | "" => None,
            other => Some(other.to_string()),
        };
        Ok(Self {
            rarity,
            kind,
            magic_only: parse_magic_flag(magic),
        })
    }

    /// Only magical items of any rarity.
    pub fn magic() -> Self {
        Self {
            magic_only: true,
            ..Self::default()
        }
    }
}

/// Whether a loose yes/no argument asks for magic items.
pub fn parse_magic_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "magic" | "magic-only" | "yes" | "y" | "true" | "t"
    )
}

/// Draw one item matching the filter, or `None` if nothing fits.
pub fn random_item(filter: &ItemFilter, rng: &mut StdRng) -> Option<&'static Item> {
    let rarity = filter.rarity.unwrap_or_else(|| Rarity::choose(rng));

    let pool: Vec<&'static Item> = CATALOGUE
        .iter()
        .filter(|i| i.rarity == rarity)
        .filter(|i| filter.kind.as_deref().is_none_or(|k| i.kind == k))
        .filter(|i| !filter.magic_only || i.magic)
        .collect();

    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}

/// Container size, which decides how many items a loot pile holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChestSize {
    /// A coin pouch: 1-2 items.
    Pouch,
    /// An ordinary chest: 2-4 items.
    Chest,
    /// A dragon's hoard or boss drop: 4-8 items.
    Hoard,
    /// Anything else: 1-3 items.
    Other,
}

impl ChestSize {
    /// Map a chest name onto a size. Unknown names become [`ChestSize::Other`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pouch" | "small" => Self::Pouch,
            "chest" | "medium" => Self::Chest,
            "hoard" | "large" | "boss" => Self::Hoard,
            _ => Self::Other,
        }
    }

    /// How many items a pile of this size holds.
    pub fn item_range(self) -> RangeInclusive<u32> {
        match self {
            Self::Pouch => 1..=2,
            Self::Chest => 2..=4,
            Self::Hoard => 4..=8,
            Self::Other => 1..=3,
        }
    }
}

/// Roll a pile of loot. Draws that find nothing are skipped.
pub fn random_loot(chest: ChestSize, magic_only: bool, rng: &mut StdRng) -> Vec<&'static Item> {
    let count = rng.random_range(chest.item_range());
    let filter = ItemFilter {
        magic_only,
        ..ItemFilter::default()
    };
    (0..count)
        .filter_map(|_| random_item(&filter, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn weights_sum_to_hundred() {
        let total: u32 = Rarity::ALL.iter().map(|r| r.weight()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn parse_rarity() {
        assert_eq!(Rarity::parse("Rare").unwrap(), Rarity::Rare);
        assert_eq!(Rarity::parse("very rare").unwrap(), Rarity::VeryRare);
        assert_eq!(Rarity::parse("very-rare").unwrap(), Rarity::VeryRare);
        assert!(matches!(
            Rarity::parse("mythic"),
            Err(MechError::UnknownRarity(_))
        ));
    }

    #[test]
    fn rarity_labels() {
        assert_eq!(Rarity::VeryRare.to_string(), "very-rare");
        assert_eq!(Rarity::VeryRare.title(), "Very-Rare");
    }

    #[test]
    fn weighted_choice_favours_common() {
        let mut rng = StdRng::seed_from_u64(1);
        let commons = (0..1000)
            .filter(|_| Rarity::choose(&mut rng) == Rarity::Common)
            .count();
        assert!(commons > 450, "expected mostly common, got {commons}");
    }

    #[test]
    fn filter_from_args_normalises() {
        let f = ItemFilter::from_args("random", "any", "no").unwrap();
        assert_eq!(f, ItemFilter::default());

        let f = ItemFilter::from_args("Rare", "Ring", "yes").unwrap();
        assert_eq!(f.rarity, Some(Rarity::Rare));
        assert_eq!(f.kind.as_deref(), Some("ring"));
        assert!(f.magic_only);
    }

    #[test]
    fn magic_flag_words() {
        for word in ["magic", "magic-only", "YES", "y", "true", "t"] {
            assert!(parse_magic_flag(word), "{word}");
        }
        for word in ["no", "false", "", "maybe"] {
            assert!(!parse_magic_flag(word), "{word}");
        }
    }

    #[test]
    fn random_item_respects_filter() {
        let mut rng = StdRng::seed_from_u64(3);
        let filter = ItemFilter {
            rarity: Some(Rarity::Common),
            kind: Some("weapon".to_string()),
            magic_only: false,
        };
        let item = random_item(&filter, &mut rng).unwrap();
        assert_eq!(item.name, "Dagger");
    }

    #[test]
    fn random_item_empty_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let filter = ItemFilter {
            rarity: Some(Rarity::Common),
            kind: Some("armor".to_string()),
            magic_only: true,
        };
        assert!(random_item(&filter, &mut rng).is_none());
    }

    #[test]
    fn magic_only_items_are_magic() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            if let Some(item) = random_item(&ItemFilter::magic(), &mut rng) {
                assert!(item.magic);
            }
        }
    }

    #[test]
    fn chest_sizes() {
        assert_eq!(ChestSize::parse("Small"), ChestSize::Pouch);
        assert_eq!(ChestSize::parse("boss"), ChestSize::Hoard);
        assert_eq!(ChestSize::parse("barrel"), ChestSize::Other);
        assert_eq!(ChestSize::Hoard.item_range(), 4..=8);
    }

    #[test]
    fn loot_count_within_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let pile = random_loot(ChestSize::Hoard, false, &mut rng);
            assert!(pile.len() <= 8);
            assert!(!pile.is_empty());
        }
    }

    #[test]
    fn kind_title() {
        assert_eq!(CATALOGUE[5].kind_title(), "Wondrous");
    }
}
