//! Dice expression parsing.

use std::sync::OnceLock;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::Die;
use super::roll::DiceRoll;
use crate::error::{MechError, MechResult};

/// Largest number of dice a single expression may roll.
pub const MAX_DICE: u32 = 100;

/// Largest number of sides a die may have.
pub const MAX_SIDES: u32 = 1000;

static DICE_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();

/// A parsed expression such as `3d6+2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpr {
    /// How many dice to roll.
    pub count: u32,
    /// The die being rolled.
    pub die: Die,
    /// Flat modifier added to the sum.
    pub modifier: i64,
}

impl DiceExpr {
    /// Parse `[N]dS[+/-M]`. Whitespace and case are ignored and `N`
    /// defaults to 1.
    pub fn parse(input: &str) -> MechResult<Self> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        let re = DICE_REGEX.get_or_init(|| {
            regex_lite::Regex::new(r"^(\d+)?d(\d+)([+-]\d{1,9})?$")
                .expect("DICE_REGEX pattern is invalid")
        });

        let caps = re
            .captures(&normalized)
            .ok_or_else(|| MechError::InvalidDice(input.trim().to_string()))?;

        let count = match caps.get(1) {
            Some(m) => parse_limited(m.as_str())?,
            None => 1,
        };
        let sides = parse_limited(&caps[2])?;
        let modifier = match caps.get(3) {
            Some(m) => parse_number::<i64>(m.as_str(), input)?,
            None => 0,
        };

        if count == 0 || sides == 0 {
            return Err(MechError::EmptyDice);
        }
        if count > MAX_DICE || sides > MAX_SIDES {
            return Err(MechError::TooManyDice {
                max_count: MAX_DICE,
                max_sides: MAX_SIDES,
            });
        }

        Ok(Self {
            count,
            die: Die::from_sides(sides),
            modifier,
        })
    }

    /// Whether this expression rolls twenty-sided dice (checks, attacks, saves).
    pub fn is_d20(&self) -> bool {
        self.die == Die::D20
    }

    /// Smallest possible total.
    pub fn min_total(&self) -> i64 {
        i64::from(self.count) + self.modifier
    }

    /// Largest possible total.
    pub fn max_total(&self) -> i64 {
        i64::from(self.count) * i64::from(self.die.sides()) + self.modifier
    }

    /// Roll every die using the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> DiceRoll {
        let sides = self.die.sides();
        let rolls = (0..self.count)
            .map(|_| rng.random_range(1..=sides))
            .collect();
        DiceRoll::new(*self, rolls)
    }
}

impl std::str::FromStr for DiceExpr {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.die)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Parse a count or side number. The regex only admits digits, so the
/// only failure is a value past `u32`, which is over the limit anyway.
fn parse_limited(digits: &str) -> MechResult<u32> {
    digits.parse().map_err(|_| MechError::TooManyDice {
        max_count: MAX_DICE,
        max_sides: MAX_SIDES,
    })
}

fn parse_number<T: std::str::FromStr>(digits: &str, input: &str) -> MechResult<T> {
    digits
        .parse()
        .map_err(|_| MechError::InvalidDice(input.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn parse_full_expression() {
        let e = DiceExpr::parse("3d6+4").unwrap();
        assert_eq!(e.count, 3);
        assert_eq!(e.die, Die::D6);
        assert_eq!(e.modifier, 4);
    }

    #[test]
    fn parse_defaults_count_to_one() {
        let e = DiceExpr::parse("d20").unwrap();
        assert_eq!(e.count, 1);
        assert!(e.is_d20());
    }

    #[test]
    fn parse_ignores_case_and_spaces() {
        let e = DiceExpr::parse(" 2D8 - 1 ").unwrap();
        assert_eq!(e.count, 2);
        assert_eq!(e.die, Die::D8);
        assert_eq!(e.modifier, -1);
    }

    #[test]
    fn parse_multi_digit_modifier() {
        let e = DiceExpr::parse("1d20+12").unwrap();
        assert_eq!(e.modifier, 12);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            DiceExpr::parse("fireball"),
            Err(MechError::InvalidDice(_))
        ));
        assert!(matches!(
            DiceExpr::parse("3d"),
            Err(MechError::InvalidDice(_))
        ));
        assert!(matches!(
            DiceExpr::parse("2d6+"),
            Err(MechError::InvalidDice(_))
        ));
    }

    #[test]
    fn parse_rejects_empty_dice() {
        assert!(matches!(DiceExpr::parse("0d6"), Err(MechError::EmptyDice)));
        assert!(matches!(DiceExpr::parse("2d0"), Err(MechError::EmptyDice)));
    }

    #[test]
    fn parse_rejects_limits() {
        assert!(matches!(
            DiceExpr::parse("101d6"),
            Err(MechError::TooManyDice { .. })
        ));
        assert!(matches!(
            DiceExpr::parse("1d1001"),
            Err(MechError::TooManyDice { .. })
        ));
        assert!(DiceExpr::parse("100d1000").is_ok());
    }

    #[test]
    fn parse_rejects_long_numbers_as_over_limit() {
        for input in ["10000d6", "1d100000", "99999999999d6", "d99999999999"] {
            assert!(
                matches!(DiceExpr::parse(input), Err(MechError::TooManyDice { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn d200_is_not_d20() {
        assert!(!DiceExpr::parse("1d200").unwrap().is_d20());
    }

    #[test]
    fn display() {
        assert_eq!(DiceExpr::parse("d20").unwrap().to_string(), "1d20");
        assert_eq!(DiceExpr::parse("2d6+3").unwrap().to_string(), "2d6+3");
        assert_eq!(DiceExpr::parse("4d4-2").unwrap().to_string(), "4d4-2");
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let e = DiceExpr::parse("4d12").unwrap();
        let r1 = e.roll(&mut StdRng::seed_from_u64(7));
        let r2 = e.roll(&mut StdRng::seed_from_u64(7));
        assert_eq!(r1.rolls, r2.rolls);
    }

    proptest! {
        #[test]
        fn roll_total_within_bounds(
            count in 1u32..=20,
            sides in 1u32..=100,
            modifier in -50i64..=50,
            seed in any::<u64>(),
        ) {
            let text = format!("{count}d{sides}{modifier:+}");
            let e = DiceExpr::parse(&text).unwrap();
            let r = e.roll(&mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(r.rolls.len(), count as usize);
            prop_assert!(r.rolls.iter().all(|v| (1..=sides).contains(v)));
            prop_assert!(r.total >= e.min_total() && r.total <= e.max_total());
        }
    }
}
