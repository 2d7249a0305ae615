//! Dice roll results.

use serde::{Deserialize, Serialize};

use super::expr::DiceExpr;

/// The outcome of rolling a [`DiceExpr`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// The expression that was rolled.
    pub expr: DiceExpr,
    /// Individual die values in roll order.
    pub rolls: Vec<u32>,
    /// Sum of the dice plus the modifier.
    pub total: i64,
}

impl DiceRoll {
    /// Build a result from individual die values.
    pub fn new(expr: DiceExpr, rolls: Vec<u32>) -> Self {
        let sum: i64 = rolls.iter().map(|&v| i64::from(v)).sum();
        Self {
            expr,
            total: sum + expr.modifier,
            rolls,
        }
    }

    /// Sum of the dice before the modifier.
    pub fn dice_sum(&self) -> i64 {
        self.total - self.expr.modifier
    }

    /// The highest single die value, or 0 if empty.
    pub fn highest(&self) -> u32 {
        self.rolls.iter().copied().max().unwrap_or(0)
    }

    /// The lowest single die value, or 0 if empty.
    pub fn lowest(&self) -> u32 {
        self.rolls.iter().copied().min().unwrap_or(0)
    }

    /// A natural 20 on a single d20.
    pub fn is_natural_twenty(&self) -> bool {
        self.expr.is_d20() && self.rolls.len() == 1 && self.rolls[0] == 20
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        write!(f, "Rolls {}{}", self.expr.count, self.expr.die)?;
        match self.expr.modifier {
            0 => {}
            m if m > 0 => write!(f, " + {m}")?,
            m => write!(f, " - {}", m.unsigned_abs())?,
        }
        write!(f, ": [{}] Total: {}", values.join(", "), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(text: &str) -> DiceExpr {
        DiceExpr::parse(text).unwrap()
    }

    #[test]
    fn total_includes_modifier() {
        let r = DiceRoll::new(expr("3d6+2"), vec![4, 1, 6]);
        assert_eq!(r.total, 13);
        assert_eq!(r.dice_sum(), 11);
    }

    #[test]
    fn negative_modifier_can_go_below_zero() {
        let r = DiceRoll::new(expr("1d4-5"), vec![1]);
        assert_eq!(r.total, -4);
    }

    #[test]
    fn highest_and_lowest() {
        let r = DiceRoll::new(expr("3d6"), vec![3, 6, 1]);
        assert_eq!(r.highest(), 6);
        assert_eq!(r.lowest(), 1);
    }

    #[test]
    fn natural_twenty() {
        assert!(DiceRoll::new(expr("d20"), vec![20]).is_natural_twenty());
        assert!(!DiceRoll::new(expr("2d20"), vec![20, 3]).is_natural_twenty());
        assert!(!DiceRoll::new(expr("d20"), vec![19]).is_natural_twenty());
    }

    #[test]
    fn display() {
        assert_eq!(
            DiceRoll::new(expr("3d6+2"), vec![4, 1, 6]).to_string(),
            "Rolls 3d6 + 2: [4, 1, 6] Total: 13"
        );
        assert_eq!(
            DiceRoll::new(expr("d20"), vec![17]).to_string(),
            "Rolls 1d20: [17] Total: 17"
        );
        assert_eq!(
            DiceRoll::new(expr("2d8-1"), vec![5, 2]).to_string(),
            "Rolls 2d8 - 1: [5, 2] Total: 6"
        );
    }
}
