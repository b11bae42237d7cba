//! Dice expressions in tabletop notation.
//!
//! A [`DiceExpr`] is the `NdS±M` form used throughout trait definitions
//! (`"3D6"`, `"1D6 + 27"`, `"D8-1"`). Expressions are kept symbolic so they can
//! be re-rolled every time damage, healing or treasure is resolved.

use core::fmt;
use core::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DiceError;

/// A single-term dice expression with a flat modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parses tabletop notation, ignoring case and whitespace.
    pub fn parse(input: &str) -> Result<Self, DiceError> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        let (count_part, rest) = compact
            .split_once('D')
            .ok_or_else(|| DiceError::Malformed(input.to_string()))?;

        let count = if count_part.is_empty() {
            1
        } else {
            count_part
                .parse::<u32>()
                .map_err(|_| DiceError::Malformed(input.to_string()))?
        };

        let split_at = rest.find(['+', '-']).unwrap_or(rest.len());
        let (sides_part, modifier_part) = rest.split_at(split_at);

        let sides = sides_part
            .parse::<u32>()
            .map_err(|_| DiceError::Malformed(input.to_string()))?;

        let modifier = match modifier_part {
            "" => 0,
            m => {
                let (sign, digits) = m.split_at(1);
                let value = digits
                    .parse::<i32>()
                    .map_err(|_| DiceError::Malformed(input.to_string()))?;
                if sign == "-" { -value } else { value }
            }
        };

        if count == 0 || sides == 0 {
            return Err(DiceError::Degenerate(input.to_string()));
        }

        Ok(Self::new(count, sides, modifier))
    }

    /// Returns true when `input` reads as dice notation.
    pub fn looks_like_dice(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Rolls every die and adds the modifier.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let dice: i64 = (0..self.count)
            .map(|_| roll_die(rng, self.sides) as i64)
            .sum();
        dice + self.modifier as i64
    }

    /// Smallest possible roll.
    pub fn min(&self) -> i64 {
        self.count as i64 + self.modifier as i64
    }

    /// Largest possible roll.
    pub fn max(&self) -> i64 {
        self.count as i64 * self.sides as i64 + self.modifier as i64
    }

    /// Same expression with extra dice of the same size.
    #[must_use]
    pub fn with_extra_dice(self, extra: u32) -> Self {
        Self {
            count: self.count + extra,
            ..self
        }
    }

    /// Same expression with an additional flat modifier.
    #[must_use]
    pub fn with_modifier(self, delta: i32) -> Self {
        Self {
            modifier: self.modifier + delta,
            ..self
        }
    }

    /// Critical hits roll the dice twice; the modifier is applied once.
    #[must_use]
    pub fn critical(self) -> Self {
        self.with_extra_dice(self.count)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, " + {}", m),
            m => write!(f, " - {}", -m),
        }
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DiceExpr> for String {
    fn from(value: DiceExpr) -> Self {
        value.to_string()
    }
}

/// Rolls one die with `sides` faces (1..=sides).
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R, sides: u32) -> u32 {
    if sides <= 1 {
        return 1;
    }
    rng.gen_range(1..=sides)
}

/// Rolls a twenty-sided die.
pub fn d20<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    roll_die(rng, 20)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_common_notations() {
        assert_eq!(DiceExpr::parse("3D6").unwrap(), DiceExpr::new(3, 6, 0));
        assert_eq!(DiceExpr::parse("1D6 + 27").unwrap(), DiceExpr::new(1, 6, 27));
        assert_eq!(DiceExpr::parse("d8-1").unwrap(), DiceExpr::new(1, 8, -1));
        assert_eq!(DiceExpr::parse(" 2 d 10 ").unwrap(), DiceExpr::new(2, 10, 0));
    }

    #[test]
    fn rejects_non_dice() {
        assert!(DiceExpr::parse("12").is_err());
        assert!(DiceExpr::parse("GOBLIN").is_err());
        assert!(DiceExpr::parse("0D6").is_err());
        assert!(DiceExpr::parse("1D").is_err());
        assert!(DiceExpr::parse("1D6+").is_err());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(DiceExpr::new(1, 6, 27).to_string(), "1D6 + 27");
        assert_eq!(DiceExpr::new(2, 8, -1).to_string(), "2D8 - 1");
        assert_eq!(DiceExpr::new(3, 6, 0).to_string(), "3D6");
    }

    #[test]
    fn rolls_stay_in_bounds_and_vary() {
        let mut rng = StdRng::seed_from_u64(7);
        for (count, sides) in [(1, 4), (3, 6), (2, 20), (5, 8)] {
            let dice = DiceExpr::new(count, sides, 0);
            let rolls: Vec<i64> = (0..500).map(|_| dice.roll(&mut rng)).collect();
            assert!(rolls.iter().all(|r| (count as i64..=(count * sides) as i64).contains(r)));
            let first = rolls[0];
            assert!(rolls.iter().any(|r| *r != first), "{count}D{sides} never varied");
        }
    }

    #[test]
    fn critical_doubles_dice_only() {
        let crit = DiceExpr::new(2, 6, 3).critical();
        assert_eq!(crit, DiceExpr::new(4, 6, 3));
    }
}
