//! Attack rolls against armour class.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::character::AttackDetail;
use crate::dice::d20;

/// Natural roll that always hits and doubles damage dice.
pub const NATURAL_CRITICAL: u32 = 20;

/// Natural roll that always misses.
pub const NATURAL_FUMBLE: u32 = 1;

/// How an attack roll landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum AttackRoll {
    Fumble,
    Miss,
    Hit,
    Critical,
}

impl AttackRoll {
    pub fn is_hit(self) -> bool {
        matches!(self, Self::Hit | Self::Critical)
    }
}

/// Classifies a natural d20 roll.
///
/// # Formula
///
/// ```text
/// natural 20          -> Critical
/// natural 1           -> Fumble
/// natural + bonus >= ac -> Hit
/// otherwise           -> Miss
/// ```
pub fn check_hit(natural: u32, to_hit_bonus: i64, armour_class: i64) -> AttackRoll {
    match natural {
        NATURAL_CRITICAL => AttackRoll::Critical,
        NATURAL_FUMBLE => AttackRoll::Fumble,
        n if n as i64 + to_hit_bonus >= armour_class => AttackRoll::Hit,
        _ => AttackRoll::Miss,
    }
}

/// Rolls a d20 for `attack` against `armour_class`.
///
/// Returns the natural roll together with its classification.
pub fn roll_to_hit<R: Rng + ?Sized>(
    attack: &AttackDetail,
    armour_class: i64,
    rng: &mut R,
) -> (u32, AttackRoll) {
    let natural = d20(rng);
    (natural, check_hit(natural, attack.to_hit_bonus(), armour_class))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naturals_override_the_total() {
        assert_eq!(check_hit(20, -10, 30), AttackRoll::Critical);
        assert_eq!(check_hit(1, 30, 5), AttackRoll::Fumble);
    }

    #[test]
    fn meeting_armour_class_hits() {
        assert_eq!(check_hit(10, 3, 13), AttackRoll::Hit);
        assert_eq!(check_hit(9, 3, 13), AttackRoll::Miss);
        assert!(AttackRoll::Critical.is_hit());
        assert!(!AttackRoll::Fumble.is_hit());
    }
}
