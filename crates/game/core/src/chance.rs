//! Flat-roll combat helpers.
//!
//! A simplified resolution path kept alongside [`crate::combat`]: a hit or an
//! evasion is a d20 above ten and damage is a single d6, whatever the actors'
//! traits say. Only [`quick_exchange`] builds on it.

use rand::Rng;

use crate::character::CharacterTraits;
use crate::dice::{d20, roll_die};

/// A d20 must beat this to hit or evade.
pub const THRESHOLD: u32 = 10;

pub fn hits<R: Rng + ?Sized>(_actor: &CharacterTraits, _opponent: &CharacterTraits, rng: &mut R) -> bool {
    d20(rng) > THRESHOLD
}

pub fn evades<R: Rng + ?Sized>(_actor: &CharacterTraits, _opponent: &CharacterTraits, rng: &mut R) -> bool {
    d20(rng) > THRESHOLD
}

pub fn damage_inflicted<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    roll_die(rng, 6) as i64
}

/// Damage `attacker` deals in one auto-resolved blow.
pub fn quick_exchange<R: Rng + ?Sized>(
    attacker: &CharacterTraits,
    defender: &CharacterTraits,
    rng: &mut R,
) -> i64 {
    if hits(attacker, defender, rng) && !evades(defender, attacker, rng) {
        damage_inflicted(rng)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rolls_land_on_both_sides_of_the_threshold() {
        let mut rng = StdRng::seed_from_u64(21);
        let a = CharacterTraits::parse("NAME:A");
        let b = CharacterTraits::parse("NAME:B");
        let outcomes: Vec<bool> = (0..200).map(|_| hits(&a, &b, &mut rng)).collect();
        assert!(outcomes.contains(&true));
        assert!(outcomes.contains(&false));
    }

    #[test]
    fn quick_exchange_deals_zero_or_a_d6() {
        let mut rng = StdRng::seed_from_u64(22);
        let a = CharacterTraits::parse("NAME:A");
        let b = CharacterTraits::parse("NAME:B");
        let damage: Vec<i64> = (0..300).map(|_| quick_exchange(&a, &b, &mut rng)).collect();
        assert!(damage.iter().all(|d| (0..=6).contains(d)));
        assert!(damage.contains(&0));
        assert!(damage.iter().any(|d| *d > 0));
    }
}
