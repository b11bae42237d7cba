//! Melee exchange resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::character::CharacterTraits;

use super::damage::roll_attack_damage;
use super::hit::{AttackRoll, roll_to_hit};

/// Result of one attack within an exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    pub attack_name: String,
    pub natural: u32,
    pub roll: AttackRoll,
    /// Zero on a miss.
    pub damage: i64,
}

/// Every attack one side made against the other.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    pub attacks: Vec<AttackResult>,
}

impl ExchangeOutcome {
    pub fn total_damage(&self) -> i64 {
        self.attacks.iter().map(|a| a.damage).sum()
    }

    pub fn any_hit(&self) -> bool {
        self.attacks.iter().any(|a| a.roll.is_hit())
    }
}

/// Resolves every attack of `attacker` against `defender`'s armour class.
///
/// Damage is rolled but not applied.
pub fn melee_exchange<R: Rng + ?Sized>(
    attacker: &CharacterTraits,
    defender: &CharacterTraits,
    rng: &mut R,
) -> ExchangeOutcome {
    let armour_class = defender.armour_class();
    let attacks = attacker
        .attacks()
        .iter()
        .map(|attack| {
            let (natural, roll) = roll_to_hit(attack, armour_class, rng);
            let damage = match roll {
                AttackRoll::Critical => roll_attack_damage(attack, true, rng),
                AttackRoll::Hit => roll_attack_damage(attack, false, rng),
                AttackRoll::Miss | AttackRoll::Fumble => 0,
            };
            AttackResult {
                attack_name: attack.name.clone(),
                natural,
                roll,
                damage,
            }
        })
        .collect();
    ExchangeOutcome { attacks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Equipment;
    use crate::traits::Traits;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn untouchable_defender_only_takes_criticals() {
        let mut rng = StdRng::seed_from_u64(11);
        let attacker = CharacterTraits::parse("STR:10, DMG:1D1");
        let wall = CharacterTraits::parse("AC:40");
        for _ in 0..200 {
            let outcome = melee_exchange(&attacker, &wall, &mut rng);
            let result = &outcome.attacks[0];
            match result.roll {
                AttackRoll::Critical => assert_eq!(result.damage, 2),
                roll => {
                    assert!(!roll.is_hit());
                    assert_eq!(result.damage, 0);
                }
            }
        }
    }

    #[test]
    fn damage_sums_across_both_hands() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut duelist = CharacterTraits::parse("STR:10, DEX:10, PROF:SIMPLE");
        let knife = Traits::parse("NAME:Knife, TYPE:SIMPLE LIGHT, DMG:1D1, ATTACK_BONUS:30");
        duelist.utilise_additional_traits(&Equipment {
            weapons: vec![&knife, &knife],
            ..Equipment::default()
        });
        let target = CharacterTraits::parse("AC:10");
        let outcome = melee_exchange(&duelist, &target, &mut rng);
        assert_eq!(outcome.attacks.len(), 2);
        let expected: i64 = outcome
            .attacks
            .iter()
            .map(|a| match a.roll {
                AttackRoll::Hit => 31,
                AttackRoll::Critical => 32,
                _ => 0,
            })
            .sum();
        assert_eq!(outcome.total_damage(), expected);
    }
}
