//! Spell traits and level scaling.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::character::Ability;
use crate::character::tables::MAX_LEVEL;
use crate::dice::DiceExpr;
use crate::traits::Traits;

/// Traits of a spell.
///
/// `LEVEL` is the lowest caster level able to cast it and `MAX_LEVEL` the
/// level past which it stops improving.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MagicTraits {
    traits: Traits,
}

impl Deref for MagicTraits {
    type Target = Traits;

    fn deref(&self) -> &Traits {
        &self.traits
    }
}

impl DerefMut for MagicTraits {
    fn deref_mut(&mut self) -> &mut Traits {
        &mut self.traits
    }
}

impl From<Traits> for MagicTraits {
    fn from(traits: Traits) -> Self {
        Self { traits }
    }
}

impl MagicTraits {
    pub fn parse(definition: &str) -> Self {
        Self::from(Traits::parse(definition))
    }

    pub fn into_traits(self) -> Traits {
        self.traits
    }

    pub fn min_level(&self) -> u32 {
        self.get_int_or("LEVEL", 1).max(1) as u32
    }

    pub fn max_level(&self) -> u32 {
        self.get_int_or("MAX_LEVEL", MAX_LEVEL as i64)
            .clamp(self.min_level() as i64, MAX_LEVEL as i64) as u32
    }

    /// Caster levels above the minimum, clipped to `MAX_LEVEL`.
    pub fn levels_above_minimum(&self, caster_level: u32) -> u32 {
        caster_level
            .min(self.max_level())
            .saturating_sub(self.min_level())
    }

    fn scaled(&self, base_key: &str, per_level_key: &str, caster_level: u32) -> Option<DiceExpr> {
        let base = self.get_dice(base_key)?;
        let steps = self.levels_above_minimum(caster_level);
        match self.get_dice(per_level_key) {
            Some(rate) if steps > 0 && rate.sides == base.sides => Some(
                base.with_extra_dice(rate.count * steps)
                    .with_modifier(rate.modifier * steps as i32),
            ),
            Some(rate) if steps > 0 => {
                tracing::warn!(
                    spell = %self.name(),
                    "{} {} does not match base {}, using average",
                    per_level_key,
                    rate,
                    base
                );
                let average = (rate.min() + rate.max()) / 2;
                Some(base.with_modifier((average * steps as i64) as i32))
            }
            _ => Some(base),
        }
    }

    /// Damage dice for a caster of `caster_level`.
    pub fn damage_dice(&self, caster_level: u32) -> Option<DiceExpr> {
        self.scaled("DMG", "DMG_PER_LEVEL", caster_level)
            .filter(|dice| dice.max() > 0)
    }

    /// Healing dice for a caster of `caster_level`.
    pub fn healing_dice(&self, caster_level: u32) -> Option<DiceExpr> {
        self.scaled("HP_GAIN", "HP_GAIN_PER_LEVEL", caster_level)
            .filter(|dice| dice.max() > 0)
    }

    pub fn range_in_tiles(&self) -> i64 {
        self.get_feet_as_tiles("RANGE")
    }

    pub fn max_targets(&self) -> usize {
        self.get_int_or("MAX_TARGETS", 1).max(1) as usize
    }

    /// Ability the target saves with, if the spell allows a save.
    pub fn save_by(&self) -> Option<Ability> {
        let text = self.get_text("SAVE_BY")?;
        match text.parse::<Ability>() {
            Ok(ability) => Some(ability),
            Err(_) => {
                tracing::warn!(spell = %self.name(), "unknown SAVE_BY {}", text);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_scales_per_level_above_minimum() {
        let bolt = MagicTraits::parse("NAME:Firebolt, DMG:1D10, DMG_PER_LEVEL:1D10, LEVEL:1, MAX_LEVEL:5");
        assert_eq!(bolt.damage_dice(1), Some(DiceExpr::new(1, 10, 0)));
        assert_eq!(bolt.damage_dice(3), Some(DiceExpr::new(3, 10, 0)));
        assert_eq!(bolt.damage_dice(5), Some(DiceExpr::new(5, 10, 0)));
        assert_eq!(bolt.damage_dice(12), Some(DiceExpr::new(5, 10, 0)));
    }

    #[test]
    fn minimum_level_offsets_scaling() {
        let ball = MagicTraits::parse("NAME:Fireball, DMG:8D6, DMG_PER_LEVEL:1D6, LEVEL:5");
        assert_eq!(ball.damage_dice(4), Some(DiceExpr::new(8, 6, 0)));
        assert_eq!(ball.damage_dice(7), Some(DiceExpr::new(10, 6, 0)));
    }

    #[test]
    fn healing_uses_its_own_rate() {
        let heal = MagicTraits::parse("NAME:Cure, HP_GAIN:1D8 + 2, HP_GAIN_PER_LEVEL:1D8, LEVEL:1");
        assert_eq!(heal.healing_dice(2), Some(DiceExpr::new(2, 8, 2)));
        assert_eq!(heal.damage_dice(2), None);
    }

    #[test]
    fn mismatched_rates_add_their_average() {
        let odd = MagicTraits::parse("DMG:2D6, DMG_PER_LEVEL:1D4, LEVEL:1");
        assert_eq!(odd.damage_dice(3), Some(DiceExpr::new(2, 6, 4)));
    }

    #[test]
    fn range_targets_and_saves() {
        let spell = MagicTraits::parse("RANGE:60, MAX_TARGETS:3, SAVE_BY:dex");
        assert_eq!(spell.range_in_tiles(), 6);
        assert_eq!(spell.max_targets(), 3);
        assert_eq!(spell.save_by(), Some(Ability::Dex));

        let plain = MagicTraits::parse("NAME:Spark");
        assert_eq!(plain.max_targets(), 1);
        assert_eq!(plain.save_by(), None);
    }
}
