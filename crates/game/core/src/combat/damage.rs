//! Damage rolls, saving throws, poison and spell damage.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::character::{Ability, AttackDetail, CharacterTraits};
use crate::dice::{DiceExpr, d20};
use crate::magic::MagicTraits;
use crate::traits::Traits;

/// Difficulty class used when a poisoner has no `DC`.
pub const DEFAULT_POISON_DC: i64 = 10;

/// Poison damage used when a poisoner has no `DMG`.
pub const DEFAULT_POISON_DAMAGE: DiceExpr = DiceExpr::new(1, 4, 0);

/// Base of a caster's spell save difficulty class.
pub const SPELL_SAVE_BASE: i64 = 8;

// ============================================================================
// Weapon Damage
// ============================================================================

/// Rolls the damage of a landed attack.
///
/// # Formula
///
/// ```text
/// dice = attack.damage (dice doubled on a critical)
/// damage = max(roll(dice) + ability_modifier, 0)
/// ```
pub fn roll_attack_damage<R: Rng + ?Sized>(
    attack: &AttackDetail,
    critical: bool,
    rng: &mut R,
) -> i64 {
    let dice = if critical {
        attack.damage.critical()
    } else {
        attack.damage
    };
    (dice.roll(rng) + attack.ability_modifier).max(0)
}

// ============================================================================
// Saving Throws
// ============================================================================

/// A resolved saving throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrow {
    pub ability: Ability,
    pub natural: u32,
    pub total: i64,
    pub difficulty_class: i64,
}

impl SavingThrow {
    pub fn succeeded(&self) -> bool {
        self.total >= self.difficulty_class
    }
}

/// Save modifier against a non-melee effect.
///
/// Missing `save_by` falls back to DEX.
pub fn non_melee_save_ability_modifier(victim: &CharacterTraits, save_by: Option<Ability>) -> i64 {
    victim.save_modifier(save_by.unwrap_or(Ability::Dex))
}

pub fn saving_throw<R: Rng + ?Sized>(
    victim: &CharacterTraits,
    save_by: Option<Ability>,
    difficulty_class: i64,
    rng: &mut R,
) -> SavingThrow {
    let natural = d20(rng);
    SavingThrow {
        ability: save_by.unwrap_or(Ability::Dex),
        natural,
        total: natural as i64 + non_melee_save_ability_modifier(victim, save_by),
        difficulty_class,
    }
}

// ============================================================================
// Poison
// ============================================================================

/// Result of one poisoning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoisonOutcome {
    pub save: SavingThrow,
    pub damage: i64,
}

impl PoisonOutcome {
    pub fn resisted(&self) -> bool {
        self.save.succeeded()
    }
}

fn save_ability_of(source: &Traits) -> Option<Ability> {
    source
        .get_text("SAVE_BY")
        .and_then(|text| text.parse::<Ability>().ok())
}

/// Victim saves against the poisoner's `DC`; a success resists entirely.
pub fn poison_damage<R: Rng + ?Sized>(
    poisoner: &Traits,
    victim: &CharacterTraits,
    rng: &mut R,
) -> PoisonOutcome {
    let dc = poisoner.get_int_or("DC", DEFAULT_POISON_DC);
    let save = saving_throw(victim, save_ability_of(poisoner), dc, rng);
    let damage = if save.succeeded() {
        0
    } else {
        let dice = poisoner
            .get_dice("DMG")
            .filter(|d| d.max() > 0)
            .unwrap_or(DEFAULT_POISON_DAMAGE);
        dice.roll(rng).max(0)
    };
    PoisonOutcome { save, damage }
}

// ============================================================================
// Spells
// ============================================================================

/// Result of a damaging spell on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellOutcome {
    pub save: Option<SavingThrow>,
    pub damage: i64,
}

/// Save difficulty class of a spell cast by `caster`.
///
/// A spell's own `DC` wins over the caster-derived value.
pub fn spell_save_dc(caster: &CharacterTraits, spell: &MagicTraits) -> i64 {
    let casting = caster
        .effective_modifier(Ability::Int)
        .max(caster.effective_modifier(Ability::Wis))
        .max(caster.effective_modifier(Ability::Cha));
    spell.get_int_or("DC", SPELL_SAVE_BASE + caster.proficiency_bonus() + casting)
}

/// Rolls scaled spell damage; a successful save halves it.
pub fn spell_damage<R: Rng + ?Sized>(
    spell: &MagicTraits,
    caster: &CharacterTraits,
    target: &CharacterTraits,
    rng: &mut R,
) -> SpellOutcome {
    let Some(dice) = spell.damage_dice(caster.character_level()) else {
        return SpellOutcome {
            save: None,
            damage: 0,
        };
    };
    let rolled = dice.roll(rng).max(0);
    match spell.save_by() {
        Some(ability) => {
            let save = saving_throw(target, Some(ability), spell_save_dc(caster, spell), rng);
            let damage = if save.succeeded() { rolled / 2 } else { rolled };
            SpellOutcome {
                save: Some(save),
                damage,
            }
        }
        None => SpellOutcome {
            save: None,
            damage: rolled,
        },
    }
}
