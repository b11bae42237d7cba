//! Attack generation from wielded weapons.

use serde::{Deserialize, Serialize};

use crate::dice::DiceExpr;
use crate::traits::Traits;

/// Damage of a strike with no weapon and no natural attack.
pub const UNARMED_DAMAGE: DiceExpr = DiceExpr::new(1, 4, 0);

/// One attack an actor makes per exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDetail {
    pub name: String,
    pub damage: DiceExpr,
    pub proficiency_bonus: i64,
    pub ability_modifier: i64,
}

impl AttackDetail {
    /// Bonus added to the d20 attack roll.
    pub fn to_hit_bonus(&self) -> i64 {
        self.proficiency_bonus + self.ability_modifier
    }
}

/// Whether a weapon may be wielded in the off hand.
pub fn is_dual_wieldable(weapon: &Traits) -> bool {
    let kind = weapon.get_text("TYPE").unwrap_or_default();
    kind.split_whitespace()
        .any(|word| word == "LIGHT" || word == "FINESSE")
}

/// Ability modifier a weapon attacks with, given effective STR and DEX modifiers.
pub fn weapon_ability_modifier(weapon: &Traits, str_mod: i64, dex_mod: i64) -> i64 {
    let kind = weapon.get_text("TYPE").unwrap_or_default();
    let words: Vec<&str> = kind.split_whitespace().collect();
    if words.contains(&"RANGED") {
        dex_mod
    } else if words.contains(&"FINESSE") {
        str_mod.max(dex_mod)
    } else {
        str_mod
    }
}

/// Off-hand attacks only keep a penalty, never a bonus.
pub fn off_hand_modifier(base_modifier: i64) -> i64 {
    base_modifier.min(0)
}

/// Weapon damage dice, defaulting to an unarmed strike.
pub fn weapon_damage(weapon: &Traits) -> DiceExpr {
    weapon.get_dice("DMG").unwrap_or(UNARMED_DAMAGE)
}
