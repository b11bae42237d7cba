//! Traits for actors that fight and level up.
//!
//! [`CharacterTraits`] wraps a plain [`Traits`] bag and layers the derived
//! rules on top of it: level and proficiency from `EXP`, hit points from
//! `HIT_DICE`, armour class from equipment, and the attack list.
//!
//! # Design Principles
//!
//! - Base scores (`STR`, `DEX`, ...) are never changed by effects. Transient
//!   effects live in `FX_<KEY>` traits and equipped magic items contribute
//!   through a separate bonus table, so both can be dropped independently.
//! - Attacks are derived lazily from the wielded weapons recorded by
//!   [`CharacterTraits::utilise_additional_traits`].

mod armour;
mod attack;
pub mod tables;

pub use armour::{ArmourWeight, compose_armour_class};
pub use attack::{AttackDetail, UNARMED_DAMAGE, is_dual_wieldable};

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::dice::DiceExpr;
use crate::traits::value::DEFAULT_HIT_DICE;
use crate::traits::{FEET_PER_TILE, TraitValue, Traits, ability_modifier};
use tables::{experience_for_challenge_rating, level_for_experience, proficiency_bonus_for_level};

/// Prefix of transient effect traits.
pub const EFFECT_PREFIX: &str = "FX_";

/// Walking speed in feet when `SPEED` is missing.
pub const DEFAULT_SPEED: i64 = 30;

/// The six ability scores.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub fn key(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }
}

/// Before and after values of a changed quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change<T> {
    pub was: T,
    pub now: T,
}

impl<T: PartialOrd> Change<T> {
    pub fn increased(&self) -> bool {
        self.now > self.was
    }
}

/// Experience and level before and after an award.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceDelta {
    pub exp: Change<i64>,
    pub level: Change<u32>,
}

impl ExperienceDelta {
    pub fn levelled_up(&self) -> bool {
        self.level.increased()
    }
}

/// Equipped items grouped by slot type.
#[derive(Clone, Debug, Default)]
pub struct Equipment<'a> {
    pub weapons: Vec<&'a Traits>,
    pub armour: Vec<&'a Traits>,
    pub shields: Vec<&'a Traits>,
    pub magic: Vec<&'a Traits>,
}

/// Traits of an actor capable of combat and levelling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterTraits {
    traits: Traits,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    wielded: Vec<Traits>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    magic_bonuses: BTreeMap<String, i64>,
}

impl Deref for CharacterTraits {
    type Target = Traits;

    fn deref(&self) -> &Traits {
        &self.traits
    }
}

impl DerefMut for CharacterTraits {
    fn deref_mut(&mut self) -> &mut Traits {
        &mut self.traits
    }
}

impl From<Traits> for CharacterTraits {
    fn from(traits: Traits) -> Self {
        Self::new(traits)
    }
}

impl CharacterTraits {
    pub fn new(traits: Traits) -> Self {
        Self {
            traits,
            wielded: Vec::new(),
            magic_bonuses: BTreeMap::new(),
        }
    }

    pub fn parse(definition: &str) -> Self {
        Self::new(Traits::parse(definition))
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    // ========================================================================
    // Levelling
    // ========================================================================

    pub fn experience(&self) -> i64 {
        self.get_int("EXP")
    }

    /// Level from `EXP`, or the fixed `LEVEL` of creatures without experience.
    pub fn character_level(&self) -> u32 {
        if self.has("EXP") {
            level_for_experience(self.experience())
        } else {
            self.get_int_or("LEVEL", 1).clamp(1, tables::MAX_LEVEL as i64) as u32
        }
    }

    /// Level-derived bonus, doubled for rogues.
    pub fn proficiency_bonus(&self) -> i64 {
        let base = proficiency_bonus_for_level(self.character_level());
        if self.get_text("CLASS").as_deref() == Some("ROGUE") {
            base * 2
        } else {
            base
        }
    }

    /// Proficiency bonus that applies when using `item`.
    pub fn character_pb(&self, item: &Traits) -> i64 {
        if self.is_proficient_with(item) {
            self.proficiency_bonus()
        } else {
            0
        }
    }

    /// True when every word of some `PROF` group appears in `item_type`.
    pub fn is_proficient(&self, item_type: &str) -> bool {
        let upper = item_type.to_ascii_uppercase();
        let words: Vec<&str> = upper.split_whitespace().collect();
        self.get_list("PROF").iter().any(|group| {
            let mut tokens = group.split_whitespace().peekable();
            tokens.peek().is_some() && tokens.all(|token| words.contains(&token))
        })
    }

    pub fn is_proficient_with(&self, item: &Traits) -> bool {
        item.get_text("TYPE")
            .is_some_and(|item_type| self.is_proficient(&item_type))
    }

    // ========================================================================
    // Effective values
    // ========================================================================

    fn effective_raw(&self, key: &str) -> i64 {
        let canonical = key.trim().trim_start_matches('_').to_ascii_uppercase();
        let transient = self.get_int(&format!("{EFFECT_PREFIX}{canonical}"));
        let magic = self
            .magic_bonuses
            .get(&format!("{EFFECT_PREFIX}{canonical}"))
            .copied()
            .unwrap_or_default();
        self.get_int(&canonical) + transient + magic
    }

    /// Value with transient and magic effects folded in.
    ///
    /// Non-numeric traits are returned unchanged.
    pub fn effective(&self, key: &str) -> Option<TraitValue> {
        match self.get(key)? {
            TraitValue::Int(_) => Some(TraitValue::Int(self.effective_int(key))),
            other => Some(other.clone()),
        }
    }

    /// Effective integer value, never below zero.
    pub fn effective_int(&self, key: &str) -> i64 {
        self.effective_raw(key).max(0)
    }

    pub fn effective_modifier(&self, ability: Ability) -> i64 {
        if !self.has(ability.key()) {
            return 0;
        }
        ability_modifier(self.effective_int(ability.key()))
    }

    /// Modifier for a saving throw, including proficiency in `<ABILITY> SAVE`.
    pub fn save_modifier(&self, ability: Ability) -> i64 {
        let proficient = self.is_proficient(&format!("{} SAVE", ability.key()));
        let pb = if proficient { self.proficiency_bonus() } else { 0 };
        self.effective_modifier(ability) + pb
    }

    pub fn magic_bonuses(&self) -> &BTreeMap<String, i64> {
        &self.magic_bonuses
    }

    /// Drops every `FX_*` transient, keeping equipped magic bonuses.
    pub fn clear_transient_effects(&mut self) -> usize {
        self.traits.delete_prefixed(EFFECT_PREFIX)
    }

    // ========================================================================
    // Derived statistics
    // ========================================================================

    /// Full hit dice at level one, then the average per further level.
    pub fn max_hit_points(&self) -> i64 {
        let dice = self.get_dice("HIT_DICE").unwrap_or(DEFAULT_HIT_DICE);
        let con = self.effective_modifier(Ability::Con);
        let first = dice.max() + con;
        let per_level = dice.sides as i64 / 2 + 1 + con;
        let extra_levels = self.character_level().saturating_sub(1) as i64;
        (first + per_level * extra_levels).max(1)
    }

    /// Stores `HP_MAX`, initialising `HP` when missing. Returns the new maximum.
    pub fn refresh_max_hit_points(&mut self) -> i64 {
        let max = self.max_hit_points();
        self.set("HP_MAX", max);
        if !self.has("HP") {
            self.set("HP", max);
        }
        max
    }

    /// Stored `AC`, or unarmoured with DEX when never computed.
    pub fn armour_class(&self) -> i64 {
        if self.has("AC") {
            self.get_int("AC")
        } else {
            compose_armour_class(self.effective_modifier(Ability::Dex), &[], &[])
        }
    }

    pub fn max_tiles_per_move(&self) -> i64 {
        (self.get_int_or("SPEED", DEFAULT_SPEED) / FEET_PER_TILE).max(1)
    }

    pub fn wielded(&self) -> &[Traits] {
        &self.wielded
    }

    /// Recomputes armour class, wielded weapons and magic bonuses.
    pub fn utilise_additional_traits(&mut self, equipment: &Equipment<'_>) {
        self.magic_bonuses.clear();
        for item in &equipment.magic {
            for (key, value) in item.all_traits_sorted() {
                if !key.starts_with(EFFECT_PREFIX) {
                    continue;
                }
                if let Some(delta) = value.as_int() {
                    *self.magic_bonuses.entry(key).or_default() += delta;
                }
            }
        }

        self.wielded = equipment
            .weapons
            .iter()
            .take(2)
            .map(|w| (*w).clone())
            .collect();

        let ac = compose_armour_class(
            self.effective_modifier(Ability::Dex),
            &equipment.armour,
            &equipment.shields,
        );
        self.set("AC", ac);
        tracing::debug!(name = %self.name(), ac, weapons = self.wielded.len(), "equipment applied");
    }

    // ========================================================================
    // Attacks
    // ========================================================================

    /// Attacks made in one exchange.
    pub fn attacks(&self) -> Vec<AttackDetail> {
        let str_mod = self.effective_modifier(Ability::Str);
        let dex_mod = self.effective_modifier(Ability::Dex);

        if let Some(main) = self.wielded.first() {
            let mut attacks = vec![AttackDetail {
                name: main.name(),
                damage: attack::weapon_damage(main),
                proficiency_bonus: self.character_pb(main),
                ability_modifier: attack::weapon_ability_modifier(main, str_mod, dex_mod)
                    + main.get_int("ATTACK_BONUS"),
            }];
            let off_hand = self
                .wielded
                .get(1)
                .filter(|off| is_dual_wieldable(main) && is_dual_wieldable(off));
            if let Some(off) = off_hand {
                let base = attack::weapon_ability_modifier(off, str_mod, dex_mod);
                attacks.push(AttackDetail {
                    name: off.name(),
                    damage: attack::weapon_damage(off),
                    proficiency_bonus: self.character_pb(off),
                    ability_modifier: attack::off_hand_modifier(base) + off.get_int("ATTACK_BONUS"),
                });
            }
            return attacks;
        }

        let natural: Vec<DiceExpr> = ["DMG", "DMG2"]
            .iter()
            .filter_map(|key| self.get_dice(key))
            .filter(|dice| dice.max() > 0)
            .collect();
        if natural.is_empty() {
            return vec![AttackDetail {
                name: "unarmed strike".to_string(),
                damage: UNARMED_DAMAGE,
                proficiency_bonus: self.proficiency_bonus(),
                ability_modifier: str_mod,
            }];
        }

        let attack_bonus = self.get_int("ATTACK_BONUS");
        natural
            .into_iter()
            .map(|damage| AttackDetail {
                name: format!("{} attack", self.name()),
                damage,
                proficiency_bonus: self.proficiency_bonus(),
                ability_modifier: str_mod + attack_bonus,
            })
            .collect()
    }

    // ========================================================================
    // Experience
    // ========================================================================

    /// Awards challenge-rating experience for defeating `defeated`.
    pub fn adjust_for_defeat_of_actor(&mut self, defeated: &CharacterTraits) -> ExperienceDelta {
        let award = experience_for_challenge_rating(defeated.get("CR"));
        self.award_experience(award)
    }

    pub fn award_experience(&mut self, award: i64) -> ExperienceDelta {
        let was_exp = self.experience();
        let was_level = self.character_level();
        let now_exp = self.add_int("EXP", award, true);
        let now_level = self.character_level();
        tracing::debug!(name = %self.name(), award, now_exp, now_level, "experience awarded");
        ExperienceDelta {
            exp: Change {
                was: was_exp,
                now: now_exp,
            },
            level: Change {
                was: was_level,
                now: now_level,
            },
        }
    }

    /// Raises abilities and `EXP` to `theirs + extra` wherever that is higher.
    ///
    /// Armour class is left alone.
    pub fn exceed_abilities_and_exp(&mut self, theirs: &CharacterTraits, extra: i64) {
        use strum::IntoEnumIterator;

        for ability in Ability::iter() {
            let key = ability.key();
            if !theirs.has(key) {
                continue;
            }
            let target = theirs.get_int(key) + extra;
            if target > self.get_int(key) {
                self.set(key, target);
            }
        }
        let target_exp = theirs.experience() + extra;
        if target_exp > self.experience() {
            self.set("EXP", target_exp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> CharacterTraits {
        CharacterTraits::parse(
            "NAME:Ann, STR:14, DEX:16, CON:12, INT:10, WIS:10, CHA:8, EXP:0, HIT_DICE:1D8, \
             PROF:SIMPLE & MARTIAL MELEE & LIGHT ARMOUR & DEX SAVE",
        )
    }

    #[test]
    fn negative_effects_never_push_below_zero() {
        let mut traits = CharacterTraits::parse("STR:10");
        let mut seen = Vec::new();
        for _ in 0..3 {
            traits.add_int("FX_STR", -4, false);
            seen.push(traits.effective_int("STR"));
        }
        assert_eq!(seen, vec![6, 2, 0]);
        assert_eq!(traits.get_int("STR"), 10);
    }

    #[test]
    fn clearing_effects_keeps_magic_bonuses() {
        let mut traits = CharacterTraits::parse("STR:10");
        let ring = Traits::parse("NAME:Ring, KIND:MAGIC, FX_STR:2");
        traits.utilise_additional_traits(&Equipment {
            magic: vec![&ring],
            ..Equipment::default()
        });
        traits.set("FX_STR", 4);
        assert_eq!(traits.effective_int("STR"), 16);

        traits.clear_transient_effects();
        assert_eq!(traits.effective_int("STR"), 12);
        assert_eq!(traits.effective("STR"), Some(TraitValue::Int(12)));
    }

    #[test]
    fn level_and_proficiency_follow_experience() {
        let mut traits = CharacterTraits::parse("EXP:6499");
        assert_eq!(traits.character_level(), 4);
        assert_eq!(traits.proficiency_bonus(), 2);

        traits.set("EXP", 120_000);
        assert_eq!(traits.character_level(), 13);
        assert_eq!(traits.proficiency_bonus(), 5);

        traits.set("CLASS", "rogue");
        assert_eq!(traits.proficiency_bonus(), 10);
    }

    #[test]
    fn proficiency_needs_every_token_of_a_group() {
        let traits = hero();
        assert!(traits.is_proficient("SIMPLE MELEE LIGHT"));
        assert!(traits.is_proficient("MARTIAL MELEE FINESSE"));
        assert!(!traits.is_proficient("MARTIAL RANGED"));
        assert!(traits.is_proficient("LIGHT ARMOUR"));
        assert!(!traits.is_proficient("HEAVY ARMOUR"));

        let bow = Traits::parse("NAME:Longbow, TYPE:MARTIAL RANGED, DMG:1D8");
        assert_eq!(traits.character_pb(&bow), 0);
        let sword = Traits::parse("NAME:Sword, TYPE:MARTIAL MELEE, DMG:1D8");
        assert_eq!(traits.character_pb(&sword), 2);
    }

    #[test]
    fn saving_throws_use_save_proficiency() {
        let traits = hero();
        assert_eq!(traits.save_modifier(Ability::Dex), 3 + 2);
        assert_eq!(traits.save_modifier(Ability::Str), 2);
        assert_eq!(traits.save_modifier(Ability::Cha), -1);
    }

    #[test]
    fn hit_points_scale_with_level_and_constitution() {
        let mut traits = hero();
        assert_eq!(traits.max_hit_points(), 8 + 1);
        traits.set("EXP", 900);
        assert_eq!(traits.max_hit_points(), 9 + 2 * (4 + 1 + 1));

        assert_eq!(traits.refresh_max_hit_points(), 21);
        assert_eq!(traits.get_int("HP"), 21);
        assert_eq!(traits.get_int("HP_MAX"), 21);
    }

    #[test]
    fn speed_converts_to_tiles_with_a_floor() {
        assert_eq!(CharacterTraits::parse("SPEED:30").max_tiles_per_move(), 3);
        assert_eq!(CharacterTraits::parse("SPEED:5").max_tiles_per_move(), 1);
        assert_eq!(CharacterTraits::parse("NAME:Slime").max_tiles_per_move(), 3);
    }

    #[test]
    fn armour_class_is_stored_on_equip() {
        let mut traits = hero();
        assert_eq!(traits.armour_class(), 13);

        let plate = Traits::parse("NAME:Plate, TYPE:HEAVY ARMOUR, AC:18");
        let shield = Traits::parse("NAME:Shield, TYPE:SHIELD, AC_BONUS:2");
        traits.utilise_additional_traits(&Equipment {
            armour: vec![&plate],
            shields: vec![&shield],
            ..Equipment::default()
        });
        assert_eq!(traits.get_int("AC"), 20);
        assert_eq!(traits.armour_class(), 20);
    }

    #[test]
    fn dual_wielding_needs_light_or_finesse_weapons() {
        let mut traits = hero();
        let dagger = Traits::parse("NAME:Dagger, TYPE:SIMPLE MELEE LIGHT FINESSE, DMG:1D4");
        let shortsword = Traits::parse("NAME:Shortsword, TYPE:MARTIAL MELEE LIGHT FINESSE, DMG:1D6, ATTACK_BONUS:1");
        traits.utilise_additional_traits(&Equipment {
            weapons: vec![&dagger, &shortsword],
            ..Equipment::default()
        });
        let attacks = traits.attacks();
        assert_eq!(attacks.len(), 2);
        assert_eq!(attacks[0].name, "Dagger");
        assert_eq!(attacks[0].ability_modifier, 3);
        assert_eq!(attacks[0].proficiency_bonus, 2);
        assert_eq!(attacks[1].ability_modifier, 1);
        assert_eq!(attacks[1].damage, DiceExpr::new(1, 6, 0));

        let greataxe = Traits::parse("NAME:Greataxe, TYPE:MARTIAL MELEE HEAVY, DMG:1D12");
        traits.utilise_additional_traits(&Equipment {
            weapons: vec![&greataxe, &dagger],
            ..Equipment::default()
        });
        let attacks = traits.attacks();
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].ability_modifier, 2);
    }

    #[test]
    fn off_hand_keeps_negative_modifiers() {
        let mut weakling = CharacterTraits::parse("STR:6, DEX:8, PROF:SIMPLE");
        let dagger = Traits::parse("NAME:Dagger, TYPE:SIMPLE MELEE LIGHT FINESSE, DMG:1D4");
        weakling.utilise_additional_traits(&Equipment {
            weapons: vec![&dagger, &dagger],
            ..Equipment::default()
        });
        let attacks = weakling.attacks();
        assert_eq!(attacks[1].ability_modifier, -1);
    }

    #[test]
    fn unarmed_and_natural_attacks() {
        let unarmed = hero().attacks();
        assert_eq!(unarmed.len(), 1);
        assert_eq!(unarmed[0].name, "unarmed strike");
        assert_eq!(unarmed[0].damage, UNARMED_DAMAGE);

        let wolf = CharacterTraits::parse("NAME:Wolf, STR:12, DMG:2D4 + 2, DMG2:1D4, CR:1/4");
        let bites = wolf.attacks();
        assert_eq!(bites.len(), 2);
        assert_eq!(bites[0].damage, DiceExpr::new(2, 4, 2));
        assert_eq!(bites[0].to_hit_bonus(), 2 + 1);
    }

    #[test]
    fn defeating_an_actor_awards_challenge_experience() {
        let mut traits = CharacterTraits::parse("EXP:250");
        let goblin = CharacterTraits::parse("NAME:Goblin, CR:1/4");
        let delta = traits.adjust_for_defeat_of_actor(&goblin);
        assert_eq!(delta.exp, Change { was: 250, now: 300 });
        assert_eq!(delta.level, Change { was: 1, now: 2 });
        assert!(delta.levelled_up());
        assert_eq!(traits.character_level(), 2);

        let ogre = CharacterTraits::parse("NAME:Ogre, CR:2");
        let delta = traits.adjust_for_defeat_of_actor(&ogre);
        assert_eq!(delta.exp.now, 750);
        assert!(!delta.levelled_up());
    }

    #[test]
    fn exceeding_is_a_one_way_ratchet() {
        let mut mimic = CharacterTraits::parse("STR:16, DEX:8, EXP:100, AC:12");
        let hero = CharacterTraits::parse("STR:12, DEX:14, EXP:900, AC:17");
        mimic.exceed_abilities_and_exp(&hero, 1);
        assert_eq!(mimic.get_int("STR"), 16);
        assert_eq!(mimic.get_int("DEX"), 15);
        assert_eq!(mimic.get_int("EXP"), 901);
        assert_eq!(mimic.get_int("AC"), 12);
    }
}
