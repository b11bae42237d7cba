//! Combat resolution.
//!
//! Pure functions over [`CharacterTraits`](crate::character::CharacterTraits)
//! and [`AttackDetail`](crate::character::AttackDetail). Nothing here mutates
//! an actor; callers apply the returned damage through the world.
//!
//! # Core Functions
//!
//! - `melee_exchange`: every attack of one side, d20 + bonus vs AC
//! - `poison_damage`: victim saves against the poisoner's `DC`
//! - `spell_damage`: scaled spell dice, half on a successful save
//! - `non_melee_save_ability_modifier`: save bonus with the DEX fallback
//!
//! [`crate::chance`] holds the older flat-roll helpers.

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{
    PoisonOutcome, SavingThrow, SpellOutcome, non_melee_save_ability_modifier, poison_damage,
    roll_attack_damage, saving_throw, spell_damage, spell_save_dc,
};
pub use hit::{AttackRoll, check_hit, roll_to_hit};
pub use result::{AttackResult, ExchangeOutcome, melee_exchange};
