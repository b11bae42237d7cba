//! Poison attacks and things to eat or drink.

use crawl_core::combat::poison_damage;
use crawl_core::{ActorId, DamageOutcome, TraitValue, Traits};

use crate::api::{Collaborators, Result, SoundCue};
use crate::session::GameSession;

/// Remaining turns of damage over time on a poisoned actor.
pub const TOXIC_TURNS: &str = "FX_TOXIC_TURNS";
/// Damage dealt each of those turns.
pub const TOXIC_DAMAGE: &str = "FX_TOXIC_DMG";

/// `poisoner` tries to poison `victim`, who may save.
pub(super) async fn poison(
    session: &mut GameSession,
    io: &Collaborators,
    poisoner: ActorId,
    victim: ActorId,
) -> Result<()> {
    let (source, victim_name) = {
        let p = session.world.try_actor(poisoner)?;
        let v = session.world.try_actor(victim)?;
        (p.traits.traits().clone(), v.name())
    };
    let source_name = source.name();
    apply_poison(session, io, &source, poisoner, victim).await?;
    tracing::debug!(poisoner = %source_name, victim = %victim_name, "poison resolved");
    Ok(())
}

async fn apply_poison(
    session: &mut GameSession,
    io: &Collaborators,
    source: &Traits,
    attacker: ActorId,
    victim: ActorId,
) -> Result<DamageOutcome> {
    let (outcome, victim_name) = {
        let v = session.world.try_actor(victim)?;
        (poison_damage(source, &v.traits, &mut session.rng), v.name())
    };
    let name = source.name();
    let is_hero = victim == ActorId::HERO;
    io.presenter.play_sound(SoundCue::Poison).await?;

    if outcome.resisted() {
        let line = if is_hero {
            format!("You resist the {name}'s poison.")
        } else {
            format!("{victim_name} resists the {name}'s poison.")
        };
        io.presenter.notify(&line).await?;
        return Ok(DamageOutcome::Ignored);
    }

    let result = session.world.apply_damage(attacker, victim, outcome.damage);
    match result {
        DamageOutcome::Killed { .. } => {
            let line = if is_hero {
                format!("The {name}'s poison kills you.")
            } else {
                format!("The {name}'s poison kills {victim_name}.")
            };
            io.presenter.notify(&line).await?;
        }
        DamageOutcome::Wounded { hit_points } if is_hero => {
            io.presenter
                .notify(&format!(
                    "You are poisoned for {} damage and survive with {hit_points} HP.",
                    outcome.damage
                ))
                .await?;
            // Lingering poison only ticks at the start of a hero turn.
            let turns = source.get_int("DOT_TURNS");
            if turns > 0 {
                let per_turn = source
                    .get("DOT_DMG")
                    .cloned()
                    .unwrap_or(TraitValue::Int(1));
                let v = session.world.try_actor_mut(victim)?;
                v.traits.set(TOXIC_TURNS, turns);
                v.traits.set(TOXIC_DAMAGE, per_turn);
            }
        }
        DamageOutcome::Wounded { .. } => {
            io.presenter
                .notify(&format!("{victim_name} is poisoned for {} damage.", outcome.damage))
                .await?;
        }
        DamageOutcome::Ignored => {}
    }
    Ok(result)
}

/// Applies one turn of lingering poison to `victim`.
///
/// Returns the damage dealt; the effect clears itself when it runs out.
pub async fn apply_toxic_effect(
    session: &mut GameSession,
    io: &Collaborators,
    victim: ActorId,
) -> Result<i64> {
    let damage = {
        let v = session.world.try_actor_mut(victim)?;
        let turns = v.traits.get_int(TOXIC_TURNS);
        if turns <= 0 {
            return Ok(0);
        }
        let damage = match v.traits.get_dice(TOXIC_DAMAGE) {
            Some(dice) => dice.roll(&mut session.rng).max(0),
            None => v.traits.get_int_or(TOXIC_DAMAGE, 1).max(0),
        };
        if turns == 1 {
            v.traits.delete(TOXIC_TURNS);
            v.traits.delete(TOXIC_DAMAGE);
        } else {
            v.traits.set(TOXIC_TURNS, turns - 1);
        }
        damage
    };

    // Self-inflicted so no experience changes hands.
    let outcome = session.world.apply_damage(victim, victim, damage);
    io.presenter.play_sound(SoundCue::Poison).await?;
    let line = match outcome {
        DamageOutcome::Killed { .. } => "The poison in your veins finishes you.".to_string(),
        _ => format!("The poison burns for {damage} damage."),
    };
    io.presenter.notify(&line).await?;
    Ok(damage)
}

/// `consumer` eats or drinks the artefact in `holder`'s `slot`.
pub(super) async fn consume(
    session: &mut GameSession,
    io: &Collaborators,
    holder: ActorId,
    slot: usize,
    consumer: ActorId,
) -> Result<()> {
    let item = {
        let store = session.world.try_actor_mut(holder)?.store_mut();
        store
            .get(slot)
            .ok_or(crawl_core::StoreError::SlotOutOfRange(slot))?
            .traits
            .clone()
    };
    let name = item.name();
    let verb = if is_of_type(&item, "POTION") { "drink" } else { "eat" };

    if is_of_type(&item, "POISON") {
        take(session, holder, slot)?;
        io.presenter
            .notify(&format!("You {verb} the {name}. It was poisoned!"))
            .await?;
        apply_poison(session, io, &item, consumer, consumer).await?;
        return Ok(());
    }

    let (hit_points, max) = {
        let c = session.world.try_actor(consumer)?;
        (c.hit_points(), c.traits.get("HP_MAX").and_then(TraitValue::as_int))
    };
    let Some(max) = max else {
        tracing::error!(consumer = %consumer, "cannot heal an actor without HP_MAX");
        return Ok(());
    };
    if hit_points > max {
        tracing::error!(consumer = %consumer, hit_points, max, "hit points above maximum");
        return Ok(());
    }

    let effects: Vec<(String, i64)> = item
        .all_traits()
        .into_iter()
        .filter(|(key, _)| key.starts_with(crawl_core::character::EFFECT_PREFIX))
        .filter_map(|(key, value)| value.as_int().map(|v| (key, v)))
        .collect();

    if hit_points == max && effects.is_empty() {
        io.presenter
            .notify(&format!("You are already at full health and keep the {name}."))
            .await?;
        return Ok(());
    }

    take(session, holder, slot)?;
    let gain = match item.get_dice("HP_GAIN") {
        Some(dice) => dice.roll(&mut session.rng).max(0),
        None => 0,
    };
    let healed = session.world.heal(consumer, gain)?;
    let line = if healed > 0 {
        io.presenter.play_sound(SoundCue::Heal).await?;
        format!("You {verb} the {name} and regain {healed} HP.")
    } else if hit_points == max {
        format!("You {verb} the {name}. You were already at full health.")
    } else {
        format!("You {verb} the {name}, but gain nothing from it.")
    };
    io.presenter.notify(&line).await?;

    if !effects.is_empty() {
        let c = session.world.try_actor_mut(consumer)?;
        for (key, value) in &effects {
            c.traits.add_int(key, *value, false);
        }
        io.presenter
            .notify(&format!("You feel the {name} take effect."))
            .await?;
    }
    Ok(())
}

/// Whether `word` appears in the item's `TYPE`.
fn is_of_type(item: &Traits, word: &str) -> bool {
    item.get_text("TYPE")
        .is_some_and(|kind| kind.split_whitespace().any(|w| w == word))
}

fn take(session: &mut GameSession, holder: ActorId, slot: usize) -> Result<()> {
    let actor = session.world.try_actor_mut(holder)?;
    actor.store_mut().take(slot)?;
    Ok(())
}
