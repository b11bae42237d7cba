//! Casting prepared spells.

use std::collections::HashSet;

use crawl_core::combat::spell_damage;
use crawl_core::{ActorId, ActorRole, DamageOutcome, GridPoint, MagicTraits};

use super::fight::announce_kill;
use crate::api::{Collaborators, Result, SoundCue};
use crate::map::RouteFinder;
use crate::session::GameSession;

/// Casts the spell in `holder`'s `slot`.
///
/// Healing lands on the caster. Damage radiates from the caster's tile out
/// across open ground to the spell's range, nearest targets first, up to its target count. The
/// spell must be prepared again afterwards.
pub(super) async fn cast(
    session: &mut GameSession,
    io: &Collaborators,
    holder: ActorId,
    slot: usize,
    caster: ActorId,
) -> Result<()> {
    let spell: MagicTraits = {
        let store = session.world.try_actor_mut(holder)?.store_mut();
        let artefact = store
            .get_mut(slot)
            .ok_or(crawl_core::StoreError::SlotOutOfRange(slot))?;
        artefact.equipped = false;
        artefact.magic_traits()
    };
    let (level, origin) = {
        let c = session.world.try_actor(caster)?;
        (c.traits.character_level(), c.position)
    };
    let name = spell.name();
    io.presenter.play_sound(SoundCue::Spell).await?;
    io.presenter.notify(&format!("You cast {name}.")).await?;

    let mut had_effect = false;

    if let Some(dice) = spell.healing_dice(level) {
        had_effect = true;
        let rolled = dice.roll(&mut session.rng).max(0);
        let healed = session.world.heal(caster, rolled)?;
        io.presenter.play_sound(SoundCue::Heal).await?;
        io.presenter
            .notify(&format!("{name} restores {healed} HP."))
            .await?;
    }

    if spell.damage_dice(level).is_some() {
        had_effect = true;
        let targets = targets_in_range(session, caster, origin, &spell)?;
        if targets.is_empty() {
            io.presenter.notify(&format!("{name} hits nothing.")).await?;
        }
        for (target, position) in targets {
            let (outcome, target_name) = {
                let c = session.world.try_actor(caster)?;
                let t = session.world.try_actor(target)?;
                (
                    spell_damage(&spell, &c.traits, &t.traits, &mut session.rng),
                    t.name(),
                )
            };
            io.presenter.animate_attack(caster, origin, position).await?;
            let saved = outcome.save.is_some_and(|s| s.succeeded());
            let line = if saved {
                format!("{target_name} partly resists and takes {} damage.", outcome.damage)
            } else {
                format!("{target_name} takes {} damage.", outcome.damage)
            };
            io.presenter.notify(&line).await?;
            if let DamageOutcome::Killed { experience } =
                session.world.apply_damage(caster, target, outcome.damage)
            {
                announce_kill(io, &target_name, experience).await?;
            }
        }
    }

    if !had_effect {
        io.presenter.notify("Nothing happens.").await?;
    }
    Ok(())
}

/// Living enemies and traders within range, nearest first.
///
/// The spell spreads over walkable tiles only, so walls stop it. Actors do
/// not block it.
fn targets_in_range(
    session: &GameSession,
    caster: ActorId,
    origin: GridPoint,
    spell: &MagicTraits,
) -> Result<Vec<(ActorId, GridPoint)>> {
    let range = spell.range_in_tiles().max(0) as usize;
    let spread = session.map()?.reachable(origin, range, &HashSet::new());
    let distance = |position: GridPoint| {
        if position == origin {
            Some(0)
        } else {
            spread.get(&position).map(Vec::len)
        }
    };

    let mut candidates: Vec<(usize, ActorId, GridPoint)> = session
        .world
        .actors()
        .iter()
        .filter(|a| a.id != caster && a.alive)
        .filter(|a| matches!(a.role, ActorRole::Enemy | ActorRole::Trader))
        .filter_map(|a| distance(a.position).map(|d| (d, a.id, a.position)))
        .collect();
    candidates.sort_by_key(|(distance, _, _)| *distance);
    Ok(candidates
        .into_iter()
        .take(spell.max_targets())
        .map(|(_, id, position)| (id, position))
        .collect())
}
