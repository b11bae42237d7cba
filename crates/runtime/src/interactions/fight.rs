//! Melee between two actors.

use crawl_core::combat::{AttackRoll, melee_exchange};
use crawl_core::{ActorId, DamageOutcome, ExperienceDelta};

use crate::api::{Collaborators, Result, SoundCue};
use crate::session::GameSession;

/// Runs one exchange of `attacker` against `defender` and applies the damage.
pub async fn resolve_fight(
    session: &mut GameSession,
    io: &Collaborators,
    attacker: ActorId,
    defender: ActorId,
) -> Result<()> {
    let (exchange, attacker_name, defender_name, from, to) = {
        let a = session.world.try_actor(attacker)?;
        let d = session.world.try_actor(defender)?;
        if !a.alive || !d.alive {
            tracing::debug!(%attacker, %defender, "fight with a dead party skipped");
            return Ok(());
        }
        let exchange = melee_exchange(&a.traits, &d.traits, &mut session.rng);
        (exchange, a.name(), d.name(), a.position, d.position)
    };

    io.presenter.animate_attack(attacker, from, to).await?;

    for attack in &exchange.attacks {
        let line = match attack.roll {
            AttackRoll::Critical => format!(
                "{attacker_name} lands a critical {} on {defender_name} for {} damage!",
                attack.attack_name, attack.damage
            ),
            AttackRoll::Hit => format!(
                "{attacker_name} hits {defender_name} with {} for {} damage.",
                attack.attack_name, attack.damage
            ),
            AttackRoll::Miss => format!("{attacker_name} misses {defender_name}."),
            AttackRoll::Fumble => format!("{attacker_name} fumbles the {}.", attack.attack_name),
        };
        io.presenter.notify(&line).await?;
    }

    if !exchange.any_hit() {
        io.presenter.play_sound(SoundCue::Miss).await?;
        return Ok(());
    }
    io.presenter.play_sound(SoundCue::Hit).await?;

    let total = exchange.total_damage();
    match session.world.apply_damage(attacker, defender, total) {
        DamageOutcome::Killed { experience } => {
            announce_kill(io, &defender_name, experience).await?;
        }
        DamageOutcome::Wounded { hit_points } => {
            tracing::debug!(%defender, hit_points, "wounded");
        }
        DamageOutcome::Ignored => {}
    }
    Ok(())
}

/// Death sound and message, then the hero's experience and any level up.
pub(super) async fn announce_kill(
    io: &Collaborators,
    defender_name: &str,
    experience: Option<ExperienceDelta>,
) -> Result<()> {
    io.presenter.play_sound(SoundCue::Death).await?;
    io.presenter
        .notify(&format!("{defender_name} is killed."))
        .await?;
    let Some(delta) = experience else {
        return Ok(());
    };
    io.presenter
        .notify(&format!("You gain {} experience.", delta.exp.now - delta.exp.was))
        .await?;
    if delta.levelled_up() {
        io.presenter.play_sound(SoundCue::LevelUp).await?;
        io.dialogs
            .show_ok_dialog(
                "Level up",
                &format!("You have reached level {}.", delta.level.now),
            )
            .await?;
    }
    Ok(())
}
