//! The computer's half of a round.

use std::collections::HashSet;

use crawl_core::{ActorId, Interaction};

use super::mover::{ReplayableActorMover, replay_all};
use super::state::Outcome;
use crate::api::{Collaborators, Result};
use crate::interactions::{self, Owner};
use crate::session::GameSession;

/// Runs one computer turn.
///
/// Organic actors first act on whoever shares their tile. In the interacting
/// variant every actor engaged with the hero then enacts its interaction.
/// Then every other living, movable actor moves; organic movers leave a copy
/// behind and mimics catch up with the hero.
pub async fn run(session: &mut GameSession, io: &Collaborators, interacting: bool) -> Result<Outcome> {
    apply_organic_effects(session, io).await?;

    if interacting {
        for id in session.world.engaged_with_hero() {
            interactions::enact(session, io, Owner::Actor(id), ActorId::HERO).await?;
            if !session.world.hero().alive {
                return Ok(Outcome::HeroDied);
            }
        }
    }

    let engaged: HashSet<ActorId> = session
        .world
        .coincident_with(ActorId::HERO)
        .into_iter()
        .collect();
    let max_population = session.config().max_organic_population;

    let mut movers = Vec::new();
    for id in session.world.non_hero_ids() {
        if engaged.contains(&id) {
            continue;
        }
        let (movable, mimic, organic) = match session.world.actor(id) {
            Some(actor) => (actor.is_movable(), actor.is_mimic(), actor.organic),
            None => continue,
        };
        if !movable {
            continue;
        }

        if mimic {
            let hero = session.world.hero().traits.clone();
            let actor = session.world.try_actor_mut(id)?;
            actor.traits.exceed_abilities_and_exp(&hero, 1);
            actor.traits.refresh_max_hit_points();
        }

        let Some(mover) = ReplayableActorMover::plan(session, id)? else {
            continue;
        };
        if organic {
            if let Some(clone) = session.world.clone_organic(id, max_population) {
                tracing::debug!(source = %id, %clone, "organic actor divided");
            }
        }
        mover.apply(session)?;
        movers.push(mover);
    }

    replay_all(&movers, io.presenter.as_ref()).await?;
    tracing::debug!(moved = movers.len(), "computer turn finished");

    if session.world.engaged_with_hero().is_empty() {
        Ok(Outcome::ComputerDone)
    } else {
        Ok(Outcome::ComputerEngaged)
    }
}

/// Every living organic actor enacts its interaction on each living,
/// non-organic actor on its tile.
///
/// The hero is left out: an organic actor on the hero's tile is engaged with
/// the hero and enacts in the interacting step instead.
async fn apply_organic_effects(session: &mut GameSession, io: &Collaborators) -> Result<()> {
    let sources: Vec<ActorId> = session
        .world
        .actors()
        .iter()
        .filter(|a| a.organic && a.alive && !a.is_hero())
        .filter(|a| a.interaction.is_some_and(Interaction::can_enact))
        .map(|a| a.id)
        .collect();

    for source in sources {
        let victims: Vec<ActorId> = session
            .world
            .coincident_with(source)
            .into_iter()
            .filter(|id| *id != ActorId::HERO)
            .filter(|id| session.world.actor(*id).is_some_and(|a| !a.organic))
            .collect();
        for victim in victims {
            if !session.world.actor(source).is_some_and(|a| a.alive) {
                break;
            }
            tracing::debug!(%source, %victim, "organic effect");
            interactions::enact(session, io, Owner::Actor(source), victim).await?;
        }
    }
    Ok(())
}
