//! The hero's half of a round.

use crawl_core::{ActorId, GridPoint, Interaction};

use super::event::TurnEvent;
use super::lifecycle;
use super::state::{Outcome, TurnState};
use crate::api::{Collaborators, Result, RuntimeError, SoundCue};
use crate::interactions::{self, Owner, apply_toxic_effect};
use crate::map::TileMap;
use crate::session::GameSession;

const INTERACT: &str = "Interact";
const MOVE: &str = "Move here";
const DETAILS: &str = "Details";
const CANCEL: &str = "Cancel";

/// Prepares a hero turn: lingering poison, then the reachable tiles.
///
/// A hero who broke away from a fight keeps disengaging through the idle turn
/// that follows, so hunters hold back on the next computer turn.
pub async fn begin_turn(session: &mut GameSession, io: &Collaborators, after_fight: bool) -> Result<Outcome> {
    if !after_fight {
        session.hero_disengaging = false;
    }
    apply_toxic_effect(session, io, ActorId::HERO).await?;
    if !session.world.hero().alive {
        return Ok(Outcome::HeroDied);
    }
    session.refresh_hero_routes()?;
    Ok(Outcome::Stay)
}

pub async fn handle(
    session: &mut GameSession,
    io: &Collaborators,
    state: TurnState,
    event: TurnEvent,
) -> Result<Outcome> {
    match event {
        TurnEvent::ClickedFreeGround(point) => click_ground(session, io, state, point).await,
        TurnEvent::ClickedEntrance(_) => {
            io.dialogs
                .show_ok_dialog("Entrance", "The way back is barred. The only way is onward.")
                .await?;
            Ok(Outcome::Stay)
        }
        TurnEvent::ClickedExit(point) => leave_scene(session, io, point).await,
        TurnEvent::UseArtefact(slot) => use_artefact(session, io, slot).await,
        TurnEvent::ToggleEquip(slot) => toggle_equip(session, io, slot).await,
        TurnEvent::MainMenu => lifecycle::leave_to_menu(session, io).await,
    }
}

/// How the hero's action left things.
fn finish_action(session: &GameSession) -> Outcome {
    if !session.world.hero().alive {
        Outcome::HeroDied
    } else if session.world.engaged_with_hero().is_empty() {
        Outcome::HeroActed
    } else {
        Outcome::HeroEngaged
    }
}

// ============================================================================
// Ground clicks
// ============================================================================

async fn click_ground(
    session: &mut GameSession,
    io: &Collaborators,
    state: TurnState,
    point: GridPoint,
) -> Result<Outcome> {
    let discoverable = session
        .world
        .actors_at(point)
        .into_iter()
        .find(|id| session.world.actor(*id).is_some_and(|a| a.has_discoveries()));

    let Some(occupant) = discoverable else {
        return move_hero(session, io, state, point).await;
    };

    let hero_at = session.world.hero().position;
    let mut options = Vec::new();
    if hero_at.is_within_reach(point) {
        options.push(INTERACT);
    }
    if session.hero_routes.contains_key(&point) {
        options.push(MOVE);
    }
    options.push(DETAILS);
    options.push(CANCEL);

    let name = session.world.try_actor(occupant)?.name();
    let labels: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    let picked = io
        .dialogs
        .show_choice_dialog(&name, "What would you like to do?", &labels)
        .await?;

    match options.get(picked).copied() {
        Some(INTERACT) => {
            interactions::react(session, io, Owner::Actor(occupant), ActorId::HERO).await?;
            Ok(finish_action(session))
        }
        Some(MOVE) => move_hero(session, io, state, point).await,
        Some(DETAILS) => {
            let actor = session.world.try_actor(occupant)?;
            io.dialogs.show_actor_details_dialog(actor).await?;
            Ok(Outcome::Stay)
        }
        _ => Ok(Outcome::Stay),
    }
}

/// Walks the hero along a precomputed route.
///
/// Moving off a fight within the disengage radius makes hunters hold back
/// for the next computer turn.
async fn move_hero(
    session: &mut GameSession,
    io: &Collaborators,
    state: TurnState,
    point: GridPoint,
) -> Result<Outcome> {
    let Some(route) = session.hero_routes.get(&point).cloned() else {
        io.presenter.notify("You cannot reach that spot this turn.").await?;
        return Ok(Outcome::Stay);
    };

    if state == TurnState::HeroTurnInteracting {
        let in_fight = session.world.engaged_with_hero().into_iter().any(|id| {
            session
                .world
                .actor(id)
                .and_then(|a| a.interaction)
                .is_some_and(Interaction::respect_disengage)
        });
        if in_fight && route.len() as i64 <= session.config().disengage_radius {
            session.hero_disengaging = true;
            io.presenter.notify("You break away from the fight.").await?;
        }
    }

    session.world.hero_mut().position = point;
    io.presenter.replay_route(ActorId::HERO, &route).await?;
    io.presenter.play_sound(SoundCue::Footsteps).await?;
    Ok(finish_action(session))
}

// ============================================================================
// Doors
// ============================================================================

/// Walks onto the exit and moves on, if the hero can reach it this turn and
/// holds the key the scene needs.
async fn leave_scene(session: &mut GameSession, io: &Collaborators, point: GridPoint) -> Result<Outcome> {
    let is_exit = session.map()?.exit() == point;
    let route = session
        .hero_routes
        .get(&point)
        .filter(|_| is_exit && session.reachable_doors().contains(&point))
        .cloned();
    let Some(route) = route else {
        io.presenter.notify("The exit is out of reach.").await?;
        return Ok(Outcome::Stay);
    };

    let key = session
        .current_scene()
        .ok_or(RuntimeError::NoScene)?
        .exit_key
        .clone();

    if let Some(key) = key {
        let hero = session.world.hero_mut();
        let held = hero.store.as_mut().and_then(|s| s.take_by_name(&key));
        if held.is_none() {
            io.presenter.play_sound(SoundCue::Locked).await?;
            io.dialogs
                .show_ok_dialog("Locked", &format!("The exit is locked. You need the {key}."))
                .await?;
            return Ok(Outcome::Stay);
        }
        io.presenter.play_sound(SoundCue::Unlocked).await?;
        io.presenter
            .notify(&format!("You unlock the exit with the {key}."))
            .await?;
    }

    session.world.hero_mut().position = point;
    io.presenter.replay_route(ActorId::HERO, &route).await?;
    lifecycle::start_next_scene(session, io).await
}

// ============================================================================
// Inventory
// ============================================================================

async fn use_artefact(session: &mut GameSession, io: &Collaborators, slot: usize) -> Result<Outcome> {
    let found = session
        .world
        .hero()
        .store
        .as_ref()
        .and_then(|s| s.get(slot))
        .map(|a| (a.name(), a.interaction, a.equipped));
    let Some((name, interaction, prepared)) = found else {
        io.presenter.notify("There is nothing in that slot.").await?;
        return Ok(Outcome::Stay);
    };

    match interaction {
        Some(Interaction::ConsumeFood) => {}
        Some(Interaction::CastSpell) if prepared => {}
        Some(Interaction::CastSpell) => {
            io.dialogs
                .show_ok_dialog("Not prepared", &format!("Prepare {name} before casting it."))
                .await?;
            return Ok(Outcome::Stay);
        }
        _ => {
            io.dialogs
                .show_ok_dialog(&name, "You cannot use that here.")
                .await?;
            return Ok(Outcome::Stay);
        }
    }

    let owner = Owner::Artefact {
        holder: ActorId::HERO,
        slot,
    };
    interactions::react(session, io, owner, ActorId::HERO).await?;
    Ok(finish_action(session))
}

/// Equipping is free; it never ends the turn.
async fn toggle_equip(session: &mut GameSession, io: &Collaborators, slot: usize) -> Result<Outcome> {
    let hero = session.world.hero_mut();
    let toggled = hero.store_mut().toggle_equip(slot);
    let name = hero
        .store
        .as_ref()
        .and_then(|s| s.get(slot))
        .map(|a| a.name())
        .unwrap_or_default();

    match toggled {
        Ok(equipped) => {
            hero.refresh_equipment();
            let line = if equipped {
                format!("You ready the {name}.")
            } else {
                format!("You put away the {name}.")
            };
            io.presenter.notify(&line).await?;
        }
        Err(e) => {
            io.dialogs.show_ok_dialog("Cannot equip", &e.to_string()).await?;
        }
    }
    Ok(Outcome::Stay)
}
