//! Menu, start, scene changes and the end of the game.

use super::state::Outcome;
use crate::api::{Collaborators, MainMenuChoice, Result, RuntimeError};
use crate::session::GameSession;

/// Writes the current hero and scene when the session is persistent.
pub fn save(session: &GameSession, io: &Collaborators) -> Result<()> {
    if session.persistent {
        io.persistence.save_game_state(&session.saved_game())?;
    }
    Ok(())
}

pub async fn main_menu(session: &mut GameSession, io: &Collaborators) -> Result<Outcome> {
    let can_continue = io.persistence.has_living_hero();
    let choice = io.dialogs.show_main_menu(can_continue).await?;
    tracing::info!(%choice, can_continue, "main menu");

    match choice {
        MainMenuChoice::Continue if can_continue => {
            session.persistent = true;
        }
        MainMenuChoice::Continue | MainMenuChoice::NewGame => {
            io.persistence.clear_game_state()?;
            session.persistent = true;
        }
        MainMenuChoice::Casual => {
            session.persistent = false;
        }
        MainMenuChoice::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Play)
}

/// Restores the saved game or starts a fresh hero on the first scene.
///
/// Saves whose hero is dead, or that point past the last scene, start over.
pub async fn start(session: &mut GameSession, io: &Collaborators) -> Result<Outcome> {
    session.unload_scene();
    let scenes = session.campaign().scenes.len();

    let saved = if session.persistent {
        io.persistence
            .restore_game_state()?
            .filter(|s| s.hero.alive && s.scene_index < scenes)
    } else {
        None
    };
    match saved {
        Some(saved) => {
            tracing::info!(scene = saved.scene_index, "restoring saved game");
            session.restore(saved);
        }
        None => session.reset_hero(),
    }
    enter_scene(session, io).await
}

async fn enter_scene(session: &mut GameSession, io: &Collaborators) -> Result<Outcome> {
    session.load_scene()?;
    let scene = session
        .current_scene()
        .ok_or(RuntimeError::NoScene)?
        .clone();
    io.presenter.scene_loaded(&scene).await?;
    if let Some(intro) = &scene.intro {
        io.dialogs.show_ok_dialog(&scene.name, intro).await?;
    }
    Ok(Outcome::SceneReady)
}

/// Leaves the current scene for the next, or completes the campaign.
///
/// Transient effects wear off and the hero rests back to full health
/// between scenes.
pub async fn start_next_scene(session: &mut GameSession, io: &Collaborators) -> Result<Outcome> {
    let finished = session.current_scene().map(|s| s.name.clone());
    let has_next = session.has_next_scene();
    session.world.hero_mut().traits.clear_transient_effects();
    session.scene_index += 1;
    session.unload_scene();
    io.presenter.scene_unloaded().await?;
    tracing::info!(scene = ?finished, has_next, "scene completed");

    if !has_next {
        save(session, io)?;
        return Ok(Outcome::CampaignCompleted);
    }

    let next = session
        .current_scene()
        .map(|s| s.name.clone())
        .ok_or(RuntimeError::NoScene)?;
    io.dialogs
        .show_rest_dialog(session.world.hero(), &next)
        .await?;
    let hero = &mut session.world.hero_mut().traits;
    let max = hero.refresh_max_hit_points();
    hero.set("HP", max);

    save(session, io)?;
    enter_scene(session, io).await
}

/// Saves and unloads the scene before showing the menu.
pub async fn leave_to_menu(session: &mut GameSession, io: &Collaborators) -> Result<Outcome> {
    save(session, io)?;
    session.unload_scene();
    io.presenter.scene_unloaded().await?;
    Ok(Outcome::MenuRequested)
}

pub async fn game_over(session: &mut GameSession, io: &Collaborators) -> Result<Outcome> {
    save(session, io)?;
    let name = session.world.hero().name();
    session.unload_scene();
    io.presenter.scene_unloaded().await?;
    io.dialogs
        .show_ok_dialog("Game over", &format!("{name} has fallen."))
        .await?;
    Ok(Outcome::GameEnded)
}

pub async fn game_completed(session: &mut GameSession, io: &Collaborators) -> Result<Outcome> {
    let name = session.world.hero().name();
    io.dialogs
        .show_ok_dialog(
            "Congratulations",
            &format!("{name} has conquered every scene of the campaign."),
        )
        .await?;
    Ok(Outcome::GameEnded)
}
