//! Props, hidden artefacts and corpses.

use crawl_core::{ActorId, ActorRole, Interaction};

use super::has_room;
use crate::api::{ArtefactChoice, Collaborators, Result, SoundCue};
use crate::session::GameSession;

/// Reveals whatever the owner holds.
///
/// The owner is spent afterwards. Anything the finder leaves behind stays in
/// the owner's store and can be picked over like a corpse.
pub(super) async fn find_artefact(
    session: &mut GameSession,
    io: &Collaborators,
    owner: ActorId,
    finder: ActorId,
) -> Result<()> {
    let (name, role, engraving) = {
        let actor = session.world.try_actor_mut(owner)?;
        actor.alive = false;
        actor.interaction = Some(Interaction::InteractWithCorpse);
        (actor.name(), actor.role, actor.traits.get_text("ENGRAVING"))
    };
    io.presenter.play_sound(SoundCue::Discovery).await?;

    match (role, engraving) {
        (_, Some(text)) => io.dialogs.show_ok_dialog(&name, &text).await?,
        (ActorRole::HiddenArtefact, None) => {
            io.presenter.notify("You found something hidden!").await?
        }
        _ => io.presenter.notify(&format!("You search the {name}.")).await?,
    }

    loop {
        let next = session
            .world
            .try_actor(owner)?
            .store
            .as_ref()
            .and_then(|s| s.get(0).cloned());
        let Some(artefact) = next else {
            break;
        };

        let title = format!("You found {}", artefact.name());
        match io.dialogs.show_artefact_dialog(&title, &artefact).await? {
            ArtefactChoice::Take => {
                if !has_room(session, io, finder, &artefact.name()).await? {
                    break;
                }
                transfer(session, owner, finder, 0)?;
                io.presenter
                    .notify(&format!("You take the {}.", artefact.name()))
                    .await?;
            }
            ArtefactChoice::Leave => break,
        }
    }

    let money = take_money(session, owner, finder)?;
    if money > 0 {
        io.presenter.notify(&format!("You find {money} SP.")).await?;
    }
    Ok(())
}

/// Lets the looter pick over a corpse.
pub(super) async fn pillage(
    session: &mut GameSession,
    io: &Collaborators,
    corpse: ActorId,
    looter: ActorId,
) -> Result<()> {
    let money = take_money(session, corpse, looter)?;
    if money > 0 {
        io.presenter.notify(&format!("You find {money} SP.")).await?;
    }

    let free_space = {
        let actor = session.world.try_actor_mut(looter)?;
        actor.store_mut().free_space()
    };
    let mut slots = {
        let body = session.world.try_actor(corpse)?;
        if body.store.as_ref().is_none_or(|s| s.is_empty()) {
            io.presenter
                .notify(&format!("The {} has nothing left.", body.name()))
                .await?;
            return Ok(());
        }
        io.dialogs.show_pillage_dialog(body, free_space).await?
    };

    slots.sort_unstable_by(|a, b| b.cmp(a));
    slots.dedup();
    for slot in slots {
        let name = session
            .world
            .try_actor(corpse)?
            .store
            .as_ref()
            .and_then(|s| s.get(slot))
            .map(|a| a.name());
        let Some(name) = name else {
            tracing::warn!(slot, "pillage dialog returned an empty slot");
            continue;
        };
        if !has_room(session, io, looter, &name).await? {
            break;
        }
        transfer(session, corpse, looter, slot)?;
        io.presenter.notify(&format!("You take the {name}.")).await?;
    }
    Ok(())
}

fn transfer(session: &mut GameSession, from: ActorId, to: ActorId, slot: usize) -> Result<()> {
    let (source, target) = session
        .world
        .pair_mut(from, to)
        .ok_or(crawl_core::WorldError::ActorNotFound(from))?;
    let artefact = source.store_mut().take(slot)?;
    target.store_mut().add(artefact)?;
    target.refresh_equipment();
    Ok(())
}

fn take_money(session: &mut GameSession, from: ActorId, to: ActorId) -> Result<i64> {
    let (source, target) = session
        .world
        .pair_mut(from, to)
        .ok_or(crawl_core::WorldError::ActorNotFound(from))?;
    let Some(store) = source.store.as_mut() else {
        return Ok(0);
    };
    let money = store.money();
    if money > 0 {
        store.debit(money)?;
        target.store_mut().credit(money);
    }
    Ok(money)
}
