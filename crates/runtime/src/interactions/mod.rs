//! Interaction handlers.
//!
//! Every interaction has an owner: an actor on the grid or an artefact in
//! somebody's store. The other party is the hero in every case this game
//! produces, but handlers take it by id.
//!
//! # Architecture
//!
//! - [`enact`]: the owner starts the interaction (an enemy attacking or poisoning)
//! - [`react`]: the other party starts it (the hero clicking or using an item)
//!
//! Each direction checks [`Interaction::can_enact`] / [`Interaction::can_react`]
//! and fails with [`RuntimeError::UnsupportedInteraction`] otherwise.

mod consumables;
mod discovery;
mod fight;
mod spells;
mod trade;

use crawl_core::{ActorId, Interaction};

use crate::api::{Collaborators, Direction, Result, RuntimeError};
use crate::session::GameSession;

pub use consumables::{TOXIC_DAMAGE, TOXIC_TURNS, apply_toxic_effect};
pub use fight::resolve_fight;

/// Who holds an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Actor(ActorId),
    Artefact { holder: ActorId, slot: usize },
}

impl Owner {
    /// Looks up the interaction the owner carries.
    pub fn interaction(self, session: &GameSession) -> Result<Interaction> {
        match self {
            Self::Actor(id) => {
                let actor = session.world.try_actor(id)?;
                actor
                    .interaction
                    .ok_or_else(|| RuntimeError::NoInteraction(actor.name()))
            }
            Self::Artefact { holder, slot } => {
                let actor = session.world.try_actor(holder)?;
                let artefact = actor
                    .store
                    .as_ref()
                    .and_then(|s| s.get(slot))
                    .ok_or(crawl_core::StoreError::SlotOutOfRange(slot))?;
                artefact
                    .interaction
                    .ok_or_else(|| RuntimeError::NoInteraction(artefact.name()))
            }
        }
    }

    fn actor(self, interaction: Interaction, direction: Direction) -> Result<ActorId> {
        match self {
            Self::Actor(id) => Ok(id),
            Self::Artefact { .. } => Err(RuntimeError::UnsupportedInteraction {
                interaction,
                direction,
            }),
        }
    }

    fn artefact(self, interaction: Interaction, direction: Direction) -> Result<(ActorId, usize)> {
        match self {
            Self::Artefact { holder, slot } => Ok((holder, slot)),
            Self::Actor(_) => Err(RuntimeError::UnsupportedInteraction {
                interaction,
                direction,
            }),
        }
    }
}

/// The owner acts on `reactor`.
pub async fn enact(
    session: &mut GameSession,
    io: &Collaborators,
    owner: Owner,
    reactor: ActorId,
) -> Result<()> {
    let interaction = owner.interaction(session)?;
    if !interaction.can_enact() {
        return Err(RuntimeError::UnsupportedInteraction {
            interaction,
            direction: Direction::Enact,
        });
    }
    tracing::debug!(?owner, %reactor, %interaction, "enact");

    match interaction {
        Interaction::Fight => {
            let attacker = owner.actor(interaction, Direction::Enact)?;
            fight::resolve_fight(session, io, attacker, reactor).await
        }
        Interaction::Poison => {
            let poisoner = owner.actor(interaction, Direction::Enact)?;
            consumables::poison(session, io, poisoner, reactor).await
        }
        _ => Err(RuntimeError::UnsupportedInteraction {
            interaction,
            direction: Direction::Enact,
        }),
    }
}

/// `enactor` acts on the owner.
pub async fn react(
    session: &mut GameSession,
    io: &Collaborators,
    owner: Owner,
    enactor: ActorId,
) -> Result<()> {
    let interaction = owner.interaction(session)?;
    if !interaction.can_react() {
        return Err(RuntimeError::UnsupportedInteraction {
            interaction,
            direction: Direction::React,
        });
    }
    tracing::debug!(?owner, %enactor, %interaction, "react");

    match interaction {
        Interaction::Fight => {
            let defender = owner.actor(interaction, Direction::React)?;
            fight::resolve_fight(session, io, enactor, defender).await
        }
        Interaction::Trade => {
            let trader = owner.actor(interaction, Direction::React)?;
            trade::trade(session, io, trader, enactor).await
        }
        Interaction::FindArtefact => {
            let finding = owner.actor(interaction, Direction::React)?;
            discovery::find_artefact(session, io, finding, enactor).await
        }
        Interaction::InteractWithCorpse => {
            let corpse = owner.actor(interaction, Direction::React)?;
            discovery::pillage(session, io, corpse, enactor).await
        }
        Interaction::ConsumeFood => {
            let (holder, slot) = owner.artefact(interaction, Direction::React)?;
            consumables::consume(session, io, holder, slot, enactor).await
        }
        Interaction::CastSpell => {
            let (holder, slot) = owner.artefact(interaction, Direction::React)?;
            spells::cast(session, io, holder, slot, enactor).await
        }
        Interaction::Poison => Err(RuntimeError::UnsupportedInteraction {
            interaction,
            direction: Direction::React,
        }),
    }
}

/// Whether `receiver` can carry one more artefact, telling the player when not.
async fn has_room(
    session: &mut GameSession,
    io: &Collaborators,
    receiver: ActorId,
    name: &str,
) -> Result<bool> {
    let actor = session.world.try_actor_mut(receiver)?;
    if !actor.store_mut().is_full() {
        return Ok(true);
    }
    io.dialogs
        .show_ok_dialog("No storage space", &format!("You have no room for the {name}."))
        .await?;
    Ok(false)
}
