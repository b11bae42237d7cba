//! Campaign data: actor templates and scene definitions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole, MoveType};
use super::artefact::Artefact;
use super::common::{ActorId, GridPoint};
use super::store::StoreManager;
use crate::character::CharacterTraits;
use crate::interaction::Interaction;
use crate::traits::Traits;

/// Blueprint for spawning an actor.
///
/// `traits` and every entry of `artefacts` are definition strings. Artefacts
/// carrying an `EQUIPPED` flag start equipped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplate {
    pub role: ActorRole,
    pub traits: String,
    #[serde(default)]
    pub position: Option<GridPoint>,
    #[serde(default)]
    pub movement: Option<MoveType>,
    #[serde(default)]
    pub interaction: Option<Interaction>,
    #[serde(default)]
    pub artefacts: Vec<String>,
}

impl ActorTemplate {
    pub fn new(role: ActorRole, traits: impl Into<String>) -> Self {
        Self {
            role,
            traits: traits.into(),
            position: None,
            movement: None,
            interaction: None,
            artefacts: Vec::new(),
        }
    }

    pub fn at(mut self, position: GridPoint) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_artefact(mut self, definition: impl Into<String>) -> Self {
        self.artefacts.push(definition.into());
        self
    }

    pub fn with_movement(mut self, movement: MoveType) -> Self {
        self.movement = Some(movement);
        self
    }

    /// Builds a fresh actor, rolling any dice-valued traits with `rng`.
    pub fn instantiate<R: Rng + ?Sized>(&self, id: ActorId, position: GridPoint, rng: &mut R) -> Actor {
        let traits = CharacterTraits::new(Traits::parse_with_rng(&self.traits, rng));
        let mut actor = Actor::new(id, self.role, traits, position);
        if let Some(movement) = self.movement {
            actor.movement = movement;
        }
        if let Some(interaction) = self.interaction {
            actor.interaction = Some(interaction);
        }

        if !self.artefacts.is_empty() || actor.traits.has("STORAGE") || actor.traits.has("SP") {
            let mut store = StoreManager::for_traits(&actor.traits);
            for definition in &self.artefacts {
                let item = Traits::parse_with_rng(definition, rng);
                let equip = item.get_bool("EQUIPPED");
                let mut artefact = Artefact::new(item);
                artefact.traits.delete("EQUIPPED");
                match store.add(artefact) {
                    Ok(slot) if equip => {
                        if let Err(e) = store.toggle_equip(slot) {
                            tracing::warn!(actor = %actor.name(), "starting equipment rejected: {}", e);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(actor = %actor.name(), "dropping starting artefact: {}", e),
                }
            }
            actor.store = Some(store);
        }

        if matches!(self.role, ActorRole::Hero | ActorRole::Enemy | ActorRole::Trader) {
            actor.refresh_equipment();
            actor.traits.refresh_max_hit_points();
        }
        actor
    }
}

/// One level of the campaign.
///
/// Map rows use `#` for walls, `.` for floor, `E` for the entrance and `X`
/// for the exit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    pub name: String,
    #[serde(default)]
    pub intro: Option<String>,
    pub rows: Vec<String>,
    /// Name of the key artefact that unlocks the exit.
    #[serde(default)]
    pub exit_key: Option<String>,
    #[serde(default)]
    pub actors: Vec<ActorTemplate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub hero: ActorTemplate,
    pub scenes: Vec<SceneDefinition>,
}

impl Campaign {
    pub fn scene(&self, index: usize) -> Option<&SceneDefinition> {
        self.scenes.get(index)
    }
}
