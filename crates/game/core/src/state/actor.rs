//! Actors placed on the scene grid.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::common::{ActorId, GridPoint};
use super::store::StoreManager;
use crate::character::CharacterTraits;
use crate::interaction::Interaction;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum ActorRole {
    Hero,
    Enemy,
    Trader,
    /// Scenery with something engraved or stored in it.
    Prop,
    /// An artefact lying on the ground, found by walking up to it.
    HiddenArtefact,
}

impl ActorRole {
    /// Roles that never take damage.
    pub const fn is_inanimate(self) -> bool {
        matches!(self, Self::Prop | Self::HiddenArtefact)
    }
}

/// How an actor moves during the computer turn.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum MoveType {
    /// Closes in on the hero when near enough.
    Hunt,
    /// Random walk.
    Wander,
    #[default]
    Still,
}

impl MoveType {
    pub fn for_role(role: ActorRole) -> Self {
        match role {
            ActorRole::Enemy => Self::Hunt,
            _ => Self::Still,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: ActorRole,
    pub traits: CharacterTraits,
    pub position: GridPoint,
    pub alive: bool,
    pub movement: MoveType,
    /// Organic actors leave a copy of themselves behind when they move.
    #[serde(default)]
    pub organic: bool,
    #[serde(default)]
    pub store: Option<StoreManager>,
    #[serde(default)]
    pub interaction: Option<Interaction>,
}

impl Actor {
    pub fn new(id: ActorId, role: ActorRole, traits: CharacterTraits, position: GridPoint) -> Self {
        let organic = traits.get_bool("ORGANIC");
        Self {
            id,
            role,
            traits,
            position,
            alive: true,
            movement: MoveType::for_role(role),
            organic,
            store: None,
            interaction: Interaction::for_role(role),
        }
    }

    pub fn name(&self) -> String {
        self.traits.name()
    }

    pub fn is_hero(&self) -> bool {
        self.role == ActorRole::Hero
    }

    /// Mimics copy the hero's abilities whenever they move.
    pub fn is_mimic(&self) -> bool {
        self.traits.get_bool("MIMIC")
    }

    pub fn hit_points(&self) -> i64 {
        self.traits.get_int("HP")
    }

    /// Whether clicking on this actor offers more than its details.
    pub fn has_discoveries(&self) -> bool {
        match self.interaction {
            Some(Interaction::InteractWithCorpse) => {
                self.store.as_ref().is_some_and(|s| !s.is_empty())
            }
            Some(interaction) => self.alive && interaction.can_react(),
            None => false,
        }
    }

    /// Whether the computer turn may move this actor.
    pub fn is_movable(&self) -> bool {
        self.alive && !self.is_hero() && self.movement != MoveType::Still
    }

    /// Reapplies the equipped store contents to the traits.
    pub fn refresh_equipment(&mut self) {
        if let Some(store) = self.store.as_ref() {
            let equipment = store.equipment();
            self.traits.utilise_additional_traits(&equipment);
        }
    }

    pub fn store_mut(&mut self) -> &mut StoreManager {
        let traits = &self.traits;
        self.store
            .get_or_insert_with(|| StoreManager::for_traits(traits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Artefact;

    fn actor(role: ActorRole, def: &str) -> Actor {
        Actor::new(ActorId(1), role, CharacterTraits::parse(def), GridPoint::ORIGIN)
    }

    #[test]
    fn role_defaults() {
        let goblin = actor(ActorRole::Enemy, "NAME:Goblin, ORGANIC");
        assert_eq!(goblin.movement, MoveType::Hunt);
        assert_eq!(goblin.interaction, Some(Interaction::Fight));
        assert!(goblin.organic);
        assert!(goblin.is_movable());

        let statue = actor(ActorRole::Prop, "NAME:Statue, ENGRAVING:Beware");
        assert!(!statue.is_movable());
        assert!(statue.has_discoveries());
    }

    #[test]
    fn corpses_are_interesting_only_while_stocked() {
        let mut corpse = actor(ActorRole::Enemy, "NAME:Orc");
        corpse.alive = false;
        corpse.interaction = Some(Interaction::InteractWithCorpse);
        assert!(!corpse.has_discoveries());

        corpse.store_mut().add(Artefact::parse("NAME:Coin")).unwrap();
        assert!(corpse.has_discoveries());
    }

    #[test]
    fn equipment_refresh_updates_armour_class() {
        let mut hero = actor(ActorRole::Hero, "NAME:Ann, DEX:14");
        let store = hero.store_mut();
        store.add(Artefact::parse("NAME:Shield, KIND:SHIELD, AC_BONUS:2")).unwrap();
        store.toggle_equip(0).unwrap();
        hero.refresh_equipment();
        assert_eq!(hero.traits.armour_class(), 14);
    }
}
