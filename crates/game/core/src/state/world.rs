//! The actors of the current scene.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole, MoveType};
use super::common::{ActorId, GridPoint};
use super::template::ActorTemplate;
use crate::character::ExperienceDelta;
use crate::error::WorldError;
use crate::interaction::Interaction;

/// Result of applying damage to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The defender cannot be damaged: already dead, a prop or a hidden artefact.
    Ignored,
    Wounded { hit_points: i64 },
    /// `experience` is set when the hero landed the blow.
    Killed { experience: Option<ExperienceDelta> },
}

/// Owns the hero and every actor of the loaded scene.
///
/// The hero always lives at index zero with [`ActorId::HERO`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    actors: Vec<Actor>,
    next_id: u32,
}

impl World {
    pub fn new(mut hero: Actor) -> Self {
        hero.id = ActorId::HERO;
        hero.role = ActorRole::Hero;
        Self {
            actors: vec![hero],
            next_id: 1,
        }
    }

    pub fn hero(&self) -> &Actor {
        &self.actors[0]
    }

    pub fn hero_mut(&mut self) -> &mut Actor {
        &mut self.actors[0]
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Ids of every actor except the hero, in spawn order.
    pub fn non_hero_ids(&self) -> Vec<ActorId> {
        self.actors.iter().skip(1).map(|a| a.id).collect()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn try_actor(&self, id: ActorId) -> Result<&Actor, WorldError> {
        self.actor(id).ok_or(WorldError::ActorNotFound(id))
    }

    pub fn try_actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, WorldError> {
        self.actor_mut(id).ok_or(WorldError::ActorNotFound(id))
    }

    fn index_of(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id)
    }

    /// Mutable access to two distinct actors at once.
    pub fn pair_mut(&mut self, a: ActorId, b: ActorId) -> Option<(&mut Actor, &mut Actor)> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.actors.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.actors.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    fn allocate_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        template: &ActorTemplate,
        position: GridPoint,
        rng: &mut R,
    ) -> ActorId {
        let id = self.allocate_id();
        let actor = template.instantiate(id, position, rng);
        tracing::debug!(%id, name = %actor.name(), role = %actor.role, %position, "spawned actor");
        self.actors.push(actor);
        id
    }

    /// Number of organic actors still alive.
    pub fn organic_population(&self) -> usize {
        self.actors.iter().filter(|a| a.organic && a.alive).count()
    }

    /// Leaves a frozen copy of `id` on its current tile.
    ///
    /// Returns `None` once `max_population` organic actors are alive.
    pub fn clone_organic(&mut self, id: ActorId, max_population: usize) -> Option<ActorId> {
        if self.organic_population() >= max_population {
            return None;
        }
        let source = self.actor(id).filter(|a| a.organic && a.alive)?.clone();
        let clone_id = self.allocate_id();
        let mut clone = source;
        clone.id = clone_id;
        clone.movement = MoveType::Still;
        clone.store = None;
        tracing::debug!(source = %id, clone = %clone_id, position = %clone.position, "organic clone");
        self.actors.push(clone);
        Some(clone_id)
    }

    /// Removes everyone but the hero.
    pub fn unload_scene(&mut self) {
        self.actors.truncate(1);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Non-hero actors standing on `point`, dead or alive.
    pub fn actors_at(&self, point: GridPoint) -> Vec<ActorId> {
        self.actors
            .iter()
            .skip(1)
            .filter(|a| a.position == point)
            .map(|a| a.id)
            .collect()
    }

    pub fn living_actor_at(&self, point: GridPoint) -> Option<ActorId> {
        self.actors
            .iter()
            .skip(1)
            .find(|a| a.alive && a.position == point)
            .map(|a| a.id)
    }

    /// Living actors sharing a tile with `id`.
    pub fn coincident_with(&self, id: ActorId) -> Vec<ActorId> {
        let Some(anchor) = self.actor(id) else {
            return Vec::new();
        };
        self.actors
            .iter()
            .filter(|a| a.id != id && a.alive && a.position == anchor.position)
            .map(|a| a.id)
            .collect()
    }

    /// Living actors on the hero's tile with an interaction they can enact.
    pub fn engaged_with_hero(&self) -> Vec<ActorId> {
        self.coincident_with(ActorId::HERO)
            .into_iter()
            .filter(|id| {
                self.actor(*id)
                    .and_then(|a| a.interaction)
                    .is_some_and(Interaction::can_enact)
            })
            .collect()
    }

    /// Tiles blocked by living non-hero actors.
    pub fn occupied_tiles(&self) -> Vec<GridPoint> {
        self.actors
            .iter()
            .skip(1)
            .filter(|a| a.alive && !a.role.is_inanimate())
            .map(|a| a.position)
            .collect()
    }

    // ========================================================================
    // Damage
    // ========================================================================

    /// Removes `amount` hit points from `defender`.
    ///
    /// A killing blow turns the defender into a corpse; when the hero dealt it
    /// the hero gains experience and, on levelling up, new maximum hit points.
    pub fn apply_damage(&mut self, attacker: ActorId, defender: ActorId, amount: i64) -> DamageOutcome {
        let Some(target) = self.actor_mut(defender) else {
            tracing::error!(%defender, "damage applied to missing actor");
            return DamageOutcome::Ignored;
        };
        if !target.alive || target.role.is_inanimate() {
            return DamageOutcome::Ignored;
        }

        let hit_points = target.traits.add_int("HP", -amount.max(0), true);
        if hit_points > 0 {
            return DamageOutcome::Wounded { hit_points };
        }

        target.alive = false;
        if !target.is_hero() {
            target.interaction = Some(Interaction::InteractWithCorpse);
            target.movement = MoveType::Still;
        }
        tracing::info!(%attacker, %defender, name = %target.name(), "actor killed");

        let experience = if attacker.is_hero() && !defender.is_hero() {
            let defeated = target.traits.clone();
            let hero = &mut self.hero_mut().traits;
            let delta = hero.adjust_for_defeat_of_actor(&defeated);
            if delta.levelled_up() {
                hero.refresh_max_hit_points();
            }
            Some(delta)
        } else {
            None
        };
        DamageOutcome::Killed { experience }
    }

    /// Restores hit points up to `HP_MAX`. Returns the amount gained.
    pub fn heal(&mut self, id: ActorId, amount: i64) -> Result<i64, WorldError> {
        let actor = self.try_actor_mut(id)?;
        let max = actor.traits.get_int("HP_MAX");
        let current = actor.hit_points();
        let gain = amount.max(0).min((max - current).max(0));
        actor.traits.add_int("HP", gain, true);
        Ok(gain)
    }
}
