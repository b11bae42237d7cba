//! Computer-controlled movement.
//!
//! Moves are planned and applied to the world one actor at a time, so each
//! plan sees where the previous movers ended up. The presenter replays the
//! recorded routes afterwards, all at once.

use futures_util::future::join_all;
use rand::seq::SliceRandom;

use crawl_core::{ActorId, GridPoint, MoveType};

use crate::api::{Presenter, Result};
use crate::map::{Route, RouteFinder, Tile, TileMap};
use crate::session::GameSession;

/// A planned move that can be applied now and animated later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayableActorMover {
    pub actor: ActorId,
    pub from: GridPoint,
    pub route: Route,
}

impl ReplayableActorMover {
    /// Plans this turn's move for `id`, if it moves at all.
    ///
    /// Hunters close in on the hero when within
    /// `max_tiles_per_move * hunting_factor` (Manhattan) and the hero is not
    /// disengaging; otherwise they hold still. Wanderers take random steps
    /// across open floor.
    pub fn plan(session: &mut GameSession, id: ActorId) -> Result<Option<Self>> {
        let actor = session.world.try_actor(id)?;
        if !actor.is_movable() {
            return Ok(None);
        }
        let from = actor.position;
        let steps = actor.traits.max_tiles_per_move().max(1) as usize;
        let movement = actor.movement;

        let route = match movement {
            MoveType::Hunt => hunt(session, id, from, steps)?,
            MoveType::Wander => wander(session, id, from, steps)?,
            MoveType::Still => Vec::new(),
        };
        if route.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            actor: id,
            from,
            route,
        }))
    }

    pub fn destination(&self) -> GridPoint {
        self.route.last().copied().unwrap_or(self.from)
    }

    pub fn apply(&self, session: &mut GameSession) -> Result<()> {
        let actor = session.world.try_actor_mut(self.actor)?;
        actor.position = self.destination();
        Ok(())
    }

    pub async fn replay(&self, presenter: &dyn Presenter) -> Result<()> {
        presenter.replay_route(self.actor, &self.route).await
    }
}

fn hunt(session: &GameSession, id: ActorId, from: GridPoint, steps: usize) -> Result<Route> {
    let target = session.world.hero().position;
    let radius = steps as f64 * session.config().hunting_factor;
    if session.hero_disengaging || from.manhattan(target) as f64 > radius {
        return Ok(Vec::new());
    }
    let blocked = session.blocked_tiles(id);
    let mut route = session
        .map()?
        .find_route(from, target, &blocked)
        .unwrap_or_default();
    route.truncate(steps);
    Ok(route)
}

fn wander(session: &mut GameSession, id: ActorId, from: GridPoint, steps: usize) -> Result<Route> {
    let mut blocked = session.blocked_tiles(id);
    blocked.insert(session.world.hero().position);
    let (map, rng) = session.map_and_rng()?;

    let mut route = Vec::new();
    let mut at = from;
    for _ in 0..steps {
        let options: Vec<GridPoint> = at
            .neighbours()
            .into_iter()
            .filter(|p| map.tile(*p) == Some(Tile::Floor))
            .filter(|p| !blocked.contains(p) && *p != from && !route.contains(p))
            .collect();
        let Some(next) = options.choose(rng).copied() else {
            break;
        };
        route.push(next);
        at = next;
    }
    Ok(route)
}

/// Animates every planned move concurrently.
pub async fn replay_all(movers: &[ReplayableActorMover], presenter: &dyn Presenter) -> Result<()> {
    let replays = movers.iter().map(|m| m.replay(presenter));
    for result in join_all(replays).await {
        result?;
    }
    Ok(())
}
