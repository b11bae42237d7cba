//! Mutable state of one play-through.
//!
//! A [`GameSession`] owns the campaign, the world of the loaded scene, its
//! grid and the seeded RNG every roll comes from. Turn handlers borrow it
//! mutably while they run; nothing else touches it.

use std::collections::{BTreeMap, HashSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crawl_core::{ActorId, ActorRole, ActorTemplate, Campaign, GridPoint, SceneDefinition, World};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::map::{GridMap, Route, RouteFinder, TileMap};
use crate::repository::SavedGame;

pub struct GameSession {
    campaign: Campaign,
    config: RuntimeConfig,
    pub world: World,
    map: Option<GridMap>,
    pub scene_index: usize,
    /// Whether progress is written to the save repository.
    pub persistent: bool,
    /// Set when the hero breaks off a fight; hunters hold still for a turn.
    pub hero_disengaging: bool,
    /// Destinations the hero can reach this turn.
    pub hero_routes: BTreeMap<GridPoint, Route>,
    pub rng: StdRng,
}

impl GameSession {
    pub fn new(campaign: Campaign, config: RuntimeConfig) -> Result<Self> {
        if campaign.scenes.is_empty() {
            return Err(RuntimeError::EmptyCampaign);
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hero = campaign
            .hero
            .instantiate(ActorId::HERO, GridPoint::ORIGIN, &mut rng);

        Ok(Self {
            campaign,
            config,
            world: World::new(hero),
            map: None,
            scene_index: 0,
            persistent: false,
            hero_disengaging: false,
            hero_routes: BTreeMap::new(),
            rng,
        })
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn current_scene(&self) -> Option<&SceneDefinition> {
        self.campaign.scene(self.scene_index)
    }

    pub fn map(&self) -> Result<&GridMap> {
        self.map.as_ref().ok_or(RuntimeError::NoScene)
    }

    /// The grid together with the RNG, for rolls that depend on the layout.
    pub fn map_and_rng(&mut self) -> Result<(&GridMap, &mut StdRng)> {
        let map = self.map.as_ref().ok_or(RuntimeError::NoScene)?;
        Ok((map, &mut self.rng))
    }

    pub fn is_scene_loaded(&self) -> bool {
        self.map.is_some()
    }

    // ========================================================================
    // Hero lifecycle
    // ========================================================================

    /// Replaces the hero with a fresh one from the campaign.
    pub fn reset_hero(&mut self) {
        let hero = self
            .campaign
            .hero
            .instantiate(ActorId::HERO, GridPoint::ORIGIN, &mut self.rng);
        self.world = World::new(hero);
        self.scene_index = 0;
    }

    /// Adopts a saved hero and scene.
    pub fn restore(&mut self, saved: SavedGame) {
        self.world = World::new(saved.hero);
        self.scene_index = saved.scene_index;
    }

    pub fn saved_game(&self) -> SavedGame {
        SavedGame {
            scene_index: self.scene_index,
            hero: self.world.hero().clone(),
        }
    }

    pub fn has_next_scene(&self) -> bool {
        self.scene_index + 1 < self.campaign.scenes.len()
    }

    // ========================================================================
    // Scenes
    // ========================================================================

    /// Builds the grid of the current scene, spawns its actors and puts the
    /// hero on the entrance.
    pub fn load_scene(&mut self) -> Result<()> {
        let scene = self
            .current_scene()
            .ok_or(RuntimeError::NoScene)?
            .clone();
        let map = GridMap::parse(&scene.name, &scene.rows)?;

        self.world.unload_scene();
        let entrance = map.entrance();
        self.world.hero_mut().position = entrance;

        let mut free: Vec<GridPoint> = map.floor_tiles();
        free.shuffle(&mut self.rng);
        let mut taken: HashSet<GridPoint> = HashSet::from([entrance]);

        for template in &scene.actors {
            let position = match template.position {
                Some(p) if map.is_walkable(p) => p,
                Some(p) => {
                    tracing::warn!(scene = %scene.name, %p, "actor placed on a wall, relocating");
                    self.free_tile(&mut free, &taken)?
                }
                None => self.free_tile(&mut free, &taken)?,
            };
            taken.insert(position);
            self.spawn(template, position);
        }

        tracing::info!(
            scene = %scene.name,
            index = self.scene_index,
            actors = scene.actors.len(),
            "scene loaded"
        );
        self.map = Some(map);
        self.hero_disengaging = false;
        self.hero_routes.clear();
        Ok(())
    }

    fn free_tile(&self, free: &mut Vec<GridPoint>, taken: &HashSet<GridPoint>) -> Result<GridPoint> {
        while let Some(point) = free.pop() {
            if !taken.contains(&point) {
                return Ok(point);
            }
        }
        let scene = self
            .current_scene()
            .map(|s| s.name.clone())
            .unwrap_or_default();
        Err(RuntimeError::InvalidMap(format!(
            "scene {scene} has no free floor left for its actors"
        )))
    }

    fn spawn(&mut self, template: &ActorTemplate, position: GridPoint) -> ActorId {
        self.world.spawn(template, position, &mut self.rng)
    }

    pub fn unload_scene(&mut self) {
        self.world.unload_scene();
        self.map = None;
        self.hero_routes.clear();
        self.hero_disengaging = false;
    }

    // ========================================================================
    // Movement helpers
    // ========================================================================

    /// Tiles blocked by living actors other than `except`.
    pub fn blocked_tiles(&self, except: ActorId) -> HashSet<GridPoint> {
        self.world
            .actors()
            .iter()
            .filter(|a| a.id != except && a.alive && !a.role.is_inanimate())
            .map(|a| a.position)
            .collect()
    }

    /// Recomputes where the hero may move this turn.
    pub fn refresh_hero_routes(&mut self) -> Result<()> {
        let hero = self.world.hero();
        let steps = hero.traits.max_tiles_per_move().max(1) as usize;
        let from = hero.position;
        let blocked = self.blocked_tiles(ActorId::HERO);
        self.hero_routes = self.map()?.reachable(from, steps, &blocked);
        Ok(())
    }

    /// Doors among the hero's reachable tiles.
    pub fn reachable_doors(&self) -> Vec<GridPoint> {
        let Some(map) = self.map.as_ref() else {
            return Vec::new();
        };
        [map.entrance(), map.exit()]
            .into_iter()
            .filter(|door| self.hero_routes.contains_key(door))
            .collect()
    }

    /// Text map of the scene with actors drawn on it.
    pub fn render(&self) -> Option<String> {
        let map = self.map.as_ref()?;
        let mut marks = BTreeMap::new();
        for actor in self.world.actors().iter().skip(1) {
            let glyph = match (actor.alive, actor.role) {
                (false, _) if actor.has_discoveries() => '%',
                (false, _) => continue,
                (true, ActorRole::Enemy) => 'g',
                (true, ActorRole::Trader) => 'T',
                (true, ActorRole::Prop) => 'p',
                (true, ActorRole::HiddenArtefact) => continue,
                (true, ActorRole::Hero) => '@',
            };
            marks.insert(actor.position, glyph);
        }
        marks.insert(self.world.hero().position, '@');
        Some(map.render(&marks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign() -> Campaign {
        Campaign {
            hero: ActorTemplate::new(ActorRole::Hero, "NAME:Ann, HP:10, SPEED:20"),
            scenes: vec![SceneDefinition {
                name: "Cellar".into(),
                intro: None,
                rows: vec!["#####".into(), "#E..#".into(), "#..X#".into(), "#####".into()],
                exit_key: None,
                actors: vec![
                    ActorTemplate::new(ActorRole::Enemy, "NAME:Rat, HP:2").at(GridPoint::new(3, 1)),
                    ActorTemplate::new(ActorRole::Prop, "NAME:Barrel"),
                ],
            }],
        }
    }

    #[test]
    fn empty_campaign_is_rejected() {
        let mut campaign = campaign();
        campaign.scenes.clear();
        assert!(matches!(
            GameSession::new(campaign, RuntimeConfig::default()),
            Err(RuntimeError::EmptyCampaign)
        ));
    }

    #[test]
    fn load_scene_places_everyone() {
        let mut session = GameSession::new(campaign(), RuntimeConfig::default().with_seed(3)).unwrap();
        session.load_scene().unwrap();

        let map = session.map().unwrap();
        assert_eq!(session.world.hero().position, map.entrance());
        assert_eq!(session.world.actors().len(), 3);
        let rat = session.world.actor(ActorId(1)).unwrap();
        assert_eq!(rat.position, GridPoint::new(3, 1));
        let barrel = session.world.actor(ActorId(2)).unwrap();
        assert!(map.is_walkable(barrel.position));
        assert_ne!(barrel.position, map.entrance());
        assert_ne!(barrel.position, rat.position);
    }

    #[test]
    fn hero_routes_reach_occupied_tiles_but_not_through_them() {
        let mut session = GameSession::new(campaign(), RuntimeConfig::default().with_seed(3)).unwrap();
        session.load_scene().unwrap();
        session.refresh_hero_routes().unwrap();

        assert!(session.hero_routes.len() <= 4);
        assert!(session.hero_routes.contains_key(&GridPoint::new(2, 1)));
        assert!(!session.hero_routes.contains_key(&session.world.hero().position));
    }

    #[test]
    fn saved_game_round_trips_through_restore() {
        let mut session = GameSession::new(campaign(), RuntimeConfig::default().with_seed(3)).unwrap();
        session.world.hero_mut().traits.set("EXP", 900i64);
        let saved = session.saved_game();
        session.reset_hero();
        assert_eq!(session.world.hero().traits.get_int("EXP"), 0);
        session.restore(saved);
        assert_eq!(session.world.hero().traits.get_int("EXP"), 900);
    }
}
