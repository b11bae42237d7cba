//! Collaborators the turn machinery talks to.
//!
//! The runtime never renders or prompts by itself. Every question for the
//! player goes through [`Dialogs`] and every piece of feedback through
//! [`Presenter`], so a console, a GUI or a scripted test can drive the same
//! session.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;

use crawl_core::{Actor, ActorId, Artefact, GridPoint, SceneDefinition};

use super::errors::Result;
use crate::repository::SaveRepository;

/// Entries of the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum MainMenuChoice {
    /// Resume the saved game.
    Continue,
    /// Start over, replacing any save.
    #[strum(to_string = "New game")]
    NewGame,
    /// Play without saving.
    Casual,
    Quit,
}

/// Answer to an artefact found in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtefactChoice {
    Take,
    Leave,
}

/// Slots picked in the trade dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOrder {
    /// Slots of the trader's store to buy.
    pub buy: Vec<usize>,
    /// Slots of the hero's store to sell.
    pub sell: Vec<usize>,
}

impl TradeOrder {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    Hit,
    Miss,
    Death,
    LevelUp,
    Heal,
    Poison,
    Spell,
    Trade,
    Discovery,
    Locked,
    Unlocked,
    Footsteps,
}

/// Questions put to the player.
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Returns the index of the picked choice.
    async fn show_choice_dialog(&self, title: &str, message: &str, choices: &[String]) -> Result<usize>;

    async fn show_ok_dialog(&self, title: &str, message: &str) -> Result<()>;

    async fn show_main_menu(&self, can_continue: bool) -> Result<MainMenuChoice>;

    async fn show_artefact_dialog(&self, title: &str, artefact: &Artefact) -> Result<ArtefactChoice>;

    /// Returns the corpse's store slots to take.
    async fn show_pillage_dialog(&self, corpse: &Actor, free_space: usize) -> Result<Vec<usize>>;

    async fn show_trade_dialog(&self, hero: &Actor, trader: &Actor) -> Result<TradeOrder>;

    async fn show_actor_details_dialog(&self, actor: &Actor) -> Result<()>;

    /// Shown between scenes while the hero recovers.
    async fn show_rest_dialog(&self, hero: &Actor, next_scene: &str) -> Result<()>;
}

/// Feedback to the player.
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn play_sound(&self, cue: SoundCue) -> Result<()>;

    async fn animate_attack(&self, attacker: ActorId, from: GridPoint, to: GridPoint) -> Result<()>;

    async fn replay_route(&self, actor: ActorId, route: &[GridPoint]) -> Result<()>;

    /// A line for the message log.
    async fn notify(&self, message: &str) -> Result<()>;

    async fn scene_loaded(&self, _scene: &SceneDefinition) -> Result<()> {
        Ok(())
    }

    async fn scene_unloaded(&self) -> Result<()> {
        Ok(())
    }
}

/// Presenter that shows nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentPresenter;

#[async_trait]
impl Presenter for SilentPresenter {
    async fn play_sound(&self, _cue: SoundCue) -> Result<()> {
        Ok(())
    }

    async fn animate_attack(&self, _attacker: ActorId, _from: GridPoint, _to: GridPoint) -> Result<()> {
        Ok(())
    }

    async fn replay_route(&self, _actor: ActorId, _route: &[GridPoint]) -> Result<()> {
        Ok(())
    }

    async fn notify(&self, message: &str) -> Result<()> {
        tracing::debug!("{}", message);
        Ok(())
    }
}

/// Everything a session needs from the outside world.
#[derive(Clone)]
pub struct Collaborators {
    pub dialogs: Arc<dyn Dialogs>,
    pub presenter: Arc<dyn Presenter>,
    pub persistence: Arc<dyn SaveRepository>,
}

impl Collaborators {
    pub fn new(
        dialogs: Arc<dyn Dialogs>,
        presenter: Arc<dyn Presenter>,
        persistence: Arc<dyn SaveRepository>,
    ) -> Self {
        Self {
            dialogs,
            presenter,
            persistence,
        }
    }
}
