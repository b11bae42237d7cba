//! Repository contract for saving and restoring a game.

use serde::{Deserialize, Serialize};

use crawl_core::Actor;

use crate::api::Result;

/// What survives between sessions: the hero and where they got to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub scene_index: usize,
    pub hero: Actor,
}

/// Persistence for the single saved game.
pub trait SaveRepository: Send + Sync {
    fn save_game_state(&self, saved: &SavedGame) -> Result<()>;

    fn restore_game_state(&self) -> Result<Option<SavedGame>>;

    /// Forgets the saved game.
    fn clear_game_state(&self) -> Result<()>;

    /// Whether a save exists whose hero can carry on.
    fn has_living_hero(&self) -> bool {
        matches!(self.restore_game_state(), Ok(Some(saved)) if saved.hero.alive)
    }
}
