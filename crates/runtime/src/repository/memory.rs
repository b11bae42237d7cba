//! In-memory SaveRepository implementation for tests and casual runs.

use std::sync::RwLock;

use crate::api::Result;
use crate::repository::{RepositoryError, SaveRepository, SavedGame};

#[derive(Default)]
pub struct InMemorySaveRepository {
    saved: RwLock<Option<SavedGame>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save(saved: SavedGame) -> Self {
        Self {
            saved: RwLock::new(Some(saved)),
        }
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save_game_state(&self, saved: &SavedGame) -> Result<()> {
        let mut slot = self
            .saved
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(saved.clone());
        Ok(())
    }

    fn restore_game_state(&self) -> Result<Option<SavedGame>> {
        let slot = self
            .saved
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn clear_game_state(&self) -> Result<()> {
        let mut slot = self
            .saved
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }
}
