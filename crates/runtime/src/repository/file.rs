//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::api::Result;
use crate::repository::{RepositoryError, SaveRepository, SavedGame};

const SAVE_FILE: &str = "savegame.json";

/// Stores the saved game as a JSON file.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save leaves the previous save intact.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    /// Repository in the platform data directory.
    pub fn in_platform_dir() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "crawl").ok_or(RepositoryError::NoDataDirectory)?;
        Self::new(dirs.data_dir())
    }

    pub fn save_path(&self) -> PathBuf {
        self.base_dir.join(SAVE_FILE)
    }
}

impl SaveRepository for FileSaveRepository {
    fn save_game_state(&self, saved: &SavedGame) -> Result<()> {
        let path = self.save_path();
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(saved).map_err(RepositoryError::Json)?;
        fs::write(&temp_path, json).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(scene = saved.scene_index, "saved game to {}", path.display());
        Ok(())
    }

    fn restore_game_state(&self) -> Result<Option<SavedGame>> {
        let path = self.save_path();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let saved: SavedGame = serde_json::from_slice(&bytes).map_err(RepositoryError::Json)?;

        tracing::debug!(scene = saved.scene_index, "restored game from {}", path.display());
        Ok(Some(saved))
    }

    fn clear_game_state(&self) -> Result<()> {
        let path = self.save_path();
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("deleted {}", path.display());
        }
        Ok(())
    }
}
