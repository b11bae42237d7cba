//! Content loaders for reading campaign data from files.
//!
//! Each loader has a `parse` function working on text and a `load` wrapper
//! reading a file; [`ContentFactory`] ties them together for a directory.

pub mod actors;
pub mod factory;
pub mod manifest;
pub mod scene;

pub use actors::{ActorCatalog, ActorLoader};
pub use factory::ContentFactory;
pub use manifest::{CampaignManifest, ManifestLoader};
pub use scene::{ActorEntry, SceneFile, SceneLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
