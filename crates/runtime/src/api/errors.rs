//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from collaborators, repositories and world lookups so the
//! driving frontend can bubble them up with consistent context.
use thiserror::Error;

use crawl_core::{Interaction, StoreError, WorldError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Which side of an interaction was invoked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Enact,
    React,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{interaction} cannot {direction}")]
    UnsupportedInteraction {
        interaction: Interaction,
        direction: Direction,
    },

    #[error("{0} offers no interaction")]
    NoInteraction(String),

    #[error("campaign has no scenes")]
    EmptyCampaign,

    #[error("scene '{scene}' has no {tile} tile")]
    MissingTile { scene: String, tile: &'static str },

    #[error("invalid map: {0}")]
    InvalidMap(String),

    #[error("no scene is loaded")]
    NoScene,

    #[error("dialog collaborator failed: {0}")]
    Dialog(String),

    #[error("presenter collaborator failed: {0}")]
    Presenter(String),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
