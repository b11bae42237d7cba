//! Campaign content for the dungeon crawler.
//!
//! A campaign lives in a data directory:
//! - `campaign.toml`: the manifest naming every other file
//! - a hero template and an optional actor catalog, in RON
//! - one RON file per scene, holding the map rows and the actors to spawn
//!
//! Everything loads into `crawl-core` types; nothing here is part of the
//! game state.

pub mod loaders;

pub use loaders::{
    ActorCatalog, ActorEntry, ActorLoader, CampaignManifest, ContentFactory, LoadResult,
    ManifestLoader, SceneFile, SceneLoader,
};
