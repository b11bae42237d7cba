//! Scene file loader.
//!
//! A scene file carries the map rows and the actors to spawn. Actors are
//! either written out in full or named from the [`ActorCatalog`]:
//!
//! ```ron
//! (
//!     name: "Cellar",
//!     intro: Some("Water drips somewhere in the dark."),
//!     exit_key: Some("Brass key"),
//!     rows: [
//!         "#######",
//!         "#E...X#",
//!         "#######",
//!     ],
//!     actors: [
//!         Named(name: "rat", at: Some((x: 3, y: 1))),
//!         Inline((role: Prop, traits: "NAME:Statue, ENGRAVING:Turn back")),
//!     ],
//! )
//! ```

use std::path::Path;

use crawl_core::{ActorTemplate, GridPoint, SceneDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{ActorCatalog, LoadResult, read_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorEntry {
    Named {
        name: String,
        #[serde(default)]
        at: Option<GridPoint>,
    },
    Inline(ActorTemplate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub name: String,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub exit_key: Option<String>,
    pub rows: Vec<String>,
    #[serde(default)]
    pub actors: Vec<ActorEntry>,
}

impl SceneFile {
    /// Resolves named actors against `catalog`.
    pub fn resolve(self, catalog: &ActorCatalog) -> LoadResult<SceneDefinition> {
        let actors = self
            .actors
            .into_iter()
            .map(|entry| match entry {
                ActorEntry::Named { name, at } => catalog
                    .place(&name, at)
                    .map_err(|e| anyhow::anyhow!("Scene '{}': {}", self.name, e)),
                ActorEntry::Inline(template) => Ok(template),
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(SceneDefinition {
            name: self.name,
            intro: self.intro,
            rows: self.rows,
            exit_key: self.exit_key,
            actors,
        })
    }
}

/// Loader for scene files from RON.
pub struct SceneLoader;

impl SceneLoader {
    pub fn load(path: &Path, catalog: &ActorCatalog) -> LoadResult<SceneDefinition> {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parses a scene and checks its map has exactly one entrance and one exit.
    pub fn parse(content: &str, catalog: &ActorCatalog) -> LoadResult<SceneDefinition> {
        let file: SceneFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scene RON: {}", e))?;

        let count = |marker: char| {
            file.rows
                .iter()
                .map(|row| row.chars().filter(|c| *c == marker).count())
                .sum::<usize>()
        };
        for (marker, what) in [('E', "entrance"), ('X', "exit")] {
            let found = count(marker);
            if found != 1 {
                anyhow::bail!("Scene '{}' has {} {} tiles, expected 1", file.name, found, what);
            }
        }

        let scene = file.resolve(catalog)?;
        tracing::debug!(scene = %scene.name, actors = scene.actors.len(), "scene parsed");
        Ok(scene)
    }
}
