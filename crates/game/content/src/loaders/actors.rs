//! Actor template loader.
//!
//! The hero file holds one [`ActorTemplate`]; the catalog maps names to
//! templates that scene files can place by name.

use std::collections::BTreeMap;
use std::path::Path;

use crawl_core::{ActorRole, ActorTemplate, GridPoint};

use crate::loaders::{LoadResult, read_file};

/// Named actor templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorCatalog {
    templates: BTreeMap<String, ActorTemplate>,
}

impl ActorCatalog {
    pub fn get(&self, name: &str) -> Option<&ActorTemplate> {
        self.templates.get(name)
    }

    /// A copy of the named template, optionally placed on `position`.
    pub fn place(&self, name: &str, position: Option<GridPoint>) -> LoadResult<ActorTemplate> {
        let mut template = self
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown actor template '{}'", name))?;
        if position.is_some() {
            template.position = position;
        }
        Ok(template)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Loader for actor templates from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load the hero template.
    ///
    /// The role is forced to [`ActorRole::Hero`]; anything else in the file
    /// is logged and overridden.
    pub fn load_hero(path: &Path) -> LoadResult<ActorTemplate> {
        let content = read_file(path)?;
        Self::parse_hero(&content)
    }

    pub fn parse_hero(content: &str) -> LoadResult<ActorTemplate> {
        let mut hero: ActorTemplate = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse hero RON: {}", e))?;
        if hero.role != ActorRole::Hero {
            tracing::warn!(role = %hero.role, "hero template has another role, overriding");
            hero.role = ActorRole::Hero;
        }
        Ok(hero)
    }

    /// Load an actor catalog.
    ///
    /// RON format: `{ "name": ActorTemplate, ... }`
    pub fn load_catalog(path: &Path) -> LoadResult<ActorCatalog> {
        let content = read_file(path)?;
        Self::parse_catalog(&content)
    }

    pub fn parse_catalog(content: &str) -> LoadResult<ActorCatalog> {
        let templates: BTreeMap<String, ActorTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        if let Some((name, _)) = templates.iter().find(|(_, t)| t.role == ActorRole::Hero) {
            anyhow::bail!("Catalog entry '{}' is a hero; the hero has its own file", name);
        }
        Ok(ActorCatalog { templates })
    }
}
