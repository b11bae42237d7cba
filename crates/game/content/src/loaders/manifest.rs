//! Campaign manifest loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

fn default_hero() -> String {
    "hero.ron".to_string()
}

/// The `campaign.toml` file: a title and the paths of the other files,
/// relative to the manifest's directory.
///
/// ```toml
/// title = "The Sunken Cellar"
/// hero = "hero.ron"
/// actors = "actors.ron"
/// scenes = ["scenes/cellar.ron", "scenes/crypt.ron"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignManifest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_hero")]
    pub hero: String,
    /// Optional catalog of named actor templates scenes can refer to.
    #[serde(default)]
    pub actors: Option<String>,
    pub scenes: Vec<String>,
}

/// Loader for the campaign manifest from TOML files.
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn load(path: &Path) -> LoadResult<CampaignManifest> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CampaignManifest> {
        let manifest: CampaignManifest = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse campaign TOML: {}", e))?;

        if manifest.scenes.is_empty() {
            anyhow::bail!("Campaign '{}' lists no scenes", manifest.title);
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let manifest = ManifestLoader::parse(
            r#"
            title = "Cellar"
            scenes = ["scenes/one.ron"]
            "#,
        )
        .expect("manifest should parse");

        assert_eq!(manifest.title, "Cellar");
        assert_eq!(manifest.hero, "hero.ron");
        assert_eq!(manifest.actors, None);
        assert_eq!(manifest.scenes, vec!["scenes/one.ron".to_string()]);
    }

    #[test]
    fn campaign_without_scenes_is_rejected() {
        let err = ManifestLoader::parse("title = \"Empty\"\nscenes = []\n")
            .expect_err("no scenes");
        assert!(err.to_string().contains("lists no scenes"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = ManifestLoader::parse("title = ").expect_err("bad toml");
        assert!(err.to_string().contains("Failed to parse campaign TOML"));
    }
}
