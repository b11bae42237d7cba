//! Content factory for building a campaign from a data directory.

use std::path::{Path, PathBuf};

use crawl_core::Campaign;

use crate::loaders::{ActorCatalog, ActorLoader, CampaignManifest, LoadResult, ManifestLoader, SceneLoader};

const MANIFEST: &str = "campaign.toml";

/// Content factory that loads a whole campaign from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── campaign.toml
/// ├── hero.ron
/// ├── actors.ron
/// └── scenes/
///     ├── cellar.ron
///     └── crypt.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn load_manifest(&self) -> LoadResult<CampaignManifest> {
        ManifestLoader::load(&self.data_dir.join(MANIFEST))
    }

    /// The catalog named by the manifest, or an empty one.
    pub fn load_catalog(&self, manifest: &CampaignManifest) -> LoadResult<ActorCatalog> {
        match &manifest.actors {
            Some(file) => ActorLoader::load_catalog(&self.data_dir.join(file)),
            None => Ok(ActorCatalog::default()),
        }
    }

    /// Loads the manifest, the hero and every scene in manifest order.
    pub fn load_campaign(&self) -> LoadResult<(CampaignManifest, Campaign)> {
        let manifest = self.load_manifest()?;
        let catalog = self.load_catalog(&manifest)?;
        let hero = ActorLoader::load_hero(&self.data_dir.join(&manifest.hero))?;

        let scenes = manifest
            .scenes
            .iter()
            .map(|file| SceneLoader::load(&self.data_dir.join(file), &catalog))
            .collect::<LoadResult<Vec<_>>>()?;

        tracing::info!(
            title = %manifest.title,
            scenes = scenes.len(),
            catalog = catalog.len(),
            "campaign loaded from {}",
            self.data_dir.display()
        );
        Ok((manifest, Campaign { hero, scenes }))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn campaign_loads_from_a_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir(dir.path().join("scenes")).expect("scenes dir");
        fs::write(
            dir.path().join(MANIFEST),
            "title = \"Test\"\nactors = \"actors.ron\"\nscenes = [\"scenes/a.ron\", \"scenes/b.ron\"]\n",
        )
        .expect("manifest");
        fs::write(dir.path().join("hero.ron"), r#"(role: Hero, traits: "NAME:Ann")"#).expect("hero");
        fs::write(
            dir.path().join("actors.ron"),
            r#"{ "rat": (role: Enemy, traits: "NAME:Rat") }"#,
        )
        .expect("catalog");
        fs::write(
            dir.path().join("scenes/a.ron"),
            r##"(name: "A", rows: ["#E.X#"], actors: [Named(name: "rat")])"##,
        )
        .expect("scene a");
        fs::write(dir.path().join("scenes/b.ron"), r##"(name: "B", rows: ["#X.E#"])"##).expect("scene b");

        let (manifest, campaign) = ContentFactory::new(dir.path())
            .load_campaign()
            .expect("campaign should load");

        assert_eq!(manifest.title, "Test");
        assert_eq!(campaign.scenes.len(), 2);
        assert_eq!(campaign.scenes[0].name, "A");
        assert_eq!(campaign.scenes[0].actors.len(), 1);
        assert_eq!(campaign.scenes[1].name, "B");
        assert_eq!(campaign.hero.traits, "NAME:Ann");
    }

    #[test]
    fn missing_scene_file_names_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(MANIFEST), "title = \"T\"\nscenes = [\"gone.ron\"]\n").expect("manifest");
        fs::write(dir.path().join("hero.ron"), r#"(role: Hero, traits: "NAME:Ann")"#).expect("hero");

        let err = ContentFactory::new(dir.path())
            .load_campaign()
            .expect_err("scene file is missing");
        assert!(err.to_string().contains("gone.ron"));
    }

    /// The campaign shipped with the game must stay loadable.
    #[test]
    fn bundled_campaign_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../content");
        let (manifest, campaign) = ContentFactory::new(dir)
            .load_campaign()
            .expect("bundled campaign should load");
        assert!(!manifest.title.is_empty());
        assert_eq!(campaign.scenes.len(), manifest.scenes.len());
        assert!(campaign.scenes.iter().all(|s| !s.actors.is_empty()));
    }
}
