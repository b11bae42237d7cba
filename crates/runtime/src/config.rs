//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Tuning shared by the turn machinery.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Seed for every roll of the session; random when unset.
    pub seed: Option<u64>,
    /// Furthest a hero may move in one turn and still break off a fight.
    pub disengage_radius: i64,
    /// Hunters notice the hero within `max_tiles_per_move * hunting_factor`.
    pub hunting_factor: f64,
    /// Organic actors stop cloning once this many are alive.
    pub max_organic_population: usize,
    pub enable_persistence: bool,
    pub save_data_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            disengage_radius: 2,
            hunting_factor: 1.5,
            max_organic_population: 24,
            enable_persistence: true,
            save_data_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CRAWL_SEED` - RNG seed (default: random)
    /// - `CRAWL_DISENGAGE_RADIUS` - Tiles a hero may retreat from a fight (default: 2)
    /// - `CRAWL_HUNTING_FACTOR` - Hunter awareness multiplier (default: 1.5)
    /// - `CRAWL_MAX_ORGANIC_POPULATION` - Organic clone cap (default: 24)
    /// - `CRAWL_ENABLE_PERSISTENCE` - Write save files (default: true)
    /// - `CRAWL_SAVE_DIR` - Directory for save data (default: platform-specific)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.seed = read_env::<u64>("CRAWL_SEED");

        if let Some(radius) = read_env::<i64>("CRAWL_DISENGAGE_RADIUS") {
            config.disengage_radius = radius.max(0);
        }
        if let Some(factor) = read_env::<f64>("CRAWL_HUNTING_FACTOR") {
            config.hunting_factor = factor.max(0.0);
        }
        if let Some(cap) = read_env::<usize>("CRAWL_MAX_ORGANIC_POPULATION") {
            config.max_organic_population = cap;
        }
        if let Some(enable) = read_env_bool("CRAWL_ENABLE_PERSISTENCE") {
            config.enable_persistence = enable;
        }
        config.save_data_dir = env::var("CRAWL_SAVE_DIR").ok().map(PathBuf::from);

        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
