//! Console client configuration.
use std::env;
use std::path::PathBuf;

use crawl_runtime::RuntimeConfig;

/// Settings for the console front end, on top of the runtime's own.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory holding `campaign.toml`.
    pub content_dir: PathBuf,
    /// Where `client.log` goes; the platform cache directory when unset.
    pub log_dir: Option<PathBuf>,
    /// Print sound cues as text.
    pub show_sounds: bool,
    pub runtime: RuntimeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            log_dir: None,
            show_sounds: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CRAWL_CONTENT_DIR` - Campaign directory (default: `content`)
    /// - `CRAWL_LOG_DIR` - Log directory (default: platform cache dir)
    /// - `CRAWL_SHOW_SOUNDS` - Print sound cues (default: false)
    /// - every `CRAWL_*` variable read by [`RuntimeConfig::from_env`]
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        if let Ok(dir) = env::var("CRAWL_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        config.log_dir = env::var("CRAWL_LOG_DIR").ok().map(PathBuf::from);
        if let Some(show) = read_env_bool("CRAWL_SHOW_SOUNDS") {
            config.show_sounds = show;
        }

        config
    }
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
