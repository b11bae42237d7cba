//! File logging for the console client.
//!
//! The console belongs to the game, so logs only go to `client.log`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber writing to `<log_dir>/client.log`.
///
/// `RUST_LOG` refines the filter; INFO is always on.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<PathBuf> {
    let log_dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_log_directory(),
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keeps the writer thread alive for the life of the process.
    std::mem::forget(guard);

    tracing::info!("Log file: {}/client.log", log_dir.display());
    Ok(log_dir)
}

fn default_log_directory() -> PathBuf {
    ProjectDirs::from("", "", "crawl")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("crawl").join("logs"))
}
