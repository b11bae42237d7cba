//! Dungeon crawler console client.
//!
//! ```bash
//! # Play the bundled campaign
//! cargo run -p crawl-client
//!
//! # Another campaign, fixed dice, no save file
//! CRAWL_CONTENT_DIR=./my-campaign CRAWL_SEED=7 CRAWL_ENABLE_PERSISTENCE=false cargo run -p crawl-client
//! ```

use std::sync::Arc;

use anyhow::Result;
use crawl_client::{ClientConfig, ConsoleApp, ConsoleInput, logging};
use crawl_content::ContentFactory;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting crawl client");
    tracing::info!("Content: {}", config.content_dir.display());
    tracing::info!("Persistence: {}", config.runtime.enable_persistence);

    let (manifest, campaign) = ContentFactory::new(&config.content_dir).load_campaign()?;
    println!("{}", manifest.title);
    if let Some(description) = &manifest.description {
        println!("{description}");
    }

    let app = ConsoleApp::build(campaign, &config, Arc::new(ConsoleInput::stdin()))?;
    if let Err(e) = app.run().await {
        tracing::error!("Fatal: {:#}", e);
        eprintln!("The game cannot continue: {e}");
        return Err(e);
    }

    tracing::info!("Client shutdown complete");
    Ok(())
}
