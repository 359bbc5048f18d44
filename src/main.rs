//! # Discord News Sync
//!
//! Turns announcements posted in a Discord channel into a small static news
//! feed: one Markdown post per announcement plus a JSON manifest indexing
//! them, newest first.
//!
//! ## Usage
//!
//! ```sh
//! DISCORD_BOT_TOKEN=... DISCORD_CHANNEL_ID=123 discord_news_sync -o ./site
//! ```
//!
//! ## Architecture
//!
//! Each invocation performs a single pass and exits; schedule it externally.
//! 1. **Fetching**: read the newest page of channel messages
//! 2. **Extraction**: keep messages with content, derive title and body
//! 3. **Merging**: drop ids already in the manifest, sort, apply retention
//! 4. **Output**: write new posts (never overwriting), then rewrite the manifest
//!
//! Runs must not overlap: nothing locks the manifest.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod extract;
mod manifest;
mod models;
mod outputs;
mod pipeline;
mod utils;

use api::DiscordClient;
use cli::Cli;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("discord_news_sync starting up");

    let args = Cli::parse();
    let config = Config::from_cli(&args).inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    debug!(?config, "Resolved configuration");

    let client = DiscordClient::new(&config)?;
    let report = match pipeline::run(&config, &client).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Sync failed; manifest left unchanged");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        scanned = report.scanned,
        new_items = report.new_items,
        total_items = report.total_items,
        "Execution complete"
    );

    Ok(())
}
