//! Command-line interface definitions for Discord News Sync.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every argument can be provided via a command-line flag or an environment
//! variable, so the binary can be driven entirely from a scheduler's
//! environment.

use clap::Parser;

/// Command-line arguments for the Discord News Sync application.
///
/// These are parsed once at startup and turned into a [`crate::config::Config`]
/// which is what the rest of the application consumes.
///
/// # Examples
///
/// ```sh
/// # Credentials from the environment, everything else defaulted
/// DISCORD_BOT_TOKEN=... DISCORD_CHANNEL_ID=123 discord_news_sync
///
/// # Write into a site checkout and keep the 50 newest entries
/// discord_news_sync --channel-id 123 -o ./site --keep-max 50
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Discord bot token used for the Authorization header
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Channel whose messages are scanned
    #[arg(long, env = "DISCORD_CHANNEL_ID")]
    pub channel_id: String,

    /// How many recent messages to request (the API serves at most 100)
    #[arg(long, env = "DISCORD_LIMIT", default_value_t = 100)]
    pub limit: u32,

    /// Keep only the newest N entries in the manifest; 0 or less keeps everything
    #[arg(long, env = "KEEP_MAX", default_value_t = 200, allow_negative_numbers = true)]
    pub keep_max: i64,

    /// Root directory the manifest and posts are written under
    #[arg(short, long, env = "NEWS_OUTPUT_DIR", default_value = ".")]
    pub output_dir: String,

    /// Manifest file name, relative to the output directory
    #[arg(short, long, env = "NEWS_MANIFEST", default_value = "news.json")]
    pub manifest: String,

    /// Posts directory, relative to the output directory
    #[arg(short, long, env = "NEWS_POSTS_DIR", default_value = "posts")]
    pub posts_dir: String,

    /// Base URL of the Discord REST API
    #[arg(long, env = "DISCORD_API_BASE", default_value = "https://discord.com/api/v10")]
    pub api_base: String,

    /// Timeout for the messages request, in seconds
    #[arg(long, env = "DISCORD_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}
