//! Run configuration.
//!
//! [`Config`] is built once from the parsed [`Cli`] and handed to each stage
//! of the pipeline. Nothing downstream reads the environment directly.

use crate::cli::Cli;
use crate::error::{SyncError, SyncResult};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Largest page the channel messages endpoint will serve.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub channel_id: String,
    /// Already clamped to `1..=MAX_PAGE_SIZE`.
    pub limit: u32,
    /// `None` means unlimited retention.
    pub keep_max: Option<usize>,
    pub output_dir: PathBuf,
    /// Manifest location relative to `output_dir`.
    pub manifest: PathBuf,
    /// Posts location relative to `output_dir`; also the prefix recorded in
    /// each manifest entry's `path`.
    pub posts_dir: String,
    pub api_base: Url,
    pub timeout: Duration,
}

impl Config {
    /// Validate CLI input and normalise it into a [`Config`].
    pub fn from_cli(cli: &Cli) -> SyncResult<Self> {
        let token = cli.token.trim();
        if token.is_empty() {
            return Err(SyncError::Config("bot token is empty".into()));
        }
        let channel_id = cli.channel_id.trim();
        if channel_id.is_empty() {
            return Err(SyncError::Config("channel id is empty".into()));
        }

        let api_base = Url::parse(&cli.api_base)
            .map_err(|e| SyncError::Config(format!("api base {:?}: {e}", cli.api_base)))?;
        if api_base.cannot_be_a_base() {
            return Err(SyncError::Config(format!(
                "api base {:?} cannot carry a path",
                cli.api_base
            )));
        }

        let posts_dir = cli.posts_dir.trim_matches('/').to_string();
        if posts_dir.is_empty() {
            return Err(SyncError::Config("posts directory is empty".into()));
        }

        Ok(Config {
            token: token.to_string(),
            channel_id: channel_id.to_string(),
            limit: cli.limit.clamp(1, MAX_PAGE_SIZE),
            keep_max: retention(cli.keep_max),
            output_dir: PathBuf::from(&cli.output_dir),
            manifest: PathBuf::from(&cli.manifest),
            posts_dir,
            api_base,
            timeout: Duration::from_secs(cli.timeout_secs),
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.manifest)
    }

    pub fn posts_path(&self) -> PathBuf {
        self.output_dir.join(&self.posts_dir)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("channel_id", &self.channel_id)
            .field("limit", &self.limit)
            .field("keep_max", &self.keep_max)
            .field("output_dir", &self.output_dir)
            .field("manifest", &self.manifest)
            .field("posts_dir", &self.posts_dir)
            .field("api_base", &self.api_base.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Non-positive caps disable truncation.
fn retention(keep_max: i64) -> Option<usize> {
    if keep_max > 0 {
        Some(usize::try_from(keep_max).unwrap_or(usize::MAX))
    } else {
        None
    }
}
