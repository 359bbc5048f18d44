//! One sync pass: fetch, extract, merge, write.
//!
//! The manifest is written last. Any error before that point leaves the
//! previous manifest exactly as it was.

use crate::api::MessageSource;
use crate::config::Config;
use crate::error::SyncResult;
use crate::extract::extract_post;
use crate::manifest::{known_ids, load_manifest, merge};
use crate::models::{NewsItem, RawMessage};
use crate::outputs::{json, markdown};
use crate::utils::{compact_timestamp, ensure_writable_dir};
use tracing::{debug, info, instrument, warn};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Messages returned by the fetch.
    pub scanned: usize,
    /// Items added to the manifest this run.
    pub new_items: usize,
    /// Post files actually created this run.
    pub posts_written: usize,
    /// Messages skipped because their timestamp could not be parsed.
    pub skipped_bad_timestamp: usize,
    /// Manifest length after the merge.
    pub total_items: usize,
}

/// Run one full pass against `source`, writing under `config.output_dir`.
#[instrument(level = "info", skip_all, fields(channel = %config.channel_id))]
pub async fn run<S: MessageSource>(config: &Config, source: &S) -> SyncResult<RunReport> {
    ensure_writable_dir(&config.posts_path()).await?;

    let messages = source.fetch_messages().await?;
    info!(count = messages.len(), "Fetched messages");

    let manifest_path = config.manifest_path();
    let existing = load_manifest(&manifest_path).await?;
    let known = known_ids(&existing);

    let mut report = RunReport {
        scanned: messages.len(),
        ..Default::default()
    };

    let mut new_items = Vec::new();
    for message in &messages {
        if message.id.is_empty() || known.contains(&message.id) {
            continue;
        }
        if new_items.iter().any(|item: &NewsItem| item.id == message.id) {
            continue;
        }

        let Some(extracted) = extract_post(message) else {
            debug!(id = %message.id, "Not a news item; skipping");
            continue;
        };

        let item = match news_item(config, message, &extracted.title) {
            Ok(item) => item,
            Err(e) => {
                warn!(id = %message.id, error = %e, "Skipping message with unreadable timestamp");
                report.skipped_bad_timestamp += 1;
                continue;
            }
        };

        if markdown::write_post(&config.output_dir, &item, &extracted.body).await? {
            report.posts_written += 1;
        }
        new_items.push(item);
    }
    report.new_items = new_items.len();

    let merged = merge(existing, new_items, config.keep_max);
    report.total_items = merged.len();
    json::write_manifest(&merged, &manifest_path).await?;

    info!(
        scanned = report.scanned,
        new_items = report.new_items,
        posts_written = report.posts_written,
        skipped_bad_timestamp = report.skipped_bad_timestamp,
        total_items = report.total_items,
        "Sync complete"
    );
    Ok(report)
}

fn news_item(config: &Config, message: &RawMessage, title: &str) -> SyncResult<NewsItem> {
    let timestamp = compact_timestamp(&message.timestamp)?;
    Ok(NewsItem {
        path: markdown::post_path(&config.posts_dir, &timestamp, title),
        timestamp,
        author: message.author_name().to_string(),
        id: message.id.clone(),
        title: title.to_string(),
    })
}
