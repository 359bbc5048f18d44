//! Markdown post output.
//!
//! Each news item gets one post file named `{timestamp}-{slug}.md`. A post
//! is written exactly once: if the file is already there it is treated as
//! published and left alone.

use crate::error::{SyncError, SyncResult};
use crate::models::NewsItem;
use crate::utils::slugify_title;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// Relative path of the post for an item with this timestamp and title.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(post_path("posts", "202401051234", "Release v2"), "posts/202401051234-release-v2.md");
/// ```
pub fn post_path(posts_dir: &str, timestamp: &str, title: &str) -> String {
    format!("{}/{}-{}.md", posts_dir, timestamp, slugify_title(title))
}

/// Render a post: title heading, attribution line, then the body.
pub fn render_post(item: &NewsItem, body: &str) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {}\n", item.title);
    let _ = writeln!(md, "*{}* — {}\n", item.timestamp, item.author);
    let _ = writeln!(md, "{}", body.trim());
    md
}

/// Write the post for `item` under `output_dir`, unless it already exists.
///
/// Returns `true` if a new file was written, `false` if one was already
/// present.
///
/// # Errors
///
/// Returns [`SyncError::Filesystem`] if the file cannot be created or written.
#[instrument(level = "info", skip_all, fields(path = %item.path))]
pub async fn write_post(output_dir: &Path, item: &NewsItem, body: &str) -> SyncResult<bool> {
    let full_path = output_dir.join(&item.path);

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&full_path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Post already published; leaving it untouched");
            return Ok(false);
        }
        Err(e) => return Err(SyncError::filesystem(&full_path, e)),
    };

    let md = render_post(item, body);
    file.write_all(md.as_bytes())
        .await
        .map_err(|e| SyncError::filesystem(&full_path, e))?;
    file.flush()
        .await
        .map_err(|e| SyncError::filesystem(&full_path, e))?;

    info!(bytes = md.len(), "Wrote post");
    Ok(true)
}
