//! JSON manifest output.
//!
//! The manifest is always rewritten in full. The new content goes to a
//! sibling temp file first and is then renamed over the old manifest, so an
//! interrupted run leaves the previous manifest intact.

use crate::error::{SyncError, SyncResult};
use crate::models::NewsItem;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `items` as indented JSON and replace the manifest at `path`.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns [`SyncError::Filesystem`] if the directory, temp file or rename
/// fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = items.len()))]
pub async fn write_manifest(items: &[NewsItem], path: &Path) -> SyncResult<()> {
    let json = serde_json::to_string_pretty(items).map_err(|source| SyncError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create manifest dir");
            return Err(SyncError::filesystem(parent, e));
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, json)
        .await
        .map_err(|e| SyncError::filesystem(&tmp_path, e))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| SyncError::filesystem(path, e))?;

    info!("Wrote manifest");
    Ok(())
}
