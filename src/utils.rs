//! Utility functions for timestamps, string manipulation, and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Timestamp compaction for manifest entries and post file names
//! - String truncation and slugification for logging and file names
//! - File system validation for output directories

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Format of manifest timestamps: minute precision, fixed width.
pub const COMPACT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Longest slug placed in a post file name.
pub const MAX_SLUG_LEN: usize = 60;

static NON_SLUG_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Offset-carrying forms tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M%:z"];

/// Wall-clock forms tried when no offset is present.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Convert an ISO-8601 timestamp into `YYYYMMDDHHMM`.
///
/// The wall-clock time is kept in the offset it was written in; nothing is
/// converted to UTC or local time. Accepted, in order: RFC 3339; date and
/// time to the minute with a `±HH:MM` offset; the same without an offset;
/// a bare `YYYY-MM-DD`, read as midnight.
///
/// # Errors
///
/// Returns [`SyncError::Timestamp`] if none of those forms match.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(compact_timestamp("2024-01-05T12:34:56.789000+00:00")?, "202401051234");
/// assert_eq!(compact_timestamp("2024-01-05")?, "202401050000");
/// ```
pub fn compact_timestamp(iso: &str) -> SyncResult<String> {
    let iso = iso.trim();
    let source = match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => return Ok(dt.format(COMPACT_TIMESTAMP_FORMAT).to_string()),
        Err(e) => e,
    };

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(iso, f).ok())
    {
        return Ok(dt.format(COMPACT_TIMESTAMP_FORMAT).to_string());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(iso, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.format(COMPACT_TIMESTAMP_FORMAT).to_string())
        .ok_or_else(|| SyncError::Timestamp {
            value: iso.to_string(),
            source,
        })
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and byte count
/// indicator appended. Cuts always land on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Convert a title to a file-name-safe slug.
///
/// Lowercases the text, collapses every run of characters outside
/// `[a-z0-9]` into one hyphen, strips hyphens from both ends and caps the
/// result at [`MAX_SLUG_LEN`]. Yields `"post"` when nothing survives.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("Release v2!! Beta///"), "release-v2-beta");
/// assert_eq!(slugify_title("!!!"), "post");
/// ```
pub fn slugify_title(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let collapsed = NON_SLUG_RUN.replace_all(&lowered, "-");
    // Only ASCII survives the replacement, so byte and char lengths agree.
    let trimmed = collapsed.trim_matches('-');
    let capped = &trimmed[..trimmed.len().min(MAX_SLUG_LEN)];
    let slug = capped.trim_end_matches('-');
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug.to_string()
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns [`SyncError::Filesystem`] if the directory cannot be created or
/// is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> SyncResult<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| SyncError::filesystem(path, e))?;

    let probe_path = path.join("..__probe_write__");
    fs::write(&probe_path, b"")
        .await
        .map_err(|e| SyncError::filesystem(&probe_path, e))?;
    let _ = fs::remove_file(&probe_path).await;
    info!("Output directory is writable");
    Ok(())
}
