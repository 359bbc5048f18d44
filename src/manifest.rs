//! The news manifest: loading it and merging new items into it.
//!
//! The manifest is the JSON list of [`NewsItem`]s that indexes every post.
//! It is read once at the start of a run and rewritten in full at the end
//! (see [`crate::outputs::json`]). Merging is first-seen-wins: an id that is
//! already indexed is never updated, even if the message was edited.

use crate::error::{SyncError, SyncResult};
use crate::models::NewsItem;
use itertools::Itertools;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Read the manifest at `path`. A missing file is an empty manifest.
///
/// # Errors
///
/// - [`SyncError::Filesystem`] if the file exists but cannot be read
/// - [`SyncError::Manifest`] if it is not a JSON list of news items
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_manifest(path: &Path) -> SyncResult<Vec<NewsItem>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No manifest yet; starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(SyncError::filesystem(path, e)),
    };

    let items: Vec<NewsItem> = serde_json::from_str(&raw).map_err(|source| SyncError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    info!(count = items.len(), "Loaded manifest");
    Ok(items)
}

/// Ids already indexed. Entries without an id contribute nothing.
pub fn known_ids(items: &[NewsItem]) -> HashSet<String> {
    items
        .iter()
        .filter(|item| !item.id.is_empty())
        .map(|item| item.id.clone())
        .collect()
}

/// Keep the incoming items whose id is neither already indexed nor repeated
/// earlier in the batch.
pub fn fresh_items(existing: &[NewsItem], incoming: Vec<NewsItem>) -> Vec<NewsItem> {
    let known = known_ids(existing);
    incoming
        .into_iter()
        .filter(|item| !known.contains(&item.id))
        .unique_by(|item| item.id.clone())
        .collect()
}

/// Merge new items into the existing manifest.
///
/// Incoming items with an already-indexed id are dropped. The survivors are
/// appended, the whole list is stably sorted newest first by `timestamp`, and
/// then cut to `keep_max` entries when a cap is given.
///
/// Merging the same inputs again yields the same list.
pub fn merge(
    existing: Vec<NewsItem>,
    incoming: Vec<NewsItem>,
    keep_max: Option<usize>,
) -> Vec<NewsItem> {
    let fresh = fresh_items(&existing, incoming);
    debug!(existing = existing.len(), fresh = fresh.len(), "Merging manifest");

    let mut merged = existing;
    merged.extend(fresh);
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(max) = keep_max {
        merged.truncate(max);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, timestamp: &str) -> NewsItem {
        NewsItem {
            timestamp: timestamp.to_string(),
            author: "newsbot".to_string(),
            id: id.to_string(),
            title: format!("Item {id}"),
            path: format!("posts/{timestamp}-item-{id}.md"),
        }
    }

    #[test]
    fn test_merge_into_empty() {
        let merged = merge(
            vec![],
            vec![item("1", "202401010000"), item("2", "202401020000")],
            None,
        );
        let ids: Vec<_> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_known_id_is_not_replaced() {
        let existing = vec![item("1", "202401010000")];
        let mut edited = item("1", "202401010000");
        edited.title = "Edited upstream".to_string();

        let merged = merge(existing.clone(), vec![edited], None);
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_duplicate_ids_in_batch_keep_first() {
        let mut second = item("5", "202401050000");
        second.title = "Second copy".to_string();
        let merged = merge(vec![], vec![item("5", "202401050000"), second], None);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Item 5");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let incoming = vec![item("3", "202401030000"), item("1", "202401010000")];
        let once = merge(vec![item("2", "202401020000")], incoming.clone(), Some(10));
        let twice = merge(once.clone(), incoming, Some(10));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_and_truncate_keep_newest() {
        let stamps = [
            "202401010900",
            "202312312359",
            "202402150001",
            "202401011000",
            "202311300000",
        ];
        let incoming: Vec<_> = stamps
            .iter()
            .enumerate()
            .map(|(i, ts)| item(&i.to_string(), ts))
            .collect();

        for n in 0..=6 {
            let merged = merge(vec![], incoming.clone(), Some(n));
            assert_eq!(merged.len(), n.min(stamps.len()));

            let mut expected: Vec<_> = stamps.to_vec();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(n);
            let got: Vec<_> = merged.iter().map(|i| i.timestamp.as_str()).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_unlimited_retention() {
        let incoming: Vec<_> = (0..250)
            .map(|i| item(&i.to_string(), &format!("2024010{}{:04}", i % 10, i)))
            .collect();
        assert_eq!(merge(vec![], incoming, None).len(), 250);
    }

    #[test]
    fn test_legacy_items_without_id_are_kept() {
        let mut legacy = item("", "202301010000");
        legacy.title = "Legacy".to_string();
        let merged = merge(vec![legacy.clone()], vec![item("9", "202401010000")], None);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1], legacy);
        assert!(!known_ids(&merged).contains(""));
    }

    #[tokio::test]
    async fn test_load_missing_manifest_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let items = load_manifest(&tmp.path().join("news.json")).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_manifest_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_manifest(&path).await.unwrap_err();
        assert!(matches!(err, SyncError::Manifest { .. }));
    }

    #[tokio::test]
    async fn test_load_legacy_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news.json");
        std::fs::write(
            &path,
            r#"[{"timestamp": "202401010000", "author": "a", "discord_id": "1", "title": "T", "md": "posts/x.md"}]"#,
        )
        .unwrap();
        let items = load_manifest(&path).await.unwrap();
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].path, "posts/x.md");
    }
}
