//! Data models for channel messages and the news index built from them.
//!
//! - [`RawMessage`], [`Author`], [`Embed`]: the subset of a Discord message
//!   object this application reads. Every field is optional on the wire.
//! - [`NewsItem`]: one entry of the persisted manifest.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Author name used when a message has no usable author.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A channel message as returned by the messages endpoint.
///
/// Only best-effort field access is performed: missing, `null` or mistyped
/// fields deserialize to their defaults and unknown fields are ignored, so
/// one odd message never spoils the rest of the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Author>,
    /// ISO-8601 timestamp with offset, e.g. `2024-01-05T12:34:56.789000+00:00`.
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    /// Unreadable entries become empty embeds so positions are kept.
    #[serde(default, deserialize_with = "lenient_embeds")]
    pub embeds: Vec<Embed>,
}

impl RawMessage {
    /// Author username, or [`UNKNOWN_AUTHOR`] when absent.
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.username.as_deref())
            .unwrap_or(UNKNOWN_AUTHOR)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub username: Option<String>,
}

/// Rich content attached to a message (link previews and the like).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One entry of the manifest.
///
/// Created the first time a message id is seen and never updated afterwards.
/// Older manifests stored the id as `discord_id` and the post path as `md`;
/// both spellings are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// `YYYYMMDDHHMM`, fixed width so string order is chronological order.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default = "unknown_author")]
    pub author: String,
    #[serde(default, alias = "discord_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Post file location relative to the output directory.
    #[serde(default, alias = "md")]
    pub path: String,
}

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_embeds<'de, D>(deserializer: D) -> Result<Vec<Embed>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(entries) => Ok(entries
            .into_iter()
            .map(|entry| serde_json::from_value(entry).unwrap_or_default())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_message_deserialization() {
        let json = r#"{
            "id": "1193512345678901234",
            "type": 0,
            "author": {"id": "1", "username": "newsbot", "global_name": "News Bot"},
            "timestamp": "2024-01-05T12:34:56.789000+00:00",
            "content": "Release v2\nDetails",
            "embeds": [{"url": "https://example.com", "type": "link"}]
        }"#;

        let msg: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "1193512345678901234");
        assert_eq!(msg.author_name(), "newsbot");
        assert_eq!(msg.timestamp, "2024-01-05T12:34:56.789000+00:00");
        assert_eq!(msg.embeds.len(), 1);
        assert_eq!(msg.embeds[0].url.as_deref(), Some("https://example.com"));
        assert_eq!(msg.embeds[0].title, None);
    }

    #[test]
    fn test_raw_message_missing_and_null_fields() {
        let msg: RawMessage =
            serde_json::from_str(r#"{"id": "7", "author": null, "content": null, "embeds": null}"#)
                .unwrap();
        assert_eq!(msg.id, "7");
        assert_eq!(msg.author_name(), UNKNOWN_AUTHOR);
        assert_eq!(msg.content, "");
        assert!(msg.embeds.is_empty());
        assert_eq!(msg.timestamp, "");
    }

    #[test]
    fn test_null_embed_entry_keeps_page() {
        let json = r#"[
            {"id": "2", "timestamp": "2024-01-05T12:00:00+00:00", "content": "A", "embeds": [null]},
            {"id": "1", "timestamp": "2024-01-04T12:00:00+00:00", "content": "B", "embeds": [{"url": "https://example.com"}]}
        ]"#;

        let messages: Vec<RawMessage> = serde_json::from_str(json).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].embeds.len(), 1);
        assert_eq!(messages[0].embeds[0].url, None);
        assert_eq!(messages[1].embeds[0].url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_mistyped_optional_fields_degrade() {
        let json = r#"{
            "id": "3",
            "author": "not-an-object",
            "content": 17,
            "embeds": {"url": "https://example.com"}
        }"#;

        let msg: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "3");
        assert_eq!(msg.author_name(), UNKNOWN_AUTHOR);
        assert_eq!(msg.content, "");
        assert!(msg.embeds.is_empty());
    }

    #[test]
    fn test_mistyped_embed_field_degrades() {
        let msg: RawMessage =
            serde_json::from_str(r#"{"embeds": [{"url": 5, "description": "Changelog"}]}"#).unwrap();
        assert_eq!(msg.embeds.len(), 1);
        assert_eq!(msg.embeds[0].description, None);
    }

    #[test]
    fn test_author_without_username() {
        let msg: RawMessage = serde_json::from_str(r#"{"author": {"id": "1"}}"#).unwrap();
        assert_eq!(msg.author_name(), UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_news_item_field_names() {
        let item = NewsItem {
            timestamp: "202401051234".to_string(),
            author: "newsbot".to_string(),
            id: "99".to_string(),
            title: "Release v2".to_string(),
            path: "posts/202401051234-release-v2.md".to_string(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["timestamp"], "202401051234");
        assert_eq!(value["author"], "newsbot");
        assert_eq!(value["id"], "99");
        assert_eq!(value["title"], "Release v2");
        assert_eq!(value["path"], "posts/202401051234-release-v2.md");
    }

    #[test]
    fn test_news_item_legacy_keys() {
        let json = r#"{
            "timestamp": "202312310900",
            "author": "mod",
            "discord_id": "12",
            "title": "Old news",
            "md": "posts/202312310900-old-news.md"
        }"#;

        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "12");
        assert_eq!(item.path, "posts/202312310900-old-news.md");
    }

    #[test]
    fn test_news_item_without_id() {
        let item: NewsItem = serde_json::from_str(r#"{"timestamp": "202312310900"}"#).unwrap();
        assert_eq!(item.id, "");
        assert_eq!(item.author, UNKNOWN_AUTHOR);
    }
}
