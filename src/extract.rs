//! Turning channel messages into news posts.
//!
//! A message is treated as news when it has any non-blank content. The first
//! meaningful line becomes the title and the rest becomes the body, except
//! that a leading greeting aimed at `@everyone` (e.g. `"Good day @everyone,"`)
//! is dropped so the headline underneath it becomes the title.
//!
//! The first embed of a message, if any, is summarised and appended to the
//! body.

use crate::models::{Embed, RawMessage};

/// Title used when a message yields an empty one.
pub const DEFAULT_TITLE: &str = "News";

const EVERYONE_MENTION: &str = "@everyone";

/// Title and body extracted from a message's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub body: String,
}

/// Split message content into a title and a body.
///
/// Returns `None` when the content has no non-blank line, meaning the
/// message is not a news item.
pub fn extract_title_body(content: &str) -> Option<Extracted> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    let lines: Vec<&str> = content
        .split(is_line_break)
        .filter(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect();
    let first = lines.first()?.trim();

    let (title, mut body) = if is_greeting(first) && lines.len() > 1 {
        (lines[1].trim(), join_lines(&lines[2..]))
    } else {
        (first, join_lines(&lines[1..]))
    };

    if body.is_empty() && lines.len() > 1 {
        body = join_lines(&lines[1..]);
    }

    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    Some(Extracted {
        title: title.to_string(),
        body,
    })
}

/// Line boundaries recognised in message content. A `\r\n` pair yields an
/// extra empty piece, which the blank-line filter drops.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_greeting(line: &str) -> bool {
    line.contains(EVERYONE_MENTION) && line.ends_with(',')
}

fn join_lines(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

/// Summarise the first embed as plain text.
///
/// Parts, in order: the url; the title when no url was included; the
/// description. Non-empty parts are separated by a blank line. Embeds after
/// the first are ignored.
pub fn embed_summary(embeds: &[Embed]) -> String {
    let Some(embed) = embeds.first() else {
        return String::new();
    };

    let url = embed.url.as_deref().unwrap_or_default();
    let title = embed.title.as_deref().unwrap_or_default().trim();
    let description = embed.description.as_deref().unwrap_or_default().trim();

    let mut parts = Vec::new();
    if !url.is_empty() {
        parts.push(url);
    }
    if !title.is_empty() && url.is_empty() {
        parts.push(title);
    }
    if !description.is_empty() {
        parts.push(description);
    }
    parts.join("\n\n").trim().to_string()
}

/// Extract a post from a message, with its embed summary appended to the body.
pub fn extract_post(message: &RawMessage) -> Option<Extracted> {
    let mut extracted = extract_title_body(&message.content)?;

    let extra = embed_summary(&message.embeds);
    if !extra.is_empty() {
        extracted.body = format!("{}\n\n{}", extracted.body, extra)
            .trim()
            .to_string();
    }
    Some(extracted)
}
