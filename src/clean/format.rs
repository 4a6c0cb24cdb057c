//! Formatting helpers shared by the cleaning strategies.

use crate::Message;

/// How many characters of a reply target's text are shown in previews.
pub(crate) const REPLY_PREVIEW_CHARS: usize = 50;

/// Full timestamp, used by context output and privacy level 3.
pub(crate) const TS_SECONDS: &str = "%Y-%m-%d %H:%M:%S";

/// Minute-precision timestamp, used by privacy level 2 and size level 3.
pub(crate) const TS_MINUTES: &str = "%Y-%m-%d %H:%M";

/// Compact timestamp for size level 2.
pub(crate) const TS_COMPACT: &str = "%m/%d %H:%M";

/// Sender fallback order: display name, stable id, "Unknown".
pub(crate) fn sender_label(message: &Message) -> &str {
    message
        .from_user
        .as_deref()
        .or(message.from_id.as_deref())
        .unwrap_or("Unknown")
}

/// One-line rendering: `[timestamp] sender: text`.
///
/// Parts without data are omitted; an entirely empty message renders as
/// just `sender:`.
pub(crate) fn format_basic(message: &Message) -> String {
    let mut parts = Vec::new();

    if let Some(date) = message.date {
        parts.push(format!("[{}]", date.format(TS_SECONDS)));
    }

    parts.push(format!("{}:", sender_label(message)));

    let text = message.text.trim();
    if !text.is_empty() {
        parts.push(text.to_string());
    }

    parts.join(" ")
}

/// Reply-context preview: `[Reply to <sender>: <first 50 chars>...]`.
///
/// Returns `None` when the target has no text to preview.
pub(crate) fn reply_preview(sender: &str, target_text: &str) -> Option<String> {
    let preview = truncate_chars(target_text, REPLY_PREVIEW_CHARS);
    if preview.is_empty() {
        return None;
    }
    Some(format!("[Reply to {sender}: {preview}...]"))
}

/// Truncates to at most `limit` characters, respecting UTF-8 boundaries.
pub(crate) fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_sender_label_fallback() {
        let named = Message::new(1, MessageKind::Message).with_from_user("Alice");
        assert_eq!(sender_label(&named), "Alice");

        let id_only = Message::new(1, MessageKind::Message).with_from_id("user1");
        assert_eq!(sender_label(&id_only), "user1");

        let anon = Message::new(1, MessageKind::Message);
        assert_eq!(sender_label(&anon), "Unknown");
    }

    #[test]
    fn test_format_basic() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let msg = Message::new(1, MessageKind::Message)
            .with_from_user("Alice")
            .with_text("hello")
            .with_date(ts);
        assert_eq!(format_basic(&msg), "[2024-06-15 12:00:00] Alice: hello");
    }

    #[test]
    fn test_format_basic_without_date() {
        let msg = Message::new(1, MessageKind::Message)
            .with_from_user("Alice")
            .with_text("hello");
        assert_eq!(format_basic(&msg), "Alice: hello");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("привет", 3), "при");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_reply_preview() {
        let long = "x".repeat(80);
        let preview = reply_preview("Bob", &long).unwrap();
        assert_eq!(preview, format!("[Reply to Bob: {}...]", "x".repeat(50)));

        assert!(reply_preview("Bob", "").is_none());
    }
}
