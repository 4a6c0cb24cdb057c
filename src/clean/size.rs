//! Size-focused cleaning strategy.
//!
//! Minimizes output bytes while keeping signal: short noise messages are
//! dropped, metadata collapses to compact tags, and at level 3 media and
//! reactions shrink to single glyphs and counts.

use super::format::{truncate_chars, TS_COMPACT, TS_MINUTES};
use super::replies::MessageIndex;
use super::Level;
use crate::message::TextEntity;
use crate::{ChatInfo, Message, MessageKind};

/// Minimum text length (in characters) kept at level 1. Anything shorter is
/// treated as noise: bare reactions, "ok", bot commands.
const MIN_TEXT_CHARS: usize = 3;

/// Hosts whose links survive the level-2 filter.
const IMPORTANT_DOMAINS: &[&str] = &["github.com", "youtube.com", "twitter.com", "telegram.org"];

/// Document filenames longer than this are shortened at level 3.
const MAX_FILE_NAME_CHARS: usize = 20;

/// Size strategy instance. Stateless across messages.
#[derive(Debug)]
pub struct SizeCleaner {
    level: Level,
}

impl SizeCleaner {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Cleans one chat.
    ///
    /// Level 1: text only. Level 2: compact date/sender plus filtered links.
    /// Level 3: widened type filter plus compact media, reaction, and entity
    /// tags.
    pub fn clean(&self, chat: &ChatInfo) -> String {
        let mut lines = Vec::new();

        // Level 1 output stays headerless to save bytes.
        if self.level >= Level::Two {
            lines.push(format!("Chat: {}", chat.name));
            lines.push("=".repeat(30));
            lines.push(String::new());
        }

        let index = MessageIndex::new(&chat.messages);

        for message in &chat.messages {
            let cleaned = match self.level {
                Level::One => clean_level_1(message),
                Level::Two => clean_level_2(message),
                Level::Three => clean_level_3(message, &index),
            };

            if !cleaned.trim().is_empty() {
                lines.push(cleaned);
            }
        }

        lines.join("\n")
    }
}

fn clean_level_1(message: &Message) -> String {
    if !message.is_ordinary() {
        return String::new();
    }

    let text = message.text.trim();

    // Textless messages may still carry signal in their entities.
    if text.is_empty() {
        let entity_texts: Vec<&str> = message
            .text_entities
            .iter()
            .filter(|e| e.is_link() || e.is_mention())
            .map(|e| e.text.as_str())
            .collect();
        return entity_texts.join(" ");
    }

    if text.chars().count() < MIN_TEXT_CHARS {
        return String::new();
    }

    text.to_string()
}

fn clean_level_2(message: &Message) -> String {
    if !message.is_ordinary() {
        return String::new();
    }

    let mut parts = Vec::new();

    if let Some(date) = message.date {
        parts.push(format!("[{}]", date.format(TS_COMPACT)));
    }

    parts.push(format!("{}:", compact_sender(message)));

    let text = message.text.trim();
    if !text.is_empty() {
        parts.push(text.to_string());
    }

    let important: Vec<&str> = message
        .text_entities
        .iter()
        .filter(|e| e.is_link() && is_important_link(e))
        .map(|e| e.text.as_str())
        .collect();
    if !important.is_empty() {
        parts.push(format!("[Links: {}]", important.join(" | ")));
    }

    parts.join(" ")
}

fn clean_level_3(message: &Message, index: &MessageIndex<'_>) -> String {
    if !matches!(
        message.kind,
        MessageKind::Message
            | MessageKind::Photo
            | MessageKind::Video
            | MessageKind::Document
            | MessageKind::Voice
    ) {
        return String::new();
    }

    let mut parts = Vec::new();

    if let Some(date) = message.date {
        parts.push(format!("[{}]", date.format(TS_MINUTES)));
    }

    if message.edited.is_some() {
        parts.push("[EDITED]".to_string());
    }

    // Bare marker, no content: the reply target is elsewhere in the output.
    if let Some(reply_id) = message.reply_to_message_id {
        if index.contains(reply_id) {
            parts.push("[REPLY]".to_string());
        }
    }

    parts.push(format!("{}:", compact_sender(message)));

    let text = message.text.trim();
    if !text.is_empty() {
        parts.push(text.to_string());
    }

    if let Some(media) = media_glyph(message) {
        parts.push(format!("[{media}]"));
    }

    let reactions = top_reactions(message, 3);
    if !reactions.is_empty() {
        parts.push(format!("[{reactions}]"));
    }

    let entities = entities_info(message);
    if !entities.is_empty() {
        parts.push(format!("[{entities}]"));
    }

    parts.join(" ")
}

fn compact_sender(message: &Message) -> &str {
    message
        .from_user
        .as_deref()
        .or(message.from_id.as_deref())
        .unwrap_or("Unknown")
}

fn is_important_link(entity: &TextEntity) -> bool {
    let text = entity.text.to_lowercase();
    IMPORTANT_DOMAINS.iter().any(|domain| text.contains(domain))
}

/// Single-glyph media tag with duration or shortened filename where relevant.
fn media_glyph(message: &Message) -> Option<String> {
    let media_type = message.media_type.as_deref()?;

    let glyph = match media_type {
        "photo" => "📷",
        "video_file" => "🎥",
        "voice_message" => "🎤",
        "audio_file" => "🎵",
        "document" => "📄",
        "sticker" => "🎭",
        "animation" => "🎬",
        other => other,
    };

    let mut desc = glyph.to_string();

    if matches!(media_type, "video_file" | "voice_message" | "audio_file") {
        if let Some(duration) = message.duration_seconds {
            desc.push_str(&format!(" {duration}s"));
        }
    }

    if media_type == "document" {
        if let Some(file_name) = &message.file_name {
            let shown = if file_name.chars().count() > MAX_FILE_NAME_CHARS {
                format!("{}...", truncate_chars(file_name, MAX_FILE_NAME_CHARS - 3))
            } else {
                file_name.clone()
            };
            desc.push_str(&format!(" {shown}"));
        }
    }

    Some(desc)
}

/// Up to `limit` reactions by descending count, as `emoji<count>` pairs.
fn top_reactions(message: &Message, limit: usize) -> String {
    let mut reactions: Vec<_> = message
        .reactions
        .iter()
        .filter(|r| r.emoji.is_some() && r.count > 0)
        .collect();
    reactions.sort_by(|a, b| b.count.cmp(&a.count));

    reactions
        .iter()
        .take(limit)
        .filter_map(|r| r.emoji.as_deref().map(|e| format!("{e}{}", r.count)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Terse entity-count summary: "2 links, 1 mention".
///
/// Non-link kinds are counted in first-seen order so output is
/// deterministic for a given message.
fn entities_info(message: &Message) -> String {
    if message.text_entities.is_empty() {
        return String::new();
    }

    let mut link_count = 0usize;
    let mut kind_counts: Vec<(&str, usize)> = Vec::new();

    for entity in &message.text_entities {
        if entity.is_link() {
            link_count += 1;
        } else if let Some(slot) = kind_counts.iter_mut().find(|(k, _)| *k == entity.kind) {
            slot.1 += 1;
        } else {
            kind_counts.push((&entity.kind, 1));
        }
    }

    let mut parts = Vec::new();
    if link_count > 0 {
        parts.push(format!("{link_count} links"));
    }
    for (kind, count) in kind_counts {
        parts.push(format!("{count} {kind}"));
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reaction;
    use chrono::{TimeZone, Utc};

    fn chat(messages: Vec<Message>) -> ChatInfo {
        ChatInfo::new("Test", "personal_chat", "1", messages, "test.json")
    }

    fn link(text: &str) -> TextEntity {
        TextEntity {
            kind: "link".into(),
            text: text.into(),
            href: None,
            user_id: None,
        }
    }

    #[test]
    fn test_level_1_drops_short_messages() {
        let cleaner = SizeCleaner::new(Level::One);
        let output = cleaner.clean(&chat(vec![
            Message::new(1, MessageKind::Message).with_text("ok"),
            Message::new(2, MessageKind::Message).with_text("this stays"),
        ]));
        assert!(!output.contains("ok"));
        assert!(output.contains("this stays"));
    }

    #[test]
    fn test_level_1_textless_message_falls_back_to_entities() {
        let cleaner = SizeCleaner::new(Level::One);
        let mut msg = Message::new(1, MessageKind::Message);
        msg.text_entities = vec![
            link("https://github.com/rust-lang/rust"),
            TextEntity {
                kind: "mention".into(),
                text: "@alice".into(),
                href: None,
                user_id: None,
            },
            TextEntity {
                kind: "hashtag".into(),
                text: "#skipme".into(),
                href: None,
                user_id: None,
            },
        ];
        let output = cleaner.clean(&chat(vec![msg]));
        assert_eq!(output, "https://github.com/rust-lang/rust @alice");
    }

    #[test]
    fn test_level_1_has_no_header() {
        let cleaner = SizeCleaner::new(Level::One);
        let output = cleaner.clean(&chat(vec![
            Message::new(1, MessageKind::Message).with_text("hello"),
        ]));
        assert!(!output.contains("Chat:"));
    }

    #[test]
    fn test_level_2_filters_unimportant_links() {
        let cleaner = SizeCleaner::new(Level::Two);
        let mut msg = Message::new(1, MessageKind::Message)
            .with_from_user("Alice")
            .with_text("look");
        msg.text_entities = vec![
            link("https://github.com/rust-lang/rust"),
            link("https://random-spam.example"),
        ];
        let output = cleaner.clean(&chat(vec![msg]));
        assert!(output.contains("[Links: https://github.com/rust-lang/rust]"));
        assert!(!output.contains("random-spam"));
    }

    #[test]
    fn test_level_2_compact_date() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 9, 5, 0).unwrap();
        let cleaner = SizeCleaner::new(Level::Two);
        let output = cleaner.clean(&chat(vec![
            Message::new(1, MessageKind::Message)
                .with_from_user("Alice")
                .with_date(ts)
                .with_text("morning"),
        ]));
        assert!(output.contains("[06/15 09:05] Alice: morning"));
        assert!(output.contains("Chat: Test"));
    }

    #[test]
    fn test_level_3_widens_type_filter() {
        let cleaner = SizeCleaner::new(Level::Three);
        let mut photo = Message::new(1, MessageKind::Photo).with_from_user("Alice");
        photo.media_type = Some("photo".to_string());
        let sticker = Message::new(2, MessageKind::Sticker).with_from_user("Bob");
        let output = cleaner.clean(&chat(vec![photo, sticker]));
        assert!(output.contains("📷"));
        assert!(!output.contains("Bob"));
    }

    #[test]
    fn test_level_3_reply_marker_requires_resolvable_target() {
        let cleaner = SizeCleaner::new(Level::Three);
        let output = cleaner.clean(&chat(vec![
            Message::new(1, MessageKind::Message)
                .with_from_user("Alice")
                .with_text("first"),
            Message::new(2, MessageKind::Message)
                .with_from_user("Bob")
                .with_text("resolvable")
                .with_reply_to(1),
            Message::new(3, MessageKind::Message)
                .with_from_user("Eve")
                .with_text("dangling")
                .with_reply_to(999),
        ]));
        assert!(output.contains("[REPLY] Bob:"));
        assert!(!output.contains("[REPLY] Eve:"));
    }

    #[test]
    fn test_level_3_top_reactions_capped_and_sorted() {
        let cleaner = SizeCleaner::new(Level::Three);
        let msg = Message::new(1, MessageKind::Message)
            .with_from_user("Alice")
            .with_text("popular")
            .with_reactions(vec![
                Reaction::new("😂", 1),
                Reaction::new("👍", 9),
                Reaction::new("❤", 4),
                Reaction::new("🔥", 2),
            ]);
        let output = cleaner.clean(&chat(vec![msg]));
        assert!(output.contains("[👍9 ❤4 🔥2]"));
        assert!(!output.contains("😂"));
    }

    #[test]
    fn test_level_3_entity_summary() {
        let cleaner = SizeCleaner::new(Level::Three);
        let mut msg = Message::new(1, MessageKind::Message)
            .with_from_user("Alice")
            .with_text("links and things");
        msg.text_entities = vec![
            link("https://a.example"),
            link("https://b.example"),
            TextEntity {
                kind: "mention".into(),
                text: "@bob".into(),
                href: None,
                user_id: None,
            },
        ];
        let output = cleaner.clean(&chat(vec![msg]));
        assert!(output.contains("[2 links, 1 mention]"));
    }

    #[test]
    fn test_media_glyph_durations_and_filenames() {
        let mut voice = Message::new(1, MessageKind::Voice);
        voice.media_type = Some("voice_message".to_string());
        voice.duration_seconds = Some(12);
        assert_eq!(media_glyph(&voice).as_deref(), Some("🎤 12s"));

        let mut doc = Message::new(2, MessageKind::Document);
        doc.media_type = Some("document".to_string());
        doc.file_name = Some("a_very_long_document_name.pdf".to_string());
        let glyph = media_glyph(&doc).unwrap();
        assert!(glyph.starts_with("📄 "));
        assert!(glyph.ends_with("..."));
    }
}
