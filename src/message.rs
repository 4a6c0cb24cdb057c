//! Normalized message model for Telegram exports.
//!
//! This module provides [`Message`], the normalized representation of a single
//! export record. The parser converts raw export JSON into this structure;
//! the cleaning strategies consume it without touching the raw format again.
//!
//! # Overview
//!
//! A message consists of:
//! - **Required**: `id` and `kind`
//! - **Optional**: timestamps, authorship, reply linkage, annotations, media
//!
//! # Examples
//!
//! ```
//! use chatscrub::{Message, MessageKind};
//!
//! let msg = Message::new(1, MessageKind::Message)
//!     .with_from_user("Alice")
//!     .with_text("Hello, world!");
//! assert_eq!(msg.text, "Hello, world!");
//! assert!(msg.is_ordinary());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of export record kinds this pipeline supports.
///
/// Records whose `type` field is not one of these are dropped at parse time
/// and never appear in a [`ChatInfo`](crate::ChatInfo) message sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// An ordinary text message.
    Message,
    /// A service message (pins, joins, title changes).
    Service,
    Photo,
    #[serde(rename = "video", alias = "video_file")]
    Video,
    #[serde(rename = "voice_message")]
    Voice,
    #[serde(rename = "audio_file")]
    Audio,
    Document,
    Sticker,
    Animation,
}

impl MessageKind {
    /// Maps a raw export `type` string to a supported kind.
    ///
    /// Returns `None` for unsupported kinds, which the parser skips.
    pub fn from_export(s: &str) -> Option<Self> {
        match s {
            "message" => Some(Self::Message),
            "service" => Some(Self::Service),
            "photo" => Some(Self::Photo),
            "video" | "video_file" => Some(Self::Video),
            "voice_message" => Some(Self::Voice),
            "audio_file" => Some(Self::Audio),
            "document" => Some(Self::Document),
            "sticker" => Some(Self::Sticker),
            "animation" => Some(Self::Animation),
            _ => None,
        }
    }
}

/// A typed span inside a message's text (link, mention, hashtag, ...).
///
/// The `kind` string is kept verbatim from the export; the set of entity
/// types Telegram emits is open-ended, so a closed enum would go stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    /// Entity type as exported: "link", "mention", "mention_name", "hashtag", ...
    #[serde(rename = "type")]
    pub kind: String,

    /// Display text of the span.
    #[serde(default)]
    pub text: String,

    /// Target URL for "text_link" entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub href: Option<String>,

    /// User id for "mention_name" entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl TextEntity {
    pub fn is_link(&self) -> bool {
        self.kind == "link"
    }

    pub fn is_mention(&self) -> bool {
        self.kind == "mention" || self.kind == "mention_name"
    }
}

/// One of the sample reactors Telegram attaches to a reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReactionActor {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub from_user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub from_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// An emoji reaction with its count and sample reactors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Reaction type as exported: "emoji" or "custom_emoji".
    #[serde(rename = "type")]
    pub kind: String,

    /// The emoji glyph; absent for custom emoji reactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub emoji: Option<String>,

    /// How many participants reacted with this emoji.
    pub count: u32,

    /// Most recent reactors, as exported.
    #[serde(default)]
    pub recent: Vec<ReactionActor>,
}

impl Reaction {
    pub fn new(emoji: impl Into<String>, count: u32) -> Self {
        Self {
            kind: "emoji".to_string(),
            emoji: Some(emoji.into()),
            count,
            recent: Vec::new(),
        }
    }
}

/// A normalized Telegram export record.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `id` | `i64` | Unique within a chat, not necessarily contiguous |
/// | `kind` | [`MessageKind`] | Record kind; unsupported kinds never reach this type |
/// | `date` | `Option<DateTime<Utc>>` | When the message was sent |
/// | `edited` | `Option<DateTime<Utc>>` | Present iff the message was modified |
/// | `from_user` | `Option<String>` | Display name |
/// | `from_id` | `Option<String>` | Stable sender identifier |
/// | `text` | `String` | Flattened plain text (may be empty) |
/// | `reply_to_message_id` | `Option<i64>` | Weak back-reference into the same chat |
///
/// `reply_to_message_id` is a lookup key, not a pointer: the target may have
/// been pruned upstream, and failed resolution means "no reply context", not
/// an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: MessageKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub edited: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub from_user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub from_id: Option<String>,

    /// Flattened plain text. Mixed string/entity arrays in the export are
    /// concatenated into one string during parsing.
    #[serde(default)]
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reply_to_message_id: Option<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub text_entities: Vec<TextEntity>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub forwarded_from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub via_bot: Option<String>,

    // Media descriptors, present when the record carries media.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub media_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub duration_seconds: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub height: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub file_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub file_size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub performer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub title: Option<String>,
}

impl Message {
    /// Creates a message with only identity fields set.
    pub fn new(id: i64, kind: MessageKind) -> Self {
        Self {
            id,
            kind,
            date: None,
            edited: None,
            from_user: None,
            from_id: None,
            text: String::new(),
            reply_to_message_id: None,
            text_entities: Vec::new(),
            reactions: Vec::new(),
            forwarded_from: None,
            via_bot: None,
            media_type: None,
            mime_type: None,
            duration_seconds: None,
            width: None,
            height: None,
            file_name: None,
            file_size: None,
            performer: None,
            title: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_from_user(mut self, name: impl Into<String>) -> Self {
        self.from_user = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_from_id(mut self, id: impl Into<String>) -> Self {
        self.from_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_edited(mut self, edited: DateTime<Utc>) -> Self {
        self.edited = Some(edited);
        self
    }

    #[must_use]
    pub fn with_reply_to(mut self, target: i64) -> Self {
        self.reply_to_message_id = Some(target);
        self
    }

    #[must_use]
    pub fn with_reactions(mut self, reactions: Vec<Reaction>) -> Self {
        self.reactions = reactions;
        self
    }

    /// Returns `true` for ordinary text messages (kind `message`).
    pub fn is_ordinary(&self) -> bool {
        self.kind == MessageKind::Message
    }

    /// Returns `true` if the text is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_from_export() {
        assert_eq!(MessageKind::from_export("message"), Some(MessageKind::Message));
        assert_eq!(MessageKind::from_export("voice_message"), Some(MessageKind::Voice));
        assert_eq!(MessageKind::from_export("video_file"), Some(MessageKind::Video));
        assert_eq!(MessageKind::from_export("unknown_kind"), None);
        assert_eq!(MessageKind::from_export(""), None);
    }

    #[test]
    fn test_message_builder() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let msg = Message::new(5, MessageKind::Message)
            .with_text("hi")
            .with_from_user("Alice")
            .with_from_id("user100")
            .with_date(ts)
            .with_reply_to(4);

        assert_eq!(msg.id, 5);
        assert_eq!(msg.text, "hi");
        assert_eq!(msg.from_user.as_deref(), Some("Alice"));
        assert_eq!(msg.reply_to_message_id, Some(4));
        assert_eq!(msg.date, Some(ts));
        assert!(msg.edited.is_none());
    }

    #[test]
    fn test_message_is_empty() {
        assert!(Message::new(1, MessageKind::Message).is_empty());
        assert!(Message::new(1, MessageKind::Message).with_text("   ").is_empty());
        assert!(!Message::new(1, MessageKind::Message).with_text("x").is_empty());
    }

    #[test]
    fn test_entity_predicates() {
        let link = TextEntity {
            kind: "link".into(),
            text: "https://example.com".into(),
            href: None,
            user_id: None,
        };
        assert!(link.is_link());
        assert!(!link.is_mention());

        let mention = TextEntity {
            kind: "mention_name".into(),
            text: "Alice".into(),
            href: None,
            user_id: Some(100),
        };
        assert!(mention.is_mention());
    }

    #[test]
    fn test_message_serialization_skips_none() {
        let msg = Message::new(1, MessageKind::Message).with_text("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"id\":1"));
        assert!(!json.contains("reply_to_message_id"));
        assert!(!json.contains("media_type"));
    }

    #[test]
    fn test_message_kind_roundtrip() {
        let json = serde_json::to_string(&MessageKind::Voice).unwrap();
        assert_eq!(json, "\"voice_message\"");
        let back: MessageKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MessageKind::Voice);
    }
}
