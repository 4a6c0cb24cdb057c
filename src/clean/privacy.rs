//! Privacy-focused cleaning strategy.
//!
//! Protects participant identity while preserving analyzable content.
//! Stable sender ids are pseudonymized through a session-scoped SHA-256
//! mapping; display names are shown verbatim (only the id is the durable
//! identifier worth hiding). Level 3 deliberately trades privacy for
//! completeness and shows real identifiers.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use super::format::{reply_preview, TS_MINUTES, TS_SECONDS};
use super::replies::MessageIndex;
use super::Level;
use crate::{ChatInfo, Message, MessageKind};

/// Hex characters of the SHA-256 digest kept in a pseudonym.
const PSEUDONYM_HEX_CHARS: usize = 12;

/// Privacy strategy instance.
///
/// Owns the anonymization map: within one instance the same id always maps
/// to the same `User_<hash>` pseudonym, but pseudonyms are not stable across
/// instances. Construct a fresh cleaner per cleaning pass.
#[derive(Debug)]
pub struct PrivacyCleaner {
    level: Level,
    user_mapping: HashMap<String, String>,
}

impl PrivacyCleaner {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            user_mapping: HashMap::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Cleans one chat.
    ///
    /// Level 1: pseudonym + content only. Level 2: adds timestamps and reply
    /// previews. Level 3: all metadata, real identifiers, service messages.
    pub fn clean(&mut self, chat: &ChatInfo) -> String {
        let mut lines = vec![
            format!("Chat: {}", chat.name),
            format!("Type: {}", chat.chat_type),
            "=".repeat(50),
            String::new(),
        ];

        let index = MessageIndex::new(&chat.messages);

        for message in &chat.messages {
            let cleaned = match self.level {
                Level::One => self.clean_level_1(message),
                Level::Two => self.clean_level_2(message, &index),
                Level::Three => self.clean_level_3(message, &index),
            };

            if !cleaned.trim().is_empty() {
                lines.push(cleaned);
                lines.push(String::new());
            }
        }

        lines.join("\n")
    }

    fn clean_level_1(&mut self, message: &Message) -> String {
        if !message.is_ordinary() {
            return String::new();
        }

        let text = message.text.trim();
        if text.is_empty() {
            return String::new();
        }

        let who = self.pseudonymous_sender(message);
        format!("{who}: {text}")
    }

    fn clean_level_2(&mut self, message: &Message, index: &MessageIndex<'_>) -> String {
        if !message.is_ordinary() {
            return String::new();
        }

        let mut parts = Vec::new();

        if let Some(date) = message.date {
            parts.push(format!("[{}]", date.format(TS_MINUTES)));
        }

        if let Some(target) = message.reply_to_message_id.and_then(|id| index.get(id)) {
            let reply_sender = match &target.from_user {
                Some(name) => name.clone(),
                None => self.anonymize(target.from_id.as_deref().unwrap_or("")),
            };
            if let Some(preview) = reply_preview(&reply_sender, target.text.trim()) {
                parts.push(preview);
            }
        }

        parts.push(format!("{}:", self.pseudonymous_sender(message)));

        let text = message.text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }

        parts.join(" ")
    }

    /// Level 3 keeps real identifiers and also accepts service messages.
    fn clean_level_3(&mut self, message: &Message, index: &MessageIndex<'_>) -> String {
        if !matches!(message.kind, MessageKind::Message | MessageKind::Service) {
            return String::new();
        }

        let mut parts = Vec::new();

        if let Some(date) = message.date {
            parts.push(format!("[{}]", date.format(TS_SECONDS)));
        }

        parts.push(format!("ID:{}", message.id));

        if let Some(reply_id) = message.reply_to_message_id {
            if index.contains(reply_id) {
                parts.push(format!("[Reply to ID:{reply_id}]"));
            }
        }

        parts.push(match (&message.from_user, &message.from_id) {
            (Some(name), Some(id)) => format!("{name} ({id}):"),
            (Some(name), None) => format!("{name}:"),
            (None, Some(id)) => format!("{id}:"),
            (None, None) => "Unknown:".to_string(),
        });

        if message.edited.is_some() {
            parts.push("[EDITED]".to_string());
        }

        if let Some(origin) = &message.forwarded_from {
            parts.push(format!("[Forwarded from: {origin}]"));
        }

        let text = message.text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }

        let reactions = reactions_summary(message);
        if !reactions.is_empty() {
            parts.push(format!("[Reactions: {reactions}]"));
        }

        if let Some(media) = media_info(message) {
            parts.push(format!("[Media: {media}]"));
        }

        parts.join(" ")
    }

    fn pseudonymous_sender(&mut self, message: &Message) -> String {
        if let Some(name) = &message.from_user {
            return name.clone();
        }
        match &message.from_id {
            Some(id) => self.anonymize(id),
            None => "Anonymous".to_string(),
        }
    }

    /// Deterministic, session-scoped pseudonymization.
    ///
    /// First lookup of an id hashes it with SHA-256 and stores
    /// `User_<first 12 hex chars>`; every later lookup returns the stored
    /// mapping. Ids may be sensitive, hence a collision-resistant hash
    /// rather than a fast one.
    fn anonymize(&mut self, user_id: &str) -> String {
        if user_id.is_empty() {
            return "Anonymous".to_string();
        }

        self.user_mapping
            .entry(user_id.to_string())
            .or_insert_with(|| {
                let digest = Sha256::digest(user_id.as_bytes());
                let hex: String = digest
                    .iter()
                    .take(PSEUDONYM_HEX_CHARS / 2)
                    .map(|b| format!("{b:02x}"))
                    .collect();
                format!("User_{hex}")
            })
            .clone()
    }
}

/// `emoji(count)` pairs, space-joined.
fn reactions_summary(message: &Message) -> String {
    message
        .reactions
        .iter()
        .filter_map(|r| {
            let emoji = r.emoji.as_deref()?;
            (r.count > 0).then(|| format!("{emoji}({})", r.count))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable media descriptor for level 3 output.
fn media_info(message: &Message) -> Option<String> {
    let media_type = message.media_type.as_deref()?;

    let info = match media_type {
        "video_file" => match message.duration_seconds {
            Some(d) => format!("Video ({d}s)"),
            None => "Video".to_string(),
        },
        "photo" => "Photo".to_string(),
        "voice_message" => match message.duration_seconds {
            Some(d) => format!("Voice message ({d}s)"),
            None => "Voice message".to_string(),
        },
        "document" => match &message.file_name {
            Some(name) => format!("Document: {name}"),
            None => "Document".to_string(),
        },
        "audio_file" => match (&message.performer, &message.title) {
            (Some(performer), Some(title)) => format!("Audio: {performer} - {title}"),
            (None, Some(title)) => format!("Audio: {title}"),
            _ => "Audio".to_string(),
        },
        other => other.to_string(),
    };

    Some(info)
}
