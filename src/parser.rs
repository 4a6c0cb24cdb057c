//! Telegram JSON export parser.
//!
//! Converts a raw export document into a [`ChatInfo`] with normalized
//! [`Message`] records.
//!
//! Telegram Desktop exports chats as JSON with the following structure:
//!
//! ```json
//! {
//!   "name": "Chat Name",
//!   "type": "personal_chat",
//!   "id": 123456,
//!   "messages": [
//!     {
//!       "id": 12345,
//!       "type": "message",
//!       "date": "2024-06-15T12:00:00",
//!       "from": "Sender Name",
//!       "from_id": "user100",
//!       "text": "Hello" ,
//!       "text_entities": [{"type": "link", "text": "https://example.com"}],
//!       "reply_to_message_id": 12344
//!     }
//!   ]
//! }
//! ```
//!
//! The `text` field may also be an array mixing plain strings with entity
//! objects; it is flattened to one string.
//!
//! # Failure policy
//!
//! Structural problems (unreadable file, empty input, invalid JSON, missing
//! top-level fields) are fatal and surface as [`ChatscrubError`]. Problems
//! local to one message, entity, or timestamp degrade gracefully: the unit
//! is skipped with a `tracing` warning and the rest of the export parses.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::encoding::decode_bytes;
use crate::error::{ChatscrubError, Result};
use crate::message::{Message, MessageKind, Reaction, ReactionActor, TextEntity};
use crate::ChatInfo;

/// Parses a Telegram export file.
///
/// Reads the whole file eagerly, so the handle is released before any
/// parsing begins, on success and failure alike.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ChatInfo> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let source = path.display().to_string();

    parse_bytes(&bytes, &source).map_err(|err| match err {
        ChatscrubError::Parse { source, path: None } => {
            ChatscrubError::parse(source, Some(path.to_path_buf()))
        }
        other => other,
    })
}

/// Parses raw export bytes, recovering from non-UTF-8 encodings.
///
/// `source` is a provenance label (usually the file path) recorded on the
/// resulting [`ChatInfo`] and used in log output.
pub fn parse_bytes(bytes: &[u8], source: &str) -> Result<ChatInfo> {
    if bytes.is_empty() {
        return Err(ChatscrubError::empty_export(source));
    }
    let text = decode_bytes(bytes);
    parse_str(&text, source)
}

/// Parses export text that is already decoded.
pub fn parse_str(text: &str, source: &str) -> Result<ChatInfo> {
    if text.trim().is_empty() {
        return Err(ChatscrubError::empty_export(source));
    }

    let data: Value = serde_json::from_str(text)?;
    let raw_messages = validate_export(&data)?;

    let name = data
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown Chat")
        .to_string();
    let chat_type = data
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let chat_id = value_to_string(data.get("id")).unwrap_or_else(|| "0".to_string());

    let mut messages = Vec::with_capacity(raw_messages.len());
    for raw in raw_messages {
        if let Some(message) = build_message(raw) {
            messages.push(message);
        }
    }

    info!(count = messages.len(), source, "parsed Telegram export");
    Ok(ChatInfo::new(name, chat_type, chat_id, messages, source))
}

/// Checks the top-level shape of an export document and returns its raw
/// message array.
///
/// Required: `name`, `type`, `id`, and a non-empty `messages` array whose
/// first entry is an object with an `id` field.
fn validate_export(data: &Value) -> Result<&Vec<Value>> {
    let Some(obj) = data.as_object() else {
        return Err(ChatscrubError::invalid_format("top level is not an object"));
    };

    for key in ["name", "type", "id", "messages"] {
        if !obj.contains_key(key) {
            return Err(ChatscrubError::invalid_format(format!(
                "missing required field '{key}'"
            )));
        }
    }

    let Some(messages) = obj.get("messages").and_then(Value::as_array) else {
        return Err(ChatscrubError::invalid_format("'messages' is not an array"));
    };
    if messages.is_empty() {
        return Err(ChatscrubError::invalid_format("'messages' array is empty"));
    }

    let first = &messages[0];
    if !first.is_object() || first.get("id").is_none() {
        return Err(ChatscrubError::invalid_format(
            "first message entry has no 'id' field",
        ));
    }

    Ok(messages)
}

/// Builds one normalized message from a raw record.
///
/// Returns `None` (and logs) when the record is of an unsupported kind or is
/// too malformed to carry identity. Partial success is the rule: a bad
/// nested field costs that field, not the message; a bad message costs that
/// message, not the parse.
fn build_message(raw: &Value) -> Option<Message> {
    let Some(obj) = raw.as_object() else {
        warn!("skipping non-object message record");
        return None;
    };

    let kind_str = obj.get("type").and_then(Value::as_str).unwrap_or("");
    let Some(kind) = MessageKind::from_export(kind_str) else {
        debug!(kind = kind_str, "skipping unsupported message type");
        return None;
    };

    let Some(id) = obj.get("id").and_then(Value::as_i64) else {
        warn!("skipping message record without a numeric id");
        return None;
    };

    let mut message = Message::new(id, kind);
    message.date = parse_record_date(obj.get("date"), obj.get("date_unixtime"));
    message.edited = parse_record_date(obj.get("edited"), obj.get("edited_unixtime"));
    message.from_user = obj.get("from").and_then(Value::as_str).map(str::to_owned);
    message.from_id = value_to_string(obj.get("from_id"));
    message.text = extract_text(obj.get("text"));
    message.reply_to_message_id = obj.get("reply_to_message_id").and_then(Value::as_i64);
    message.text_entities = parse_entities(obj.get("text_entities"));
    message.reactions = parse_reactions(obj.get("reactions"));
    message.forwarded_from = value_to_string(obj.get("forwarded_from"));
    message.via_bot = obj.get("via_bot").and_then(Value::as_str).map(str::to_owned);

    message.media_type = obj.get("media_type").and_then(Value::as_str).map(str::to_owned);
    message.mime_type = obj.get("mime_type").and_then(Value::as_str).map(str::to_owned);
    message.duration_seconds = obj
        .get("duration_seconds")
        .and_then(Value::as_u64)
        .and_then(|d| u32::try_from(d).ok());
    message.width = obj
        .get("width")
        .and_then(Value::as_u64)
        .and_then(|w| u32::try_from(w).ok());
    message.height = obj
        .get("height")
        .and_then(Value::as_u64)
        .and_then(|h| u32::try_from(h).ok());
    message.file_name = obj.get("file_name").and_then(Value::as_str).map(str::to_owned);
    message.file_size = obj.get("file_size").and_then(Value::as_u64);
    message.performer = obj.get("performer").and_then(Value::as_str).map(str::to_owned);
    message.title = obj.get("title").and_then(Value::as_str).map(str::to_owned);

    Some(message)
}

/// Flattens Telegram's `text` field into one plain string.
///
/// The field can be:
/// - A simple string: `"Hello"`
/// - An array mixing strings and entity objects:
///   `["Text ", {"type": "link", "text": "https://example.com"}]`
fn extract_text(text_value: Option<&Value>) -> String {
    match text_value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("text")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
                _ => None,
            })
            .collect::<String>(),
        _ => String::new(),
    }
}

/// Resolves a record timestamp from the ISO field, falling back to the
/// unixtime field. A date that fails to parse yields `None`, never an error.
fn parse_record_date(iso: Option<&Value>, unixtime: Option<&Value>) -> Option<DateTime<Utc>> {
    iso.and_then(Value::as_str)
        .and_then(parse_export_date)
        .or_else(|| unixtime.and_then(parse_unix_value))
}

/// Parses the ISO-8601 timestamps Telegram writes ("2024-06-15T12:00:00").
fn parse_export_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    warn!(date = s, "failed to parse date");
    None
}

/// Parses a unixtime field, which exports carry as a string or a number.
fn parse_unix_value(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::String(s) => s.parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}

/// Coerces a string-or-number JSON value to a string.
fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_entities(value: Option<&Value>) -> Vec<TextEntity> {
    let Some(arr) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    arr.iter()
        .filter_map(|item| match serde_json::from_value::<TextEntity>(item.clone()) {
            Ok(entity) => Some(entity),
            Err(err) => {
                warn!(%err, "skipping malformed text entity");
                None
            }
        })
        .collect()
}

fn parse_reactions(value: Option<&Value>) -> Vec<Reaction> {
    let Some(arr) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    arr.iter()
        .filter_map(|item| {
            let reaction = parse_reaction(item);
            if reaction.is_none() {
                warn!("skipping malformed reaction");
            }
            reaction
        })
        .collect()
}

fn parse_reaction(value: &Value) -> Option<Reaction> {
    let obj = value.as_object()?;
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("emoji")
        .to_string();
    let emoji = obj.get("emoji").and_then(Value::as_str).map(str::to_owned);
    let count = obj
        .get("count")
        .and_then(Value::as_u64)
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(0);
    let recent = obj
        .get("recent")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_actor).collect())
        .unwrap_or_default();

    Some(Reaction {
        kind,
        emoji,
        count,
        recent,
    })
}

fn parse_actor(value: &Value) -> Option<ReactionActor> {
    let obj = value.as_object()?;
    Some(ReactionActor {
        from_user: obj.get("from").and_then(Value::as_str).map(str::to_owned),
        from_id: value_to_string(obj.get("from_id")),
        date: obj
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_export_date),
    })
}
