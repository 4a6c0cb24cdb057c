//! One parsed export: chat metadata plus the ordered message sequence.

use serde::{Deserialize, Serialize};

use crate::Message;

/// A fully parsed Telegram export.
///
/// Constructed once per parse call and immutable afterwards. The message
/// sequence preserves source (chronological) order; cleaning strategies must
/// not assume it is sorted by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatInfo {
    /// Chat display name.
    pub name: String,

    /// Chat kind as exported: "personal_chat", "private_group", ...
    #[serde(rename = "type")]
    pub chat_type: String,

    /// Chat identifier. Exports carry this as either a string or a number;
    /// it is normalized to a string at parse time.
    pub id: String,

    /// Messages in source order.
    pub messages: Vec<Message>,

    /// Provenance: where this export was read from.
    pub source_file: String,
}

impl ChatInfo {
    pub fn new(
        name: impl Into<String>,
        chat_type: impl Into<String>,
        id: impl Into<String>,
        messages: Vec<Message>,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            chat_type: chat_type.into(),
            id: id.into(),
            messages,
            source_file: source_file.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageKind;

    #[test]
    fn test_chat_info_basics() {
        let chat = ChatInfo::new(
            "Team",
            "private_group",
            "42",
            vec![Message::new(1, MessageKind::Message).with_text("hi")],
            "export.json",
        );
        assert_eq!(chat.len(), 1);
        assert!(!chat.is_empty());
        assert_eq!(chat.chat_type, "private_group");
    }
}
