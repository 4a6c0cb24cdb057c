//! Context-focused cleaning strategy.
//!
//! Preserves conversational structure for relationship-aware analysis:
//! level 1 is a flat chronological list, level 2 groups messages into
//! linear reply chains, level 3 renders the full reply tree with reactions,
//! media context, and forwarding origin.

use std::collections::HashSet;

use super::format::{format_basic, TS_SECONDS};
use super::replies::{collect_chain, MessageIndex, ReplyTree};
use super::Level;
use crate::{ChatInfo, Message};

/// Context strategy instance. Stateless across messages.
#[derive(Debug)]
pub struct ContextCleaner {
    level: Level,
}

impl ContextCleaner {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn clean(&self, chat: &ChatInfo) -> String {
        let mut lines = vec![
            format!("Chat: {}", chat.name),
            format!("Type: {}", chat.chat_type),
            "=".repeat(50),
            String::new(),
        ];

        match self.level {
            Level::One => clean_level_1(&chat.messages, &mut lines),
            Level::Two => clean_level_2(&chat.messages, &mut lines),
            Level::Three => clean_level_3(&chat.messages, &mut lines),
        }

        lines.join("\n")
    }
}

/// Flat chronological list, one line per ordinary message.
fn clean_level_1(messages: &[Message], lines: &mut Vec<String>) {
    for message in messages {
        if !message.is_ordinary() {
            continue;
        }
        let formatted = format_basic(message);
        if !formatted.is_empty() {
            lines.push(formatted);
            lines.push(String::new());
        }
    }
}

/// Linear reply chains, each an indented block, oldest first.
///
/// Chains must start from their tails (messages no other message replies
/// to): starting from source order would consume a root as a singleton
/// block before its reply is reached, splitting the chain. The second
/// sweep picks up whatever the tail sweep cannot reach, which is only
/// members of reply cycles.
///
/// One visited set spans all chains, so a message id never appears in more
/// than one block. Non-ordinary chain members are not emitted but keep
/// their chain position, so indentation still reflects depth.
fn clean_level_2(messages: &[Message], lines: &mut Vec<String>) {
    let index = MessageIndex::new(messages);
    let targets: HashSet<i64> = messages
        .iter()
        .filter_map(|m| m.reply_to_message_id)
        .collect();
    let mut visited: HashSet<i64> = HashSet::new();

    let tails = messages.iter().filter(|m| !targets.contains(&m.id));
    for message in tails.chain(messages.iter()) {
        if visited.contains(&message.id) {
            continue;
        }

        let chain = collect_chain(message, &index, &mut visited);

        let mut block = Vec::new();
        for (position, member) in chain.iter().enumerate() {
            if !member.is_ordinary() {
                continue;
            }
            let formatted = format_basic(member);
            if !formatted.is_empty() {
                block.push(format!("{}{formatted}", "  ".repeat(position)));
            }
        }

        if !block.is_empty() {
            lines.append(&mut block);
            lines.push(String::new());
        }
    }
}

/// Full reply tree: one block per root, depth-first, children ascending.
///
/// Messages whose reply target is set but missing from the chat are neither
/// roots nor reachable children, so they are silently omitted here.
fn clean_level_3(messages: &[Message], lines: &mut Vec<String>) {
    let index = MessageIndex::new(messages);
    let tree = ReplyTree::build(messages);

    for root in messages.iter().filter(|m| m.reply_to_message_id.is_none()) {
        emit_thread(root.id, &index, &tree, lines);
        lines.push(String::new());
    }
}

/// Depth-first over one thread with an explicit stack, so thread depth is
/// bounded by heap, not by the call stack.
fn emit_thread(root: i64, index: &MessageIndex<'_>, tree: &ReplyTree, lines: &mut Vec<String>) {
    let mut stack = vec![(root, 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let Some(message) = index.get(id) else {
            continue;
        };
        // Non-ordinary kinds end the thread at this node.
        if !message.is_ordinary() {
            continue;
        }

        let formatted = format_context_line(message, depth);
        if !formatted.is_empty() {
            lines.push(formatted);
        }

        // Reversed so the stack pops children in ascending id order.
        for &child in tree.children(id).iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

/// One tree line: timestamp, `#id`, edit marker, sender, text, reactions,
/// media context, forwarding origin, indented to tree depth.
fn format_context_line(message: &Message, depth: usize) -> String {
    let mut parts = Vec::new();

    if let Some(date) = message.date {
        parts.push(format!("[{}]", date.format(TS_SECONDS)));
    }

    parts.push(format!("#{}", message.id));

    if message.edited.is_some() {
        parts.push("[EDITED]".to_string());
    }

    parts.push(format!(
        "{}:",
        message
            .from_user
            .as_deref()
            .or(message.from_id.as_deref())
            .unwrap_or("Unknown")
    ));

    let text = message.text.trim();
    if !text.is_empty() {
        parts.push(text.to_string());
    }

    let reactions = format_reactions(message);
    if !reactions.is_empty() {
        parts.push(format!("[Reactions: {reactions}]"));
    }

    if let Some(media) = media_context(message) {
        parts.push(format!("[Media: {media}]"));
    }

    if let Some(origin) = &message.forwarded_from {
        parts.push(format!("[Forwarded from: {origin}]"));
    }

    format!("{}{}", "  ".repeat(depth), parts.join(" "))
}

/// `emoji×count` pairs, comma-joined.
fn format_reactions(message: &Message) -> String {
    message
        .reactions
        .iter()
        .filter_map(|r| {
            let emoji = r.emoji.as_deref()?;
            (r.count > 0).then(|| format!("{emoji}×{}", r.count))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Media type plus filename, duration, and dimensions as available.
fn media_context(message: &Message) -> Option<String> {
    let media_type = message.media_type.as_deref()?;

    let mut parts = vec![media_type.to_string()];

    if let Some(file_name) = &message.file_name {
        parts.push(format!("'{file_name}'"));
    }
    if let Some(duration) = message.duration_seconds {
        parts.push(format!("{duration}s"));
    }
    if let (Some(width), Some(height)) = (message.width, message.height) {
        parts.push(format!("{width}×{height}"));
    }

    Some(parts.join(" "))
}
