//! Reply-graph reconstruction primitives shared by the strategies.
//!
//! The export is a flat, id-indexed message list; conversational structure
//! exists only as weak `reply_to_message_id` back-references. Two walks
//! rebuild it:
//!
//! - [`collect_chain`] — linear ancestor walk, cycle-safe, returned in
//!   chronological order;
//! - [`ReplyTree`] — the one-to-many child adjacency used for full thread
//!   traversal.

use std::collections::{HashMap, HashSet};

use crate::Message;

/// Read-only id → message index, rebuilt once per cleaning call.
pub(crate) struct MessageIndex<'a> {
    map: HashMap<i64, &'a Message>,
}

impl<'a> MessageIndex<'a> {
    pub(crate) fn new(messages: &'a [Message]) -> Self {
        Self {
            map: messages.iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub(crate) fn get(&self, id: i64) -> Option<&'a Message> {
        self.map.get(&id).copied()
    }

    pub(crate) fn contains(&self, id: i64) -> bool {
        self.map.contains_key(&id)
    }
}

/// Walks a reply chain backwards from `start`, collecting ancestors.
///
/// The walk stops when a message has no reply target, the target is missing
/// from the index, or the next message was already visited (which also makes
/// a synthetic reply cycle terminate after one pass). Visited ids are added
/// to `visited`, so callers sharing one set across calls never emit the same
/// message in two chains.
///
/// The returned slice of references is in chronological order, oldest first.
pub(crate) fn collect_chain<'a>(
    start: &'a Message,
    index: &MessageIndex<'a>,
    visited: &mut HashSet<i64>,
) -> Vec<&'a Message> {
    let mut chain = Vec::new();
    let mut current = start;

    loop {
        if !visited.insert(current.id) {
            break;
        }
        chain.push(current);

        match current.reply_to_message_id.and_then(|id| index.get(id)) {
            Some(target) => current = target,
            None => break,
        }
    }

    chain.reverse();
    chain
}

/// The one-to-many reply adjacency: parent id → child ids, ascending.
///
/// Built from every message with a reply target, whether or not the target
/// exists. A message whose target is missing lands in an unreachable bucket:
/// it is neither a root (it has a reply target) nor anyone's visited child,
/// so tree traversal silently omits it.
pub(crate) struct ReplyTree {
    children: HashMap<i64, Vec<i64>>,
}

impl ReplyTree {
    pub(crate) fn build(messages: &[Message]) -> Self {
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for message in messages {
            if let Some(parent) = message.reply_to_message_id {
                children.entry(parent).or_default().push(message.id);
            }
        }
        for ids in children.values_mut() {
            ids.sort_unstable();
        }
        Self { children }
    }

    /// Child ids of `parent`, ascending; empty when it has none.
    pub(crate) fn children(&self, parent: i64) -> &[i64] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageKind;

    fn msg(id: i64, reply_to: Option<i64>) -> Message {
        let m = Message::new(id, MessageKind::Message).with_text(format!("m{id}"));
        match reply_to {
            Some(target) => m.with_reply_to(target),
            None => m,
        }
    }

    #[test]
    fn test_chain_collects_ancestors_chronologically() {
        let messages = vec![msg(1, None), msg(2, Some(1)), msg(3, Some(2))];
        let index = MessageIndex::new(&messages);
        let mut visited = HashSet::new();

        let chain = collect_chain(&messages[2], &index, &mut visited);
        let ids: Vec<i64> = chain.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_chain_terminates_on_missing_target() {
        let messages = vec![msg(5, Some(999))];
        let index = MessageIndex::new(&messages);
        let mut visited = HashSet::new();

        let chain = collect_chain(&messages[0], &index, &mut visited);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].id, 5);
    }

    #[test]
    fn test_chain_terminates_on_cycle() {
        // A replies to B, B replies to A.
        let messages = vec![msg(1, Some(2)), msg(2, Some(1))];
        let index = MessageIndex::new(&messages);
        let mut visited = HashSet::new();

        let chain = collect_chain(&messages[0], &index, &mut visited);
        assert_eq!(chain.len(), 2);
        assert!(visited.contains(&1) && visited.contains(&2));
    }

    #[test]
    fn test_shared_visited_set_prevents_duplicates() {
        let messages = vec![msg(1, None), msg(2, Some(1))];
        let index = MessageIndex::new(&messages);
        let mut visited = HashSet::new();

        let first = collect_chain(&messages[1], &index, &mut visited);
        assert_eq!(first.len(), 2);

        // Both messages were consumed by the first chain.
        let second = collect_chain(&messages[0], &index, &mut visited);
        assert!(second.is_empty());
    }

    #[test]
    fn test_tree_children_sorted() {
        let messages = vec![msg(1, None), msg(9, Some(1)), msg(3, Some(1))];
        let tree = ReplyTree::build(&messages);
        assert_eq!(tree.children(1), &[3, 9]);
        assert!(tree.children(9).is_empty());
    }

    #[test]
    fn test_index_lookup() {
        let messages = vec![msg(1, None)];
        let index = MessageIndex::new(&messages);
        assert!(index.contains(1));
        assert!(index.get(2).is_none());
    }
}
