//! Append-only per-room message log.

use std::collections::HashMap;

use tracing::debug;

use crate::entities::ChatMessage;
use crate::registry::RoomRegistry;
use crate::types::{BrokerError, BrokerResult};

/// Source of truth for room history.
///
/// Ids are assigned from a store-wide monotonic counter, so append order
/// within a room always equals id order. Appends are validated against the
/// registry; history reads are tolerant of unknown rooms.
#[derive(Debug)]
pub struct MessageStore {
    messages: HashMap<String, Vec<ChatMessage>>,
    next_id: i64,
}

impl MessageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
            next_id: 1,
        }
    }

    /// Create a store preloaded with history; ids continue after the highest
    /// seeded id.
    pub fn seeded(history: impl IntoIterator<Item = ChatMessage>) -> Self {
        let mut store = Self::new();
        for message in history {
            store.next_id = store.next_id.max(message.id + 1);
            store
                .messages
                .entry(message.room_id.clone())
                .or_default()
                .push(message);
        }
        store
    }

    /// Append a message, assigning the next store-wide id and capturing the
    /// clock at the moment of call. Fails when the room is not registered.
    pub fn append(
        &mut self,
        registry: &RoomRegistry,
        room_id: &str,
        sender_id: &str,
        text: &str,
        read: bool,
    ) -> BrokerResult<ChatMessage> {
        if !registry.contains(room_id) {
            return Err(BrokerError::room_unknown(room_id));
        }

        let id = self.next_id;
        self.next_id += 1;

        let message = ChatMessage::new(id, room_id, sender_id, text, read);
        self.messages
            .entry(room_id.to_string())
            .or_default()
            .push(message.clone());

        debug!(room_id, message_id = id, "message appended");
        Ok(message)
    }

    /// All messages for a room in append order; empty for unknown rooms
    pub fn list_by_room(&self, room_id: &str) -> Vec<ChatMessage> {
        self.messages.get(room_id).cloned().unwrap_or_default()
    }

    /// Total number of stored messages
    pub fn message_count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Room;

    fn registry() -> RoomRegistry {
        RoomRegistry::seeded(
            "currUser",
            vec![
                Room::direct("room1", "u1", "c1"),
                Room::direct("room2", "u2", "c2"),
            ],
        )
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let registry = registry();
        let mut store = MessageStore::new();

        let first = store.append(&registry, "room1", "u1", "one", true).unwrap();
        let second = store.append(&registry, "room1", "u1", "two", true).unwrap();
        let third = store.append(&registry, "room2", "u2", "three", true).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_append_unknown_room_fails_without_mutation() {
        let registry = registry();
        let mut store = MessageStore::new();

        let result = store.append(&registry, "missingRoom", "u1", "hi", true);
        assert!(matches!(result, Err(BrokerError::RoomUnknown { .. })));
        assert_eq!(store.message_count(), 0);

        // Next accepted append still starts at 1.
        let message = store.append(&registry, "room1", "u1", "hi", true).unwrap();
        assert_eq!(message.id, 1);
    }

    #[test]
    fn test_list_by_room_returns_append_order() {
        let registry = registry();
        let mut store = MessageStore::new();
        store.append(&registry, "room1", "u1", "one", true).unwrap();
        store.append(&registry, "room2", "u2", "other", true).unwrap();
        store.append(&registry, "room1", "c1", "two", true).unwrap();

        let history = store.list_by_room("room1");
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_list_by_room_unknown_is_empty() {
        let store = MessageStore::new();
        assert!(store.list_by_room("missingRoom").is_empty());
    }

    #[test]
    fn test_seeded_store_continues_ids() {
        let registry = registry();
        let history = vec![
            ChatMessage::new(1, "room1", "c1", "hi", true),
            ChatMessage::new(19, "room2", "c2", "question", false),
        ];
        let mut store = MessageStore::seeded(history);

        let next = store.append(&registry, "room1", "u1", "reply", true).unwrap();
        assert_eq!(next.id, 20);
        assert_eq!(store.message_count(), 3);
    }
}
