//! Authoritative mapping of room identity to summary state.

use std::collections::HashMap;

use tracing::debug;

use crate::entities::{preview, Room};
use crate::types::{BrokerError, BrokerResult};

/// Registry of all known rooms and their denormalized summaries.
///
/// The registry also tracks the viewer identity (the console operator whose
/// unread counts the summaries reflect) and which room that viewer currently
/// has open. Rooms are created at load and never deleted.
#[derive(Debug)]
pub struct RoomRegistry {
    order: Vec<String>,
    rooms: HashMap<String, Room>,
    viewer_id: String,
    active_room: Option<String>,
}

impl RoomRegistry {
    /// Create an empty registry for the given viewer identity
    pub fn new(viewer_id: impl Into<String>) -> Self {
        Self {
            order: Vec::new(),
            rooms: HashMap::new(),
            viewer_id: viewer_id.into(),
            active_room: None,
        }
    }

    /// Create a registry preloaded with rooms
    pub fn seeded(viewer_id: impl Into<String>, rooms: impl IntoIterator<Item = Room>) -> Self {
        let mut registry = Self::new(viewer_id);
        for room in rooms {
            registry.insert(room);
        }
        registry
    }

    /// Register a room, replacing any previous entry with the same id
    pub fn insert(&mut self, room: Room) {
        if !self.rooms.contains_key(&room.id) {
            self.order.push(room.id.clone());
        }
        self.rooms.insert(room.id.clone(), room);
    }

    /// Check whether a room exists
    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Look up a room by id
    pub fn get(&self, room_id: &str) -> BrokerResult<&Room> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| BrokerError::room_unknown(room_id))
    }

    /// All rooms in load order
    pub fn rooms(&self) -> Vec<Room> {
        self.order
            .iter()
            .filter_map(|id| self.rooms.get(id))
            .cloned()
            .collect()
    }

    /// Ids of every room the given user participates in
    pub fn rooms_for(&self, user_id: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| {
                self.rooms
                    .get(*id)
                    .map(|room| room.is_participant(user_id))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// The identity whose unread counts this registry tracks
    pub fn viewer_id(&self) -> &str {
        &self.viewer_id
    }

    /// The viewer's currently open room, if any
    pub fn active_room(&self) -> Option<&str> {
        self.active_room.as_deref()
    }

    /// Mark a room as the viewer's active room, resetting its unread count
    pub fn set_active_room(&mut self, room_id: &str) -> BrokerResult<()> {
        if !self.rooms.contains_key(room_id) {
            return Err(BrokerError::room_unknown(room_id));
        }
        self.active_room = Some(room_id.to_string());
        self.reset_unread(room_id)
    }

    /// Set a room's unread count back to zero
    pub fn reset_unread(&mut self, room_id: &str) -> BrokerResult<()> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| BrokerError::room_unknown(room_id))?;
        room.summary.unread_count = 0;
        Ok(())
    }

    /// Fold an accepted message into the room's denormalized summary.
    ///
    /// The preview is truncated to a bounded prefix. The unread count grows by
    /// one unless the sender is the viewer or the room is the viewer's active
    /// room.
    pub fn update_summary(
        &mut self,
        room_id: &str,
        last_text: &str,
        last_time: &str,
        sender_is_viewer: bool,
    ) -> BrokerResult<Room> {
        let is_active = self.active_room.as_deref() == Some(room_id);
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| BrokerError::room_unknown(room_id))?;

        room.summary.last_message_text = preview(last_text);
        room.summary.last_message_time = last_time.to_string();
        if !sender_is_viewer && !is_active {
            room.summary.unread_count += 1;
        }

        debug!(
            room_id,
            unread = room.summary.unread_count,
            "room summary updated"
        );
        Ok(room.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(rooms: Vec<Room>) -> RoomRegistry {
        RoomRegistry::seeded("currUser", rooms)
    }

    #[test]
    fn test_get_unknown_room_fails() {
        let registry = registry_with(vec![]);
        assert!(matches!(
            registry.get("missingRoom"),
            Err(BrokerError::RoomUnknown { .. })
        ));
    }

    #[test]
    fn test_rooms_keep_load_order() {
        let registry = registry_with(vec![
            Room::direct("room2", "u1", "c2"),
            Room::direct("room1", "u1", "c1"),
        ]);

        let ids: Vec<String> = registry.rooms().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["room2", "room1"]);
    }

    #[test]
    fn test_rooms_for_filters_by_participant() {
        let registry = registry_with(vec![
            Room::direct("room1", "u1", "c1"),
            Room::direct("room2", "u2", "c1"),
            Room::direct("room3", "u1", "c3"),
        ]);

        assert_eq!(registry.rooms_for("u1"), vec!["room1", "room3"]);
        assert_eq!(registry.rooms_for("c1"), vec!["room1", "room2"]);
        assert!(registry.rooms_for("u9").is_empty());
    }

    #[test]
    fn test_update_summary_increments_unread() {
        let mut registry = registry_with(vec![Room::direct("room1", "u1", "c1")]);

        registry
            .update_summary("room1", "hello", "10:00", false)
            .expect("room exists");
        let room = registry
            .update_summary("room1", "again", "10:01", false)
            .expect("room exists");

        assert_eq!(room.summary.unread_count, 2);
        assert_eq!(room.summary.last_message_text, "again");
        assert_eq!(room.summary.last_message_time, "10:01");
    }

    #[test]
    fn test_update_summary_skips_unread_for_viewer() {
        let mut registry = registry_with(vec![Room::direct("room1", "u1", "c1")]);

        let room = registry
            .update_summary("room1", "hello", "10:00", true)
            .expect("room exists");

        assert_eq!(room.summary.unread_count, 0);
        assert_eq!(room.summary.last_message_text, "hello");
    }

    #[test]
    fn test_update_summary_skips_unread_for_active_room() {
        let mut registry = registry_with(vec![Room::direct("room1", "u1", "c1")]);
        registry.set_active_room("room1").expect("room exists");

        let room = registry
            .update_summary("room1", "hello", "10:00", false)
            .expect("room exists");

        assert_eq!(room.summary.unread_count, 0);
    }

    #[test]
    fn test_update_summary_truncates_preview() {
        let mut registry = registry_with(vec![Room::direct("room1", "u1", "c1")]);
        let long = "b".repeat(40);

        let room = registry
            .update_summary("room1", &long, "10:00", false)
            .expect("room exists");

        assert_eq!(
            room.summary.last_message_text,
            format!("{}...", "b".repeat(30))
        );
    }

    #[test]
    fn test_set_active_room_resets_unread() {
        let room = Room::direct("room1", "u1", "c1").with_summary("hi", "09:00", 5);
        let mut registry = registry_with(vec![room]);

        registry.set_active_room("room1").expect("room exists");

        assert_eq!(registry.active_room(), Some("room1"));
        assert_eq!(registry.get("room1").unwrap().summary.unread_count, 0);
    }

    #[test]
    fn test_reset_unread_always_yields_zero() {
        let room = Room::direct("room1", "u1", "c1").with_summary("hi", "09:00", 42);
        let mut registry = registry_with(vec![room]);

        registry.reset_unread("room1").expect("room exists");
        assert_eq!(registry.get("room1").unwrap().summary.unread_count, 0);

        registry.reset_unread("room1").expect("room exists");
        assert_eq!(registry.get("room1").unwrap().summary.unread_count, 0);
    }

    #[test]
    fn test_set_active_room_unknown_fails() {
        let mut registry = registry_with(vec![]);
        assert!(registry.set_active_room("missingRoom").is_err());
    }
}
