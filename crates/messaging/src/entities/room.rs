use serde::{Deserialize, Serialize};

/// Maximum number of characters kept in a room's last-message preview.
pub const LAST_MESSAGE_PREVIEW_CHARS: usize = 30;

/// Represents a conversation room between an agent and a client counterpart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room id
    pub id: String,
    /// Kind of room (direct, group)
    pub kind: RoomKind,
    /// Participant ids in join order; the agent always comes first
    pub participants: Vec<String>,
    /// The designated agent participant
    pub agent_id: String,
    /// The client counterpart the auto-responder replies as
    pub client_id: String,
    /// Denormalized last-message/unread projection
    pub summary: RoomSummary,
}

/// Room kind enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Direct,
    Group,
}

impl From<&str> for RoomKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "group" => RoomKind::Group,
            _ => RoomKind::Direct,
        }
    }
}

impl From<RoomKind> for String {
    fn from(kind: RoomKind) -> Self {
        match kind {
            RoomKind::Direct => "direct".to_string(),
            RoomKind::Group => "group".to_string(),
        }
    }
}

/// Last-message/unread-count projection attached to a room for list views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Bounded preview of the last message body
    pub last_message_text: String,
    /// Display time of the last message
    pub last_message_time: String,
    /// Messages received while the room was not the viewer's active room
    pub unread_count: u32,
}

impl Room {
    /// Create a direct room between an agent and a client
    pub fn direct(
        id: impl Into<String>,
        agent_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        let agent_id = agent_id.into();
        let client_id = client_id.into();
        Self {
            id: id.into(),
            kind: RoomKind::Direct,
            participants: vec![agent_id.clone(), client_id.clone()],
            agent_id,
            client_id,
            summary: RoomSummary::default(),
        }
    }

    /// Attach an initial summary (used when seeding rooms)
    pub fn with_summary(
        mut self,
        last_text: impl Into<String>,
        last_time: impl Into<String>,
        unread_count: u32,
    ) -> Self {
        self.summary = RoomSummary {
            last_message_text: last_text.into(),
            last_message_time: last_time.into(),
            unread_count,
        };
        self
    }

    /// Check whether a user participates in this room
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// Check if this is a group room
    pub fn is_group(&self) -> bool {
        matches!(self.kind, RoomKind::Group)
    }
}

/// Bounded preview of a message body for room list rendering.
///
/// Bodies longer than [`LAST_MESSAGE_PREVIEW_CHARS`] are cut at that many
/// characters and marked with a trailing ellipsis.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LAST_MESSAGE_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_room_creation() {
        let room = Room::direct("room1", "u2", "c1");

        assert_eq!(room.id, "room1");
        assert_eq!(room.kind, RoomKind::Direct);
        assert_eq!(room.participants, vec!["u2", "c1"]);
        assert!(room.is_participant("u2"));
        assert!(room.is_participant("c1"));
        assert!(!room.is_participant("u9"));
        assert!(!room.is_group());
        assert_eq!(room.summary.unread_count, 0);
    }

    #[test]
    fn test_room_kind_conversion() {
        assert_eq!(RoomKind::from("direct"), RoomKind::Direct);
        assert_eq!(RoomKind::from("group"), RoomKind::Group);
        assert_eq!(RoomKind::from("unknown"), RoomKind::Direct);

        assert_eq!(String::from(RoomKind::Direct), "direct");
        assert_eq!(String::from(RoomKind::Group), "group");
    }

    #[test]
    fn test_preview_keeps_short_bodies() {
        assert_eq!(preview("hello"), "hello");

        let exactly_thirty = "a".repeat(30);
        assert_eq!(preview(&exactly_thirty), exactly_thirty);
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "a".repeat(40);
        let expected = format!("{}...", "a".repeat(30));
        assert_eq!(preview(&long), expected);
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let long: String = "é".repeat(31);
        assert_eq!(preview(&long), format!("{}...", "é".repeat(30)));
    }
}
