use chrono::Local;
use serde::{Deserialize, Serialize};

/// Represents a message within a room.
///
/// Messages are immutable once appended; per-room order equals id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Store-wide monotonically increasing id
    pub id: i64,
    /// Room this message belongs to
    pub room_id: String,
    /// Participant who sent the message
    pub sender_id: String,
    /// Full untruncated body text
    pub text: String,
    /// Display timestamp captured when the message was accepted
    pub time: String,
    /// Whether the message has been read
    pub read: bool,
}

impl ChatMessage {
    /// Create a message stamped with the current wall-clock display time.
    pub fn new(
        id: i64,
        room_id: impl Into<String>,
        sender_id: impl Into<String>,
        text: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            id,
            room_id: room_id.into(),
            sender_id: sender_id.into(),
            text: text.into(),
            time: display_time(),
            read,
        }
    }
}

/// Wall-clock display time, hour and minute.
pub fn display_time() -> String {
    Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let message = ChatMessage::new(7, "room1", "u2", "Hello, world!", true);

        assert_eq!(message.id, 7);
        assert_eq!(message.room_id, "room1");
        assert_eq!(message.sender_id, "u2");
        assert_eq!(message.text, "Hello, world!");
        assert!(message.read);
    }

    #[test]
    fn test_display_time_is_hour_minute() {
        let time = display_time();
        assert_eq!(time.len(), 5);
        assert_eq!(time.as_bytes()[2], b':');
    }
}
