//! Event types fanned out to subscribed sessions.

use serde::{Deserialize, Serialize};

use crate::entities::ChatMessage;

/// Events delivered to every session subscribed to the affected room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrokerEvent {
    /// A message was accepted into the room's history
    ReceiveMessage { message: ChatMessage },

    /// A participant started or stopped typing
    UserTyping {
        room_id: String,
        is_typing: bool,
        user: String,
    },
}

impl BrokerEvent {
    /// Get the room id this event belongs to
    pub fn room_id(&self) -> &str {
        match self {
            BrokerEvent::ReceiveMessage { message } => &message.room_id,
            BrokerEvent::UserTyping { room_id, .. } => room_id,
        }
    }

    /// Get event type name for logging
    pub fn event_type_name(&self) -> &'static str {
        match self {
            BrokerEvent::ReceiveMessage { .. } => "receive_message",
            BrokerEvent::UserTyping { .. } => "user_typing",
        }
    }
}
