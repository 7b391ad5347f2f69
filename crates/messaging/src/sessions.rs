//! Connected-session registry and per-room delivery sets.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::types::BrokerEvent;

/// Identity of one connected session
pub type SessionId = Uuid;

/// Receiving side of a connected session.
///
/// The gateway owns the handle for the lifetime of the connection and pumps
/// `events` out over the transport. Dropping the handle does not unregister
/// the session; call [`SessionRegistry::disconnect`] on connection teardown.
pub struct SessionHandle {
    pub id: SessionId,
    pub user_id: String,
    pub events: mpsc::UnboundedReceiver<BrokerEvent>,
}

#[derive(Debug, Default)]
struct SessionTable {
    senders: HashMap<SessionId, mpsc::UnboundedSender<BrokerEvent>>,
    users: HashMap<SessionId, String>,
    session_rooms: HashMap<SessionId, HashSet<String>>,
    room_sessions: HashMap<String, HashSet<SessionId>>,
}

/// Explicit subscriber registry: which sessions receive each room's fan-out.
///
/// Maintained by connect/join/disconnect; sessions never mutate broker state
/// through it, they only receive broadcasts.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<SessionTable>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and subscribe it to its initial rooms
    pub async fn connect(
        &self,
        user_id: &str,
        rooms: impl IntoIterator<Item = String>,
    ) -> SessionHandle {
        let (sender, events) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let rooms: HashSet<String> = rooms.into_iter().collect();

        let mut table = self.inner.write().await;
        table.senders.insert(id, sender);
        table.users.insert(id, user_id.to_string());
        for room_id in &rooms {
            table
                .room_sessions
                .entry(room_id.clone())
                .or_default()
                .insert(id);
        }
        table.session_rooms.insert(id, rooms);

        debug!(session_id = %id, user_id, "session connected");
        SessionHandle {
            id,
            user_id: user_id.to_string(),
            events,
        }
    }

    /// Add a session to one room's delivery set
    pub async fn subscribe(&self, session_id: SessionId, room_id: &str) {
        let mut table = self.inner.write().await;
        if !table.senders.contains_key(&session_id) {
            return;
        }
        table
            .room_sessions
            .entry(room_id.to_string())
            .or_default()
            .insert(session_id);
        table
            .session_rooms
            .entry(session_id)
            .or_default()
            .insert(room_id.to_string());
    }

    /// Remove a session from every delivery set
    pub async fn disconnect(&self, session_id: SessionId) {
        let mut table = self.inner.write().await;
        table.senders.remove(&session_id);
        table.users.remove(&session_id);
        if let Some(rooms) = table.session_rooms.remove(&session_id) {
            for room_id in rooms {
                if let Some(subscribers) = table.room_sessions.get_mut(&room_id) {
                    subscribers.remove(&session_id);
                }
            }
        }
        debug!(session_id = %session_id, "session disconnected");
    }

    /// The user a session authenticated as
    pub async fn user_of(&self, session_id: SessionId) -> Option<String> {
        let table = self.inner.read().await;
        table.users.get(&session_id).cloned()
    }

    /// Whether a session is in the room's delivery set
    pub async fn is_subscribed(&self, session_id: SessionId, room_id: &str) -> bool {
        let table = self.inner.read().await;
        table
            .room_sessions
            .get(room_id)
            .map(|subscribers| subscribers.contains(&session_id))
            .unwrap_or(false)
    }

    /// Deliver an event to every session subscribed to the room
    pub async fn broadcast_to_room(&self, room_id: &str, event: &BrokerEvent) {
        self.fan_out(room_id, None, event).await;
    }

    /// Deliver an event to every subscribed session except the originator
    pub async fn broadcast_to_others(
        &self,
        room_id: &str,
        originator: SessionId,
        event: &BrokerEvent,
    ) {
        self.fan_out(room_id, Some(originator), event).await;
    }

    async fn fan_out(&self, room_id: &str, skip: Option<SessionId>, event: &BrokerEvent) {
        let table = self.inner.read().await;
        let Some(subscribers) = table.room_sessions.get(room_id) else {
            return;
        };
        for session_id in subscribers {
            if skip == Some(*session_id) {
                continue;
            }
            if let Some(sender) = table.senders.get(session_id) {
                // A closed receiver means the connection is tearing down;
                // disconnect will prune it.
                let _ = sender.send(event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ChatMessage;

    fn message_event(room_id: &str) -> BrokerEvent {
        BrokerEvent::ReceiveMessage {
            message: ChatMessage::new(1, room_id, "u1", "hi", true),
        }
    }

    #[tokio::test]
    async fn test_connect_subscribes_initial_rooms() {
        let registry = SessionRegistry::new();
        let mut handle = registry
            .connect("u1", vec!["room1".to_string(), "room2".to_string()])
            .await;

        assert!(registry.is_subscribed(handle.id, "room1").await);
        assert!(registry.is_subscribed(handle.id, "room2").await);
        assert!(!registry.is_subscribed(handle.id, "room3").await);

        registry
            .broadcast_to_room("room1", &message_event("room1"))
            .await;
        assert!(handle.events.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_to_others_skips_originator() {
        let registry = SessionRegistry::new();
        let mut origin = registry.connect("u1", vec!["room1".to_string()]).await;
        let mut other = registry.connect("c1", vec!["room1".to_string()]).await;

        registry
            .broadcast_to_others(
                "room1",
                origin.id,
                &BrokerEvent::UserTyping {
                    room_id: "room1".to_string(),
                    is_typing: true,
                    user: "You".to_string(),
                },
            )
            .await;

        assert!(other.events.recv().await.is_some());
        assert!(origin.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_removes_from_delivery_sets() {
        let registry = SessionRegistry::new();
        let handle = registry.connect("u1", vec!["room1".to_string()]).await;

        registry.disconnect(handle.id).await;

        assert!(!registry.is_subscribed(handle.id, "room1").await);
        assert!(registry.user_of(handle.id).await.is_none());
    }

    #[tokio::test]
    async fn test_subscribe_after_disconnect_is_ignored() {
        let registry = SessionRegistry::new();
        let handle = registry.connect("u1", Vec::<String>::new()).await;
        registry.disconnect(handle.id).await;

        registry.subscribe(handle.id, "room1").await;
        assert!(!registry.is_subscribed(handle.id, "room1").await);
    }
}
