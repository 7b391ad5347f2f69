//! The coordination point for all room mutations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::entities::{ChatMessage, Room};
use crate::presence::TypingTracker;
use crate::registry::RoomRegistry;
use crate::responder;
use crate::sessions::{SessionHandle, SessionId, SessionRegistry};
use crate::store::MessageStore;
use crate::types::{BrokerError, BrokerEvent, BrokerResult};

/// Serializes intents per room and fans results out to subscribed sessions.
///
/// Each room id owns a mutex entry; a send holds it across message append,
/// registry summary update, and broadcast enqueue, so those three form one
/// indivisible unit and message id order equals room append order. Intents for
/// different rooms proceed in parallel. The dispatcher owns no state itself;
/// it only sequences mutations of the registry, store, and tracker.
pub struct Dispatcher {
    registry: RwLock<RoomRegistry>,
    store: RwLock<MessageStore>,
    typing: TypingTracker,
    sessions: SessionRegistry,
    room_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    auto_reply_delay: Duration,
}

impl Dispatcher {
    /// Create a dispatcher over a loaded registry and store
    pub fn new(
        registry: RoomRegistry,
        store: MessageStore,
        auto_reply_delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry: RwLock::new(registry),
            store: RwLock::new(store),
            typing: TypingTracker::new(),
            sessions: SessionRegistry::new(),
            room_locks: Mutex::new(HashMap::new()),
            auto_reply_delay,
        })
    }

    /// Register a session, auto-subscribing it to every room its user
    /// participates in.
    pub async fn connect(&self, user_id: &str) -> SessionHandle {
        let rooms = self.registry.read().await.rooms_for(user_id);
        self.sessions.connect(user_id, rooms).await
    }

    /// Remove a session from all delivery sets.
    ///
    /// In-flight sends and pending auto-reply timers are unaffected.
    pub async fn disconnect(&self, session_id: SessionId) {
        self.sessions.disconnect(session_id).await;
    }

    /// Subscribe a session to one room on demand.
    ///
    /// When the joining session belongs to the viewer, the room also becomes
    /// the viewer's active room and its unread count resets, matching the
    /// client pairing of "open a room" with a join.
    pub async fn join(&self, session_id: SessionId, room_id: &str) -> BrokerResult<()> {
        self.registry.read().await.get(room_id)?;
        self.sessions.subscribe(session_id, room_id).await;

        let user = self.sessions.user_of(session_id).await;
        let mut registry = self.registry.write().await;
        if user.as_deref() == Some(registry.viewer_id()) {
            registry.set_active_room(room_id)?;
        }
        Ok(())
    }

    /// Accept a send intent: append to history, fold into the room summary,
    /// and fan out to every subscribed session including the sender's own
    /// (delivery confirmation).
    pub async fn send(
        self: &Arc<Self>,
        room_id: &str,
        sender_id: &str,
        text: &str,
    ) -> BrokerResult<ChatMessage> {
        self.dispatch_send(room_id, sender_id, text, true).await
    }

    pub(crate) async fn dispatch_send(
        self: &Arc<Self>,
        room_id: &str,
        sender_id: &str,
        text: &str,
        read: bool,
    ) -> BrokerResult<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BrokerError::EmptyBody);
        }
        let room = self.registry.read().await.get(room_id)?.clone();

        let lock = self.room_lock(room_id).await;
        let guard = lock.lock().await;

        let message = {
            let registry = self.registry.read().await;
            let mut store = self.store.write().await;
            store.append(&registry, room_id, sender_id, text, read)?
        };
        {
            let mut registry = self.registry.write().await;
            let sender_is_viewer = sender_id == registry.viewer_id();
            registry.update_summary(room_id, &message.text, &message.time, sender_is_viewer)?;
        }
        self.typing.clear_typing(room_id).await;
        self.sessions
            .broadcast_to_room(
                room_id,
                &BrokerEvent::ReceiveMessage {
                    message: message.clone(),
                },
            )
            .await;
        drop(guard);

        if sender_id == room.agent_id {
            responder::schedule_reply(
                Arc::clone(self),
                room,
                message.text.clone(),
                self.auto_reply_delay,
            );
        }

        debug!(room_id, sender_id, message_id = message.id, "message dispatched");
        Ok(message)
    }

    /// Record or clear a typing signal and notify the other subscribed
    /// sessions (never the originator).
    pub async fn typing(
        &self,
        session_id: SessionId,
        room_id: &str,
        user: &str,
        is_typing: bool,
    ) -> BrokerResult<()> {
        self.registry.read().await.get(room_id)?;

        if is_typing {
            self.typing.set_typing(room_id, user).await;
        } else {
            self.typing.clear_typing(room_id).await;
        }

        self.sessions
            .broadcast_to_others(
                room_id,
                session_id,
                &BrokerEvent::UserTyping {
                    room_id: room_id.to_string(),
                    is_typing,
                    user: user.to_string(),
                },
            )
            .await;
        Ok(())
    }

    /// Ordered history for a room; empty for unknown rooms (tolerant read
    /// path, unlike sends).
    pub async fn list_messages(&self, room_id: &str) -> Vec<ChatMessage> {
        self.store.read().await.list_by_room(room_id)
    }

    /// All rooms with current summaries, in load order
    pub async fn rooms(&self) -> Vec<Room> {
        self.registry.read().await.rooms()
    }

    /// One room with its current summary
    pub async fn room(&self, room_id: &str) -> BrokerResult<Room> {
        Ok(self.registry.read().await.get(room_id)?.clone())
    }

    /// Who is currently typing in a room, if anyone
    pub async fn typist(&self, room_id: &str) -> Option<String> {
        self.typing.get(room_id).await
    }

    /// The identity whose unread counts the registry tracks
    pub async fn viewer_id(&self) -> String {
        self.registry.read().await.viewer_id().to_string()
    }

    async fn room_lock(&self, room_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.room_locks.lock().await;
        locks
            .entry(room_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
